use std::fmt::Display;

/// State of the data behind a screen: still loading, loaded, or failed with a
/// user-facing message.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LoadState<T> {
    #[default]
    Loading,
    Success(T),
    Error(String),
}

impl<T> LoadState<T> {
    pub fn from_result<E: Display>(res: Result<T, E>) -> Self {
        match res {
            Ok(v) => LoadState::Success(v),
            Err(e) => LoadState::Error(e.to_string()),
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }

    pub fn success(&self) -> Option<&T> {
        match self {
            LoadState::Success(v) => Some(v),
            _ => None,
        }
    }

    pub fn into_success(self) -> Option<T> {
        match self {
            LoadState::Success(v) => Some(v),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            LoadState::Error(msg) => Some(msg),
            _ => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> LoadState<U> {
        match self {
            LoadState::Loading => LoadState::Loading,
            LoadState::Success(v) => LoadState::Success(f(v)),
            LoadState::Error(msg) => LoadState::Error(msg),
        }
    }

    pub fn as_ref(&self) -> LoadState<&T> {
        match self {
            LoadState::Loading => LoadState::Loading,
            LoadState::Success(v) => LoadState::Success(v),
            LoadState::Error(msg) => LoadState::Error(msg.clone()),
        }
    }
}
