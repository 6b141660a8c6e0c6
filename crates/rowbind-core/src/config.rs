/// Tuning for a list binder.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BinderConfig {
    /// Emit `Move` steps for reordered rows. When false, a reordered row is
    /// removed and re-inserted (and therefore rebound).
    pub detect_moves: bool,
    /// Views kept per view type after their rows are removed.
    pub max_recycled_per_type: usize,
    /// Name of the background diff thread.
    pub worker_name: String,
    /// Identity comparisons between cancellation checks while diffing.
    pub cancel_check_interval: usize,
}

impl Default for BinderConfig {
    fn default() -> Self {
        Self {
            detect_moves: true,
            max_recycled_per_type: 5,
            worker_name: "rowbind-diff".to_string(),
            cancel_check_interval: 64,
        }
    }
}

impl BinderConfig {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn with_detect_moves(mut self, on: bool) -> Self {
        self.detect_moves = on;
        self
    }
    pub fn with_max_recycled_per_type(mut self, n: usize) -> Self {
        self.max_recycled_per_type = n;
        self
    }
    pub fn with_worker_name(mut self, name: impl Into<String>) -> Self {
        self.worker_name = name.into();
        self
    }
    pub fn with_cancel_check_interval(mut self, n: usize) -> Self {
        // zero would disable checks entirely
        self.cancel_check_interval = n.max(1);
        self
    }
}
