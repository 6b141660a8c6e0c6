//! # Diff-aware list binding
//!
//! [`ListBinder`] shows a list of items as views and keeps rebinding to a
//! minimum when the list is replaced:
//!
//! - `submit_list` hands a complete new list over (from any thread via
//!   [`ListSubmitter`]); the diff against the displayed list runs on a
//!   background thread.
//! - `pump` (display thread) applies the newest finished diff. Older
//!   submissions still in flight are dropped, never applied.
//! - `bind_row` creates or reuses a view and calls the bind function only for
//!   rows that are new or whose content changed.
//!
//! ```rust,no_run
//! use rowbind_diff::KeyedCallback;
//! use rowbind_list::ListBinder;
//! use std::time::Duration;
//!
//! #[derive(Clone, PartialEq)]
//! struct User { id: u64, name: String }
//!
//! let mut binder = ListBinder::builder(
//!     KeyedCallback::new(|u: &User| u.id),
//!     |_view_type| Ok(String::new()),
//!     |user: &User, view: &mut String, _pos| *view = user.name.clone(),
//! )
//! .build()?;
//!
//! binder.submit_list(vec![User { id: 1, name: "Ada".into() }])?;
//! binder.wait_idle(Duration::from_secs(1));
//! binder.pump();
//! assert_eq!(binder.bind_row(0)?, "Ada");
//! # Ok::<(), rowbind_list::BinderError>(())
//! ```

pub mod binder;
pub mod differ;
pub mod error;
pub mod pool;

pub use binder::{BindFn, BindStats, HolderKey, ListBinder, ListBinderBuilder, RowHolder, ViewFactory};
pub use differ::{ListSubmitter, Waker};
pub use error::BinderError;
pub use pool::{RecyclePool, ViewType};
