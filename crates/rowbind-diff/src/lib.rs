//! Edit scripts between two versions of a list.
//!
//! Rows are matched across versions with an [`ItemCallback`] identity
//! predicate. Matched rows that keep their relative order stay put; the rest
//! move, and unmatched rows are removed or inserted. Matched rows whose
//! content differs get a `Change` step so only they are rebound.
//!
//! ```rust
//! use rowbind_diff::*;
//!
//! let old = [(1, 'a'), (2, 'b')];
//! let new = [(2, 'b'), (1, 'c')];
//! let cb = KeyedCallback::new(|row: &(i32, char)| row.0);
//!
//! let diff = calculate_diff(&old, &new, &cb, DiffOptions::default());
//! assert_eq!(diff.ops(), &[ListOp::Move { from: 1, to: 0 }, ListOp::Change { position: 1, count: 1 }]);
//! ```

mod callback;
mod diff;
mod lis;
mod op;

pub use callback::{DisplayIdentity, FnCallback, ItemCallback, KeyedCallback, item_callback};
pub use diff::{DiffOptions, DiffResult, calculate_diff, calculate_diff_cancellable};
pub use op::{ListOp, ListUpdateCallback, OpLog};
