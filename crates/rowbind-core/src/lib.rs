//! # Rows, Signals, and Load State
//!
//! `rowbind-core` holds the small pieces every list screen needs, independent
//! of how rows are diffed or bound:
//!
//! - `View` — a tiny row view tree (text, rows, columns, click callbacks).
//! - `Signal<T>` — observable value, used by the binder to publish list
//!   versions.
//! - `LoadState<T>` — Loading / Success / Error state of a screen's data.
//! - `Logger` / `init_logging` — tagged logging on top of `log`.
//! - `BinderConfig` — knobs for the list binder.
//!
//! ## Signals
//!
//! ```rust
//! use rowbind_core::*;
//!
//! let count = signal(0);
//! count.set(1);
//! count.update(|v| *v += 1);
//! assert_eq!(count.get(), 2);
//! ```
//!
//! ## Building a row
//!
//! ```rust
//! use rowbind_core::*;
//!
//! let row = Row().child(Text("Ada")).child(Text("36"));
//! assert_eq!(row.texts(), vec!["Ada", "36"]);
//! ```
//!
//! ## Screen state
//!
//! ```rust
//! use rowbind_core::LoadState;
//!
//! let state: LoadState<Vec<u32>> = LoadState::from_result(Ok::<_, String>(vec![1, 2]));
//! assert_eq!(state.map(|v| v.len()), LoadState::Success(2));
//! ```

pub mod config;
pub mod load_state;
pub mod logging;
pub mod signal;
pub mod tests;
pub mod view;

pub use config::*;
pub use load_state::*;
pub use logging::*;
pub use signal::*;
pub use view::*;
