use thiserror::Error;

#[derive(Debug, Error)]
pub enum BinderError {
    #[error("row {position} is out of bounds (list has {len} rows)")]
    PositionOutOfBounds { position: usize, len: usize },

    /// The caller's view factory failed; its error is passed through.
    #[error("view factory failed")]
    ViewFactory(#[source] anyhow::Error),

    #[error("failed to spawn diff worker")]
    WorkerSpawn(#[source] std::io::Error),

    #[error("diff worker has stopped")]
    WorkerGone,
}
