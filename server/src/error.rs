use thiserror::Error;

/// Startup-fatal errors: the process logs these and exits non-zero rather
/// than panicking, per the propagation policy that only connection- and
/// game-level errors are recoverable.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },
    #[error("server task failed: {0}")]
    Serve(#[source] std::io::Error),
}
