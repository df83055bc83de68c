use thiserror::Error;

/// Failures that can occur while standing up the listening socket.
///
/// Every variant maps to a diagnostic logged to standard error and an
/// exit code of 1, never a panic.
#[derive(Error, Debug)]
pub enum SetupError {
    #[error("invalid port {0}: must be in 1..=65535")]
    InvalidPort(String),

    #[error("password must be non-empty")]
    EmptyPassword,

    #[error("socket: {0}")]
    Socket(#[source] std::io::Error),

    #[error("setsockopt(SO_REUSEADDR): {0}")]
    SetOpt(#[source] std::io::Error),

    #[error("bind: {0}")]
    Bind(#[source] std::io::Error),

    #[error("listen: {0}")]
    Listen(#[source] std::io::Error),

    #[error("fcntl(O_NONBLOCK): {0}")]
    NonBlocking(#[source] std::io::Error),
}
