use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Common error type for the crate.
///
/// Backend errors come in two distinct classes and must stay distinct in
/// user-facing messaging: `BackendNotFound` is a config/CLI mistake the user
/// can fix by picking a valid selector, while `BackendUnavailable` means the
/// catalog advertised a backend this build or environment cannot provide.
#[derive(Debug, Error)]
pub enum Error {
    /// The selector didn't match any catalog entry.
    #[error(
        "The selected player isn't available. Please check your config or \
         specify one by using a valid backend selector."
    )]
    BackendNotFound,

    /// The selector matched a catalog entry, but the backend can't actually
    /// be used here (compiled out, or its binary is missing).
    #[error("the {name} backend is not available: {reason}")]
    BackendUnavailable { name: &'static str, reason: String },

    /// The tick loop was started a second time on the same window.
    #[error("the event loop has already been started for this window")]
    LoopAlreadyStarted,

    /// IPC with the player process failed.
    #[error("player IPC error: {0}")]
    Ipc(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub fn ipc<T: Into<String>>(msg: T) -> Self {
        Self::Ipc(msg.into())
    }
}
