use crate::error::Result;
use crate::gui::Geometry;

/// The unified interface for any player backend. 🎛️
///
/// The rest of the app never touches a concrete player, only this surface.
/// Exactly one instance exists per run, owned by the window driver.
pub trait PlayerBackend: Send {
    /// Short lowercase backend name for logging.
    fn name(&self) -> &'static str;

    /// Open the backend's video surface with the given geometry. Called once
    /// by the window driver, before the first tick.
    fn attach(&mut self, geometry: &Geometry) -> Result<()>;

    /// Resume playback.
    fn start(&mut self) -> Result<()>;

    /// Pause playback.
    fn stop(&mut self) -> Result<()>;

    /// Jump to an absolute position.
    fn seek_to(&mut self, position_ms: u64) -> Result<()>;

    /// Last known playback position.
    fn position_ms(&mut self) -> Result<u64>;

    /// Replace the current media with `url` and start playing it.
    fn set_source(&mut self, url: &str) -> Result<()>;

    /// Whether the backend (and its window) is still around. The driver
    /// tears the tick loop down once this turns false.
    fn is_alive(&mut self) -> bool {
        true
    }
}

impl std::fmt::Debug for dyn PlayerBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlayerBackend")
            .field("name", &self.name())
            .finish()
    }
}
