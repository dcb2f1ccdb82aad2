pub mod tick;

pub use tick::TickLoop;

use tokio::time::{self, Instant};

use crate::error::{Error, Result};
use crate::player::PlayerBackend;

pub const DEFAULT_WIDTH: u32 = 800;
pub const DEFAULT_HEIGHT: u32 = 600;

/// Requested window parameters, before defaults are applied. `None` means
/// "use the default"; an explicit value is passed through untouched, even 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WindowSettings {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub fullscreen: bool,
}

/// Concrete geometry handed to the player backend. When `fullscreen` is set
/// the backend maximizes to the display and ignores width/height.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Geometry {
    pub width: u32,
    pub height: u32,
    pub fullscreen: bool,
}

impl WindowSettings {
    pub fn resolve(&self) -> Geometry {
        Geometry {
            width: self.width.unwrap_or(DEFAULT_WIDTH),
            height: self.height.unwrap_or(DEFAULT_HEIGHT),
            fullscreen: self.fullscreen,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DriverState {
    WindowOpen,
    LoopRunning,
    Terminated,
}

/// Main window with whatever player backend is being used.
///
/// Owns the single backend instance for the whole run and drives the manual
/// tick loop that keeps it in sync with the outside world.
pub struct MainWindow {
    backend: Box<dyn PlayerBackend>,
    geometry: Geometry,
    state: DriverState,
}

impl MainWindow {
    /// Opens the host window by attaching the backend to the resolved
    /// geometry.
    pub fn new(mut backend: Box<dyn PlayerBackend>, settings: &WindowSettings) -> Result<Self> {
        let geometry = settings.resolve();
        tracing::info!(
            backend = backend.name(),
            width = geometry.width,
            height = geometry.height,
            fullscreen = geometry.fullscreen,
            "opening player window"
        );
        backend.attach(&geometry)?;
        Ok(Self {
            backend,
            geometry,
            state: DriverState::WindowOpen,
        })
    }

    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    pub fn backend_mut(&mut self) -> &mut dyn PlayerBackend {
        self.backend.as_mut()
    }

    /// Starts a "manual" event loop that runs `callback` every `period_ms`
    /// milliseconds, first fire one full period after the call.
    ///
    /// Everything runs on this task: the callback executes inline between
    /// timer waits, so invocations never overlap. A slow callback delays
    /// input for its duration and the missed ticks are run back to back
    /// afterwards; anything blocking belongs on another task, with only its
    /// result consumed here.
    ///
    /// The loop can be started at most once per window. The exclusive
    /// borrow already rules out a second call while it runs; a call after
    /// termination is rejected with [`Error::LoopAlreadyStarted`] rather
    /// than silently re-arming a timer. It ends when the backend's window
    /// dies or the process is interrupted; there is no pause/resume.
    pub async fn start_event_loop<F>(&mut self, mut callback: F, period_ms: u64) -> Result<()>
    where
        F: FnMut(&mut dyn PlayerBackend),
    {
        if self.state != DriverState::WindowOpen {
            return Err(Error::LoopAlreadyStarted);
        }
        self.state = DriverState::LoopRunning;

        let mut ticks = TickLoop::from_millis(period_ms);
        ticks.start(Instant::now());
        tracing::debug!(period_ms, "event loop running");

        loop {
            let Some(deadline) = ticks.next_deadline() else {
                break;
            };
            tokio::select! {
                _ = time::sleep_until(deadline) => {
                    let due = ticks.poll(Instant::now());
                    for _ in 0..due {
                        callback(self.backend.as_mut());
                    }
                    if !self.backend.is_alive() {
                        tracing::info!("player window closed, leaving event loop");
                        break;
                    }
                }
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("interrupt received, leaving event loop");
                    break;
                }
            }
        }

        self.state = DriverState::Terminated;
        Ok(())
    }
}
