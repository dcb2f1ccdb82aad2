use tokio::sync::mpsc;

use crate::error::Result;
use crate::player::PlayerBackend;

/// A playback change reported by the "what's currently playing" collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaybackEvent {
    Play,
    Pause,
    SeekTo { position_ms: u64 },
    SetSource { url: String, position_ms: u64 },
}

/// Per-tick bridge between the polling collaborator and the player backend.
///
/// The collaborator does its network I/O on its own task and pushes results
/// through the channel; the tick callback drains them here with `try_recv`,
/// so the UI-side loop never waits on the network. Events are applied in
/// the order they were sent.
pub struct SyncController {
    rx: mpsc::Receiver<PlaybackEvent>,
}

impl SyncController {
    pub fn channel(buffer: usize) -> (mpsc::Sender<PlaybackEvent>, SyncController) {
        let (tx, rx) = mpsc::channel(buffer);
        (tx, SyncController { rx })
    }

    /// Apply every pending event onto the backend without blocking. Returns
    /// how many events were handled. A failing event is logged and skipped;
    /// the next tick gets a fresh chance with newer data.
    pub fn tick(&mut self, backend: &mut dyn PlayerBackend) -> usize {
        let mut applied = 0;
        while let Ok(event) = self.rx.try_recv() {
            if let Err(e) = apply(&event, backend) {
                tracing::warn!(?event, error = %e, "failed to apply playback event");
            }
            applied += 1;
        }
        applied
    }
}

/// Push one event onto the backend.
pub fn apply(event: &PlaybackEvent, backend: &mut dyn PlayerBackend) -> Result<()> {
    match event {
        PlaybackEvent::Play => backend.start(),
        PlaybackEvent::Pause => backend.stop(),
        PlaybackEvent::SeekTo { position_ms } => backend.seek_to(*position_ms),
        PlaybackEvent::SetSource { url, position_ms } => {
            backend.set_source(url)?;
            if *position_ms > 0 {
                backend.seek_to(*position_ms)?;
            }
            Ok(())
        }
    }
}
