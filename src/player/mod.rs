pub mod traits;

#[cfg(feature = "mpv")]
pub mod mpv;
#[cfg(feature = "vlc")]
pub mod vlc;

pub use traits::PlayerBackend;

use crate::config::AppConfig;
use crate::error::{Error, Result};

type FlagsFn = fn(&AppConfig) -> Option<&str>;
type BuildFn = fn(Option<String>) -> Result<Box<dyn PlayerBackend>>;

/// Catalog metadata describing how to construct one backend.
///
/// The catalog is a fixed table established at startup: adding a backend
/// means adding a row here, there is no runtime registration. Keys are
/// stored uppercase and must be unique; lookups uppercase the selector
/// before matching.
#[derive(Debug)]
pub struct BackendDescriptor {
    /// Uppercase selector key.
    pub key: &'static str,
    /// Typed accessor for the config field holding this backend's extra
    /// flags. Returning `None` is not an error, the backend is just
    /// constructed without extra arguments.
    flags: FlagsFn,
    /// Constructor. Fails with [`Error::BackendUnavailable`] when the
    /// backend was compiled out of this build.
    build: BuildFn,
}

/// The closed set of player backends this build knows about.
///
/// Backends compiled out via Cargo features stay listed so a selector for
/// them reports "unavailable in this build" instead of the misleading
/// "no such backend".
pub static BACKENDS: &[BackendDescriptor] = &[
    BackendDescriptor {
        key: "VLC",
        flags: vlc_flags,
        build: build_vlc,
    },
    BackendDescriptor {
        key: "MPV",
        flags: mpv_flags,
        build: build_mpv,
    },
];

fn vlc_flags(config: &AppConfig) -> Option<&str> {
    config.vlc_args.as_deref()
}

fn mpv_flags(config: &AppConfig) -> Option<&str> {
    config.mpv_flags.as_deref()
}

#[cfg(feature = "vlc")]
fn build_vlc(args: Option<String>) -> Result<Box<dyn PlayerBackend>> {
    Ok(Box::new(vlc::VlcPlayer::new(args)))
}

#[cfg(not(feature = "vlc"))]
fn build_vlc(_args: Option<String>) -> Result<Box<dyn PlayerBackend>> {
    Err(Error::BackendUnavailable {
        name: "VLC",
        reason: "this binary was built without the `vlc` feature".to_string(),
    })
}

#[cfg(feature = "mpv")]
fn build_mpv(flags: Option<String>) -> Result<Box<dyn PlayerBackend>> {
    Ok(Box::new(mpv::MpvPlayer::new(flags)))
}

#[cfg(not(feature = "mpv"))]
fn build_mpv(_flags: Option<String>) -> Result<Box<dyn PlayerBackend>> {
    Err(Error::BackendUnavailable {
        name: "MPV",
        reason: "this binary was built without the `mpv` feature".to_string(),
    })
}

fn find<'a>(catalog: &'a [BackendDescriptor], key: &str) -> Result<&'a BackendDescriptor> {
    let normalized = key.to_uppercase();
    catalog
        .iter()
        .find(|descriptor| descriptor.key == normalized)
        .ok_or(Error::BackendNotFound)
}

fn initialize_from(
    catalog: &[BackendDescriptor],
    key: &str,
    config: &AppConfig,
) -> Result<Box<dyn PlayerBackend>> {
    let descriptor = find(catalog, key)?;
    let flags = (descriptor.flags)(config).map(str::to_owned);
    tracing::debug!(
        backend = descriptor.key,
        has_flags = flags.is_some(),
        "initializing player backend"
    );
    (descriptor.build)(flags)
}

/// Pick a backend from the catalog by its case-insensitive selector and
/// construct it, passing along the config flags field named by its
/// descriptor (if set). Only the selected entry is ever constructed; the
/// others stay untouched.
pub fn initialize_player(key: &str, config: &AppConfig) -> Result<Box<dyn PlayerBackend>> {
    initialize_from(BACKENDS, key, config)
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use super::traits::PlayerBackend;
    use crate::error::Result;
    use crate::gui::Geometry;

    /// Records every capability call so tests can assert on order and
    /// arguments without a real player process.
    pub struct FakePlayer {
        pub log: Arc<Mutex<Vec<String>>>,
        alive_checks: AtomicUsize,
        alive_for: usize,
    }

    impl FakePlayer {
        pub fn new() -> Self {
            Self::alive_for(usize::MAX)
        }

        /// A fake whose `is_alive` turns false on the `ticks`-th check,
        /// letting driver tests end the loop deterministically.
        pub fn alive_for(ticks: usize) -> Self {
            Self {
                log: Arc::new(Mutex::new(Vec::new())),
                alive_checks: AtomicUsize::new(0),
                alive_for: ticks,
            }
        }

        fn record(&self, entry: String) {
            self.log.lock().unwrap().push(entry);
        }
    }

    impl PlayerBackend for FakePlayer {
        fn name(&self) -> &'static str {
            "fake"
        }

        fn attach(&mut self, geometry: &Geometry) -> Result<()> {
            self.record(format!(
                "attach {}x{} fullscreen={}",
                geometry.width, geometry.height, geometry.fullscreen
            ));
            Ok(())
        }

        fn start(&mut self) -> Result<()> {
            self.record("start".to_string());
            Ok(())
        }

        fn stop(&mut self) -> Result<()> {
            self.record("stop".to_string());
            Ok(())
        }

        fn seek_to(&mut self, position_ms: u64) -> Result<()> {
            self.record(format!("seek_to {}", position_ms));
            Ok(())
        }

        fn position_ms(&mut self) -> Result<u64> {
            Ok(0)
        }

        fn set_source(&mut self, url: &str) -> Result<()> {
            self.record(format!("set_source {}", url));
            Ok(())
        }

        fn is_alive(&mut self) -> bool {
            self.alive_checks.fetch_add(1, Ordering::SeqCst) + 1 < self.alive_for
        }
    }
}
