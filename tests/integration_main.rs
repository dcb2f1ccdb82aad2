use std::time::Duration;

use vidsync::config::AppConfig;
use vidsync::error::Error;
use vidsync::gui::{TickLoop, WindowSettings};
use vidsync::player;

/// Helper to create a config the way the app would after parsing the file.
fn config_with(mpv_flags: Option<&str>, vlc_args: Option<&str>) -> AppConfig {
    AppConfig {
        mpv_flags: mpv_flags.map(str::to_string),
        vlc_args: vlc_args.map(str::to_string),
        ..AppConfig::default()
    }
}

#[test]
fn test_default_config_selects_vlc() {
    let config = AppConfig::default();
    assert_eq!(config.player, "vlc");
    assert_eq!(config.poll_interval_ms, 500);
    assert!(!config.fullscreen);
}

#[test]
fn test_unknown_backend_selector_is_a_user_error() {
    let err = player::initialize_player("spotify", &AppConfig::default()).unwrap_err();
    assert!(matches!(err, Error::BackendNotFound));
    assert_eq!(
        err.to_string(),
        "The selected player isn't available. Please check your config or \
         specify one by using a valid backend selector."
    );
}

#[cfg(feature = "vlc")]
#[test]
fn test_backend_selector_is_case_insensitive() {
    for selector in ["vlc", "VLC", "Vlc"] {
        let backend = player::initialize_player(selector, &AppConfig::default()).unwrap();
        assert_eq!(backend.name(), "vlc");
    }
}

#[cfg(feature = "mpv")]
#[test]
fn test_mpv_selector_with_flags_constructs() {
    // Construction must succeed whether or not the flags field is present.
    let with_flags = config_with(Some("--no-video"), None);
    assert_eq!(
        player::initialize_player("mpv", &with_flags).unwrap().name(),
        "mpv"
    );
    let without = config_with(None, Some("--no-audio"));
    assert_eq!(
        player::initialize_player("MPV", &without).unwrap().name(),
        "mpv"
    );
}

#[test]
fn test_window_settings_resolution() {
    // No dimensions: the 800x600 default applies.
    let geometry = WindowSettings::default().resolve();
    assert_eq!((geometry.width, geometry.height), (800, 600));

    // Fullscreen wins regardless of supplied dimensions.
    let fullscreen = WindowSettings {
        width: Some(1024),
        height: Some(768),
        fullscreen: true,
    };
    assert!(fullscreen.resolve().fullscreen);
}

#[tokio::test]
async fn test_tick_loop_virtual_clock_scenario() {
    let period = Duration::from_millis(500);
    let base = tokio::time::Instant::now();

    let mut ticks = TickLoop::new(period);
    ticks.start(base);

    // First fire comes one full period after start, never synchronously.
    assert_eq!(ticks.poll(base), 0);
    assert_eq!(ticks.poll(base + period), 1);

    // Advancing by three more periods fires exactly three times, in order,
    // reported as a batch the caller runs sequentially.
    assert_eq!(ticks.poll(base + period * 4), 3);
    assert_eq!(ticks.poll(base + period * 4), 0);
}
