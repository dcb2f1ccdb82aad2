use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// User-editable configuration (ReadOnly by the app after load)
/// stored in `config.toml`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Backend selector, case-insensitive ("vlc" or "mpv").
    #[serde(default = "default_player")]
    pub player: String,

    /// Window width in pixels. Unset means the 800 default, an explicit
    /// value (even 0) is passed through as-is.
    #[serde(default)]
    pub width: Option<u32>,
    /// Window height in pixels. Same rules as `width`, default 600.
    #[serde(default)]
    pub height: Option<u32>,
    /// Maximize to the full display, overriding width/height.
    #[serde(default)]
    pub fullscreen: bool,

    /// Extra command-line arguments for the VLC backend, e.g. "--no-audio".
    #[serde(default)]
    pub vlc_args: Option<String>,
    /// Extra command-line flags for the mpv backend, e.g. "--no-border".
    #[serde(default)]
    pub mpv_flags: Option<String>,

    /// How often the playback poll callback fires, in milliseconds.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    #[serde(default)]
    pub debug: bool,
}

fn default_player() -> String {
    "vlc".to_string()
}

fn default_poll_interval_ms() -> u64 {
    500
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            player: default_player(),
            width: None,
            height: None,
            fullscreen: false,
            vlc_args: None,
            mpv_flags: None,
            poll_interval_ms: default_poll_interval_ms(),
            debug: false,
        }
    }
}

impl AppConfig {
    pub fn config_dir() -> PathBuf {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        home.join(".config").join("vidsync")
    }

    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    /// Load the config file, writing a default one on first run. A broken
    /// file falls back to defaults rather than aborting startup.
    pub fn load() -> Self {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => match toml::from_str(&contents) {
                Ok(config) => config,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "invalid config file, using defaults");
                    Self::default()
                }
            },
            Err(_) => {
                let config = Self::default();
                config.save_to(path);
                config
            }
        }
    }

    fn save_to(&self, path: &Path) {
        if let Some(parent) = path.parent() {
            let _ = fs::create_dir_all(parent);
        }
        match toml::to_string_pretty(self) {
            Ok(contents) => {
                if let Err(e) = fs::write(path, contents) {
                    tracing::warn!(path = %path.display(), error = %e, "could not write default config");
                }
            }
            Err(e) => tracing::warn!(error = %e, "could not serialize default config"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.player, "vlc");
        assert_eq!(config.width, None);
        assert_eq!(config.height, None);
        assert!(!config.fullscreen);
        assert_eq!(config.vlc_args, None);
        assert_eq!(config.mpv_flags, None);
        assert_eq!(config.poll_interval_ms, 500);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let config: AppConfig = toml::from_str("player = \"mpv\"\nfullscreen = true\n").unwrap();
        assert_eq!(config.player, "mpv");
        assert!(config.fullscreen);
        assert_eq!(config.width, None);
        assert_eq!(config.poll_interval_ms, 500);
    }

    #[test]
    fn test_flags_fields_parse() {
        let config: AppConfig =
            toml::from_str("vlc_args = \"--no-audio\"\nmpv_flags = \"--no-border --mute\"\n")
                .unwrap();
        assert_eq!(config.vlc_args.as_deref(), Some("--no-audio"));
        assert_eq!(config.mpv_flags.as_deref(), Some("--no-border --mute"));
    }

    #[test]
    fn test_broken_file_is_not_fatal() {
        let dir = std::env::temp_dir().join(format!("vidsync-test-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        std::fs::write(&path, "player = [not toml").unwrap();
        let config = AppConfig::load_from(&path);
        assert_eq!(config.player, "vlc");
        let _ = std::fs::remove_dir_all(&dir);
    }
}
