//! Configuration for the control point

use std::path::PathBuf;

use avcontrol_player::PlayerConfig;

/// Key the archive is stored under by default
pub const DEFAULT_ARCHIVE_KEY: &str = "upnp-archive";

/// Configuration for a [`ControlPoint`](crate::ControlPoint)
#[derive(Debug, Clone, PartialEq)]
pub struct ControlPointConfig {
    /// Playback controller settings
    pub player: PlayerConfig,

    /// Key of the warm-start archive in its store
    /// Default: "upnp-archive"
    pub archive_key: String,

    /// Directory of the file archive store
    /// Default: None (the user cache directory)
    pub archive_dir: Option<PathBuf>,
}

impl Default for ControlPointConfig {
    fn default() -> Self {
        Self {
            player: PlayerConfig::default(),
            archive_key: DEFAULT_ARCHIVE_KEY.to_string(),
            archive_dir: None,
        }
    }
}

impl ControlPointConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_player(mut self, player: PlayerConfig) -> Self {
        self.player = player;
        self
    }

    pub fn with_archive_key(mut self, key: impl Into<String>) -> Self {
        self.archive_key = key.into();
        self
    }

    pub fn with_archive_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.archive_dir = Some(dir.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_default_config() {
        let config = ControlPointConfig::default();
        assert_eq!(config.archive_key, "upnp-archive");
        assert!(config.archive_dir.is_none());
        assert_eq!(config.player, PlayerConfig::default());
    }

    #[test]
    fn test_builder_methods() {
        let config = ControlPointConfig::new()
            .with_player(PlayerConfig::fast_polling())
            .with_archive_key("living-room")
            .with_archive_dir("/tmp/avcontrol");

        assert_eq!(config.player.poll_interval, Duration::from_millis(250));
        assert_eq!(config.archive_key, "living-room");
        assert_eq!(config.archive_dir, Some(PathBuf::from("/tmp/avcontrol")));
    }
}
