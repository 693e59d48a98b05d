//! Configuration for the playback controller

use std::time::Duration;

use crate::error::{PlayerError, Result};

/// Configuration for a [`PlaybackController`](crate::PlaybackController)
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerConfig {
    /// AVTransport instance addressed by every action
    /// Default: "0"
    pub instance_id: String,

    /// Speed passed to `Play`
    /// Default: "1"
    pub play_speed: String,

    /// Interval between position queries while playing
    /// Default: 1 second
    pub poll_interval: Duration,

    /// Remaining seconds at or below which the next stop counts as end of media
    /// Default: 1.5
    pub end_of_media_tolerance: f64,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            instance_id: "0".to_string(),
            play_speed: "1".to_string(),
            poll_interval: Duration::from_secs(1),
            end_of_media_tolerance: 1.5,
        }
    }
}

impl PlayerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Config with a sub-second poll, for renderers with short media
    pub fn fast_polling() -> Self {
        Self {
            poll_interval: Duration::from_millis(250),
            ..Default::default()
        }
    }

    /// Validate the configuration and return any issues
    pub fn validate(&self) -> Result<()> {
        if self.poll_interval == Duration::ZERO {
            return Err(PlayerError::Configuration(
                "Poll interval must be greater than 0".to_string(),
            ));
        }

        if !self.end_of_media_tolerance.is_finite() || self.end_of_media_tolerance < 0.0 {
            return Err(PlayerError::Configuration(
                "End-of-media tolerance must be a non-negative number".to_string(),
            ));
        }

        if self.instance_id.is_empty() {
            return Err(PlayerError::Configuration(
                "Instance ID must not be empty".to_string(),
            ));
        }

        Ok(())
    }

    pub fn with_instance_id(mut self, instance_id: impl Into<String>) -> Self {
        self.instance_id = instance_id.into();
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_end_of_media_tolerance(mut self, seconds: f64) -> Self {
        self.end_of_media_tolerance = seconds;
        self
    }
}
