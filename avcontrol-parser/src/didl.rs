//! Typed view over decoded DIDL-Lite metadata

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::state::InstanceState;

/// Metadata variable describing the current track
pub const CURRENT_TRACK_METADATA: &str = "CurrentTrackMetaData";

/// Track fields commonly carried by a DIDL-Lite item.
///
/// DIDL-Lite format example:
/// ```xml
/// <DIDL-Lite xmlns:dc="http://purl.org/dc/elements/1.1/" ...>
///   <item id="-1" parentID="-1">
///     <dc:title>Song Title</dc:title>
///     <dc:creator>Artist Name</dc:creator>
///     <upnp:album>Album Name</upnp:album>
///     <res duration="0:03:58">uri</res>
///   </item>
/// </DIDL-Lite>
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackMetadata {
    pub title: Option<String>,
    pub creator: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub album_art_uri: Option<String>,
    /// Item class (e.g., object.item.audioItem.musicTrack)
    pub class: Option<String>,
    pub genre: Option<String>,
    pub date: Option<String>,
    pub original_track_number: Option<u32>,
    /// Resource URI from the `res` element
    pub resource: Option<String>,
}

impl TrackMetadata {
    /// Builds the typed view from a decoded metadata mapping
    pub fn from_metadata(fields: &HashMap<String, String>) -> Self {
        let get = |key: &str| fields.get(key).map(|value| value.trim().to_string());

        Self {
            title: get("dc:title"),
            creator: get("dc:creator"),
            artist: get("upnp:artist"),
            album: get("upnp:album"),
            album_art_uri: get("upnp:albumArtURI"),
            class: get("upnp:class"),
            genre: get("upnp:genre"),
            date: get("dc:date"),
            original_track_number: get("upnp:originalTrackNumber")
                .and_then(|number| number.parse().ok()),
            resource: get("res"),
        }
    }

    /// Current track metadata of a decoded AVTransport event, if present
    pub fn from_instance_state(state: &InstanceState) -> Option<Self> {
        state.metadata(CURRENT_TRACK_METADATA).map(Self::from_metadata)
    }

    /// Artist if known, falling back to the creator
    pub fn performer(&self) -> Option<&str> {
        self.artist.as_deref().or(self.creator.as_deref())
    }

    /// Display string in "Artist - Title" format
    pub fn display(&self) -> String {
        match (self.performer(), self.title.as_deref()) {
            (Some(performer), Some(title)) => format!("{} - {}", performer, title),
            (None, Some(title)) => title.to_string(),
            (Some(performer), None) => performer.to_string(),
            (None, None) => "Unknown".to_string(),
        }
    }
}
