//! Device and service type tags parsed from UPnP URNs

use serde::{Deserialize, Serialize};

/// Components of a `urn:<domain>:<category>:<type>:<version>` string
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct UrnParts<'a> {
    category: &'a str,
    type_name: &'a str,
    version: u32,
}

fn split_urn(urn: &str) -> Option<UrnParts<'_>> {
    let mut parts = urn.split(':');
    if parts.next()? != "urn" {
        return None;
    }
    let _domain = parts.next()?;
    let category = parts.next()?;
    let type_name = parts.next()?;
    let version = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }

    Some(UrnParts {
        category,
        type_name,
        version,
    })
}

/// Device types the control point knows how to model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeviceKind {
    /// Content source exposing a ContentDirectory
    MediaServer,
    /// Playback sink exposing AVTransport and RenderingControl
    MediaRenderer,
}

impl DeviceKind {
    /// Parses a device-type URN, returning the kind and its version
    ///
    /// Any URN domain is accepted; the type name decides the kind.
    pub fn from_urn(urn: &str) -> Option<(Self, u32)> {
        let parts = split_urn(urn)?;
        if parts.category != "device" {
            return None;
        }

        let kind = match parts.type_name {
            "MediaServer" => DeviceKind::MediaServer,
            "MediaRenderer" => DeviceKind::MediaRenderer,
            _ => return None,
        };
        Some((kind, parts.version))
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            DeviceKind::MediaServer => "MediaServer",
            DeviceKind::MediaRenderer => "MediaRenderer",
        }
    }

    /// Standard `schemas-upnp-org` URN for this kind
    pub fn urn(&self, version: u32) -> String {
        format!("urn:schemas-upnp-org:device:{}:{}", self.type_name(), version)
    }
}

/// Service types the control point knows how to model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ServiceKind {
    AVTransport,
    RenderingControl,
    ConnectionManager,
    ContentDirectory,
}

impl ServiceKind {
    /// Parses a service-type URN, returning the kind and its version
    pub fn from_urn(urn: &str) -> Option<(Self, u32)> {
        let parts = split_urn(urn)?;
        if parts.category != "service" {
            return None;
        }

        let kind = match parts.type_name {
            "AVTransport" => ServiceKind::AVTransport,
            "RenderingControl" => ServiceKind::RenderingControl,
            "ConnectionManager" => ServiceKind::ConnectionManager,
            "ContentDirectory" => ServiceKind::ContentDirectory,
            _ => return None,
        };
        Some((kind, parts.version))
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            ServiceKind::AVTransport => "AVTransport",
            ServiceKind::RenderingControl => "RenderingControl",
            ServiceKind::ConnectionManager => "ConnectionManager",
            ServiceKind::ContentDirectory => "ContentDirectory",
        }
    }

    /// Standard `schemas-upnp-org` URN for this kind
    pub fn urn(&self, version: u32) -> String {
        format!("urn:schemas-upnp-org:service:{}:{}", self.type_name(), version)
    }
}
