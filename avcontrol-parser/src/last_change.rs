//! LastChange event decoding
//!
//! A GENA event body nests up to three XML documents:
//!
//! ```xml
//! <e:propertyset xmlns:e="urn:schemas-upnp-org:event-1-0">
//!   <e:property>
//!     <LastChange>
//!       &lt;Event xmlns="urn:schemas-upnp-org:metadata-1-0/AVT/"&gt;
//!         &lt;InstanceID val="0"&gt;
//!           &lt;TransportState val="PLAYING"/&gt;
//!           &lt;CurrentTrackMetaData val="&amp;lt;DIDL-Lite ...&amp;gt;"/&gt;
//!         &lt;/InstanceID&gt;
//!       &lt;/Event&gt;
//!     </LastChange>
//!   </e:property>
//! </e:propertyset>
//! ```
//!
//! The outer property set is read with serde after stripping prefixes. The
//! `LastChange` document and any `*MetaData` DIDL-Lite documents are read as
//! namespace-aware trees, since their keys keep their qualified names.

use std::collections::HashMap;

use serde::Deserialize;
use tracing::{debug, trace, warn};
use xmltree::{Element, XMLNode};

use crate::error::{DecodeError, DecodeResult};
use crate::state::{InstanceState, StateValue};
use crate::xml_decode;

/// Namespace of DIDL-Lite metadata documents
pub const DIDL_LITE_NAMESPACE: &str = "urn:schemas-upnp-org:metadata-1-0/DIDL-Lite/";

/// Service families whose events carry a `LastChange` document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventFamily {
    AVTransport,
    RenderingControl,
}

impl EventFamily {
    /// Namespace of the `Event` root inside `LastChange`
    pub fn namespace(&self) -> &'static str {
        match self {
            EventFamily::AVTransport => "urn:schemas-upnp-org:metadata-1-0/AVT/",
            EventFamily::RenderingControl => "urn:schemas-upnp-org:metadata-1-0/RCS/",
        }
    }
}

#[derive(Debug, Deserialize)]
struct PropertySet {
    #[serde(rename = "property", default)]
    properties: Vec<Property>,
}

#[derive(Debug, Deserialize)]
struct Property {
    #[serde(rename = "LastChange", default)]
    last_change: Option<String>,
}

/// Decodes a raw event body into the state it reports
///
/// # Errors
///
/// - `MalformedEvent` if the body is not a well-formed property set
/// - `MissingLastChange` if no property carries `LastChange`
/// - `MalformedLastChange` if the embedded document does not parse
///
/// A `LastChange` whose root is not an `Event` in the family's namespace
/// decodes to an empty state. Unparsable metadata documents are skipped.
pub fn decode(raw: &[u8], family: EventFamily) -> DecodeResult<InstanceState> {
    let body = std::str::from_utf8(raw)
        .map_err(|e| DecodeError::MalformedEvent(format!("invalid UTF-8: {}", e)))?;

    let last_change = extract_last_change(body)?;
    trace!("LastChange for {:?}: {}", family, last_change);

    decode_last_change(&last_change, family)
}

pub fn decode_av_transport(raw: &[u8]) -> DecodeResult<InstanceState> {
    decode(raw, EventFamily::AVTransport)
}

pub fn decode_rendering_control(raw: &[u8]) -> DecodeResult<InstanceState> {
    decode(raw, EventFamily::RenderingControl)
}

fn extract_last_change(body: &str) -> DecodeResult<String> {
    let property_set: PropertySet = xml_decode::parse(body)?;

    property_set
        .properties
        .into_iter()
        .find_map(|property| property.last_change)
        .ok_or(DecodeError::MissingLastChange)
}

/// Decodes the text content of a `LastChange` property
pub fn decode_last_change(last_change: &str, family: EventFamily) -> DecodeResult<InstanceState> {
    let document = last_change.trim();
    if document.is_empty() {
        return Err(DecodeError::MalformedLastChange("empty document".to_string()));
    }

    let root = Element::parse(document.as_bytes())
        .map_err(|e| DecodeError::MalformedLastChange(e.to_string()))?;

    let namespace = family.namespace();
    let mut state = InstanceState::default();

    if root.name != "Event" || root.namespace.as_deref() != Some(namespace) {
        debug!(
            "LastChange root {:?} in {:?} is not a {:?} event, ignoring",
            root.name, root.namespace, family
        );
        return Ok(state);
    }

    for instance in child_elements(&root).filter(|e| in_namespace(e, "InstanceID", namespace)) {
        for variable in child_elements(instance) {
            let Some(val) = variable.attributes.get("val").filter(|v| !v.is_empty()) else {
                continue;
            };

            let key = variable_name(variable, namespace);
            if key.contains("MetaData") {
                match decode_metadata(val) {
                    Ok(fields) => state.insert(key, StateValue::Metadata(fields)),
                    Err(e) => warn!("Skipping unparsable {}: {}", key, e),
                }
            } else {
                state.insert(key, StateValue::Scalar(val.clone()));
            }
        }
    }

    debug!("Decoded {:?} event with {} variables", family, state.len());
    Ok(state)
}

/// Reads the fields of the single item in a DIDL-Lite document
///
/// A document that is well formed but has no DIDL-Lite item yields an
/// empty mapping.
pub fn decode_metadata(didl: &str) -> Result<HashMap<String, String>, xmltree::ParseError> {
    let root = Element::parse(didl.trim().as_bytes())?;
    let mut fields = HashMap::new();

    if !in_namespace(&root, "DIDL-Lite", DIDL_LITE_NAMESPACE) {
        return Ok(fields);
    }

    let item = child_elements(&root).find(|e| in_namespace(e, "item", DIDL_LITE_NAMESPACE));
    if let Some(item) = item {
        for field in child_elements(item) {
            if let Some(text) = field.get_text().filter(|t| !t.is_empty()) {
                fields.insert(qualified_name(field), text.into_owned());
            }
        }
    }

    Ok(fields)
}

fn child_elements(element: &Element) -> impl Iterator<Item = &Element> {
    element.children.iter().filter_map(XMLNode::as_element)
}

fn in_namespace(element: &Element, name: &str, namespace: &str) -> bool {
    element.name == name && element.namespace.as_deref() == Some(namespace)
}

/// State variables of the event family are keyed by local name whatever
/// prefix the document binds; foreign elements keep their qualified name
fn variable_name(element: &Element, namespace: &str) -> String {
    if element.namespace.as_deref() == Some(namespace) {
        element.name.clone()
    } else {
        qualified_name(element)
    }
}

fn qualified_name(element: &Element) -> String {
    match &element.prefix {
        Some(prefix) => format!("{}:{}", prefix, element.name),
        None => element.name.clone(),
    }
}
