//! Namespace stripping and serde parsing for the outer event layer
//!
//! GENA property sets carry an `e:` prefix on every element. Stripping the
//! prefixes lets the envelope be described with plain serde structs.
//! CDATA sections, comments and declarations are copied untouched so an
//! embedded document keeps its own namespace declarations.

use serde::de::DeserializeOwned;

use crate::error::{DecodeError, DecodeResult};

/// Parse XML into a deserializable type after stripping namespace prefixes
pub fn parse<T: DeserializeOwned>(xml: &str) -> DecodeResult<T> {
    let stripped = strip_namespaces(xml);
    quick_xml::de::from_str(&stripped).map_err(|e| DecodeError::MalformedEvent(e.to_string()))
}

/// Strip namespace prefixes and `xmlns` declarations from element tags
///
/// # Example
///
/// Input: `<e:propertyset xmlns:e="urn:schemas-upnp-org:event-1-0"><e:property/></e:propertyset>`
/// Output: `<propertyset><property/></propertyset>`
pub fn strip_namespaces(xml: &str) -> String {
    let mut result = String::with_capacity(xml.len());
    let mut rest = xml;

    while let Some(start) = rest.find('<') {
        result.push_str(&rest[..start]);
        rest = &rest[start..];

        if let Some(end) = verbatim_section_end(rest) {
            result.push_str(&rest[..end]);
            rest = &rest[end..];
            continue;
        }

        let Some(end) = find_tag_end(rest) else {
            // Unterminated tag, let the deserializer report it
            result.push_str(rest);
            return result;
        };

        result.push_str(&strip_tag(&rest[..=end]));
        rest = &rest[end + 1..];
    }

    result.push_str(rest);
    result
}

/// Length of a CDATA section, comment, declaration or processing instruction
fn verbatim_section_end(s: &str) -> Option<usize> {
    let terminator = if s.starts_with("<![CDATA[") {
        "]]>"
    } else if s.starts_with("<!--") {
        "-->"
    } else if s.starts_with("<?") {
        "?>"
    } else if s.starts_with("<!") {
        ">"
    } else {
        return None;
    };

    Some(
        s.find(terminator)
            .map(|i| i + terminator.len())
            .unwrap_or(s.len()),
    )
}

/// Index of the `>` closing the tag at the start of `s`, skipping quoted values
fn find_tag_end(s: &str) -> Option<usize> {
    let mut quote = None;
    for (i, c) in s.char_indices() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None if c == '"' || c == '\'' => quote = Some(c),
            None if c == '>' => return Some(i),
            None => {}
        }
    }
    None
}

fn local_name(name: &str) -> &str {
    name.split_once(':').map(|(_, local)| local).unwrap_or(name)
}

/// Rewrite a single `<...>` tag without prefixes or namespace declarations
fn strip_tag(tag: &str) -> String {
    let inner = &tag[1..tag.len() - 1];
    let (closing, inner) = match inner.strip_prefix('/') {
        Some(rest) => ("/", rest),
        None => ("", inner),
    };
    let (inner, self_closing) = match inner.strip_suffix('/') {
        Some(rest) => (rest, "/"),
        None => (inner, ""),
    };

    let name_end = inner.find(char::is_whitespace).unwrap_or(inner.len());
    let (name, attributes) = inner.split_at(name_end);

    let mut out = String::with_capacity(tag.len());
    out.push('<');
    out.push_str(closing);
    out.push_str(local_name(name));

    for (attr_name, value) in split_attributes(attributes) {
        if attr_name.starts_with("xmlns") {
            continue;
        }
        out.push(' ');
        out.push_str(local_name(attr_name));
        if let Some(value) = value {
            out.push('=');
            out.push_str(value);
        }
    }

    out.push_str(self_closing);
    out.push('>');
    out
}

/// Split an attribute list into `(name, quoted value)` pairs
fn split_attributes(mut s: &str) -> Vec<(&str, Option<&str>)> {
    let mut attributes = Vec::new();

    loop {
        s = s.trim_start();
        if s.is_empty() {
            break;
        }

        let name_end = s
            .find(|c: char| c == '=' || c.is_whitespace())
            .unwrap_or(s.len());
        let name = &s[..name_end];
        s = s[name_end..].trim_start();

        let Some(after_eq) = s.strip_prefix('=') else {
            attributes.push((name, None));
            continue;
        };
        let after_eq = after_eq.trim_start();

        let value_len = match after_eq.chars().next() {
            Some(q @ ('"' | '\'')) => after_eq[1..]
                .find(q)
                .map(|i| i + 2)
                .unwrap_or(after_eq.len()),
            _ => after_eq.find(char::is_whitespace).unwrap_or(after_eq.len()),
        };

        attributes.push((name, Some(&after_eq[..value_len])));
        s = &after_eq[value_len..];
    }

    attributes
}
