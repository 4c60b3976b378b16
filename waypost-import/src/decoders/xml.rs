//! XML decoder
//!
//! The document root contains repeated record elements, tagged either
//! `DATA_RECORD` or, when none of those exist, `record` as a fallback.
//! The first non-empty match wins; the two tag names are never merged.

use super::{DecodeError, RawRecord, RawRow};
use roxmltree::{Document, Node};
use std::path::Path;

const PRIMARY_RECORD_TAG: &str = "DATA_RECORD";
const FALLBACK_RECORD_TAG: &str = "record";

pub fn decode(path: &Path, source_file: &str) -> Result<Vec<RawRow>, DecodeError> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| DecodeError::FileAccess(path.to_path_buf(), e.to_string()))?;

    let document =
        Document::parse(&contents).map_err(|e| DecodeError::InvalidXml(e.to_string()))?;
    let root = document.root_element();

    let mut records: Vec<Node> = child_elements(root, PRIMARY_RECORD_TAG);
    if records.is_empty() {
        records = child_elements(root, FALLBACK_RECORD_TAG);
    }

    Ok(records
        .into_iter()
        .map(|element| {
            Ok(RawRecord {
                external_id: child_text(element, "pid", ""),
                name: child_text(element, "pname", ""),
                latitude: child_text(element, "platitude", "0"),
                longitude: child_text(element, "plongitude", "0"),
                category: child_text(element, "pcategory", ""),
                ratings: child_text(element, "pratings", ""),
                description: None,
                source_file: source_file.to_string(),
            })
        })
        .collect())
}

fn child_elements<'a>(parent: Node<'a, 'a>, tag: &str) -> Vec<Node<'a, 'a>> {
    parent
        .children()
        .filter(|node| node.is_element() && node.tag_name().name() == tag)
        .collect()
}

/// Text of the first child element with the given tag; absent elements and
/// empty text both fall back to the default
fn child_text(parent: Node, tag: &str, default: &str) -> String {
    parent
        .children()
        .find(|node| node.is_element() && node.tag_name().name() == tag)
        .and_then(|node| node.text())
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .unwrap_or(default)
        .to_string()
}
