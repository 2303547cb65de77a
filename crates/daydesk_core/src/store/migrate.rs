//! Structural upgrade of stored documents.
//!
//! Documents carry no schema version, so upgrades are inferred from which
//! fields are present. Every step is idempotent: upgrading a current
//! document leaves it unchanged.

use crate::config::BoardConfig;
use crate::store::{StoreError, StoreResult, UserDocument};
use log::info;
use serde_json::{json, Map, Value};

/// Counts of records touched by one upgrade pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UpgradeReport {
    /// Notes converted from a single `content` field to tabs.
    pub tabbed_notes: usize,
    /// Notes or zones that received default geometry.
    pub sized_records: usize,
}

/// Parses a stored payload, upgrading legacy shapes first.
pub fn parse_document(payload: &str, config: &BoardConfig) -> StoreResult<UserDocument> {
    let mut value: Value = serde_json::from_str(payload)?;
    let report = upgrade_document(&mut value, config)?;
    if report != UpgradeReport::default() {
        info!(
            "event=document_upgrade module=store status=ok tabbed_notes={} sized_records={}",
            report.tabbed_notes, report.sized_records
        );
    }

    // Note decoding runs `Note::validate`.
    let document: UserDocument = serde_json::from_value(value)?;
    Ok(document)
}

/// Upgrades a raw document in place.
pub fn upgrade_document(value: &mut Value, config: &BoardConfig) -> StoreResult<UpgradeReport> {
    let root = value
        .as_object_mut()
        .ok_or_else(|| StoreError::InvalidData("document root must be an object".to_string()))?;
    let mut report = UpgradeReport::default();

    if !root.contains_key("videoUrl") {
        let legacy = root.remove("youtubeUrl").unwrap_or(Value::Null);
        let url = match legacy {
            Value::String(url) => url,
            _ => String::new(),
        };
        root.insert("videoUrl".to_string(), Value::String(url));
    }

    for note in records_mut(root, "notes")? {
        if upgrade_note(note, config) {
            report.tabbed_notes += 1;
        }
        if fill_geometry(
            note,
            (config.default_note_x, config.default_note_y),
            (config.default_note_width, config.default_note_height),
        ) {
            report.sized_records += 1;
        }
    }

    for zone in records_mut(root, "zones")? {
        if !zone.get("title").is_some_and(Value::is_string) {
            zone.insert(
                "title".to_string(),
                Value::String(config.default_zone_title.clone()),
            );
        }
        if fill_geometry(
            zone,
            (config.default_zone_x, config.default_zone_y),
            (config.default_zone_width, config.default_zone_height),
        ) {
            report.sized_records += 1;
        }
    }

    Ok(report)
}

fn records_mut<'a>(
    root: &'a mut Map<String, Value>,
    key: &str,
) -> StoreResult<Vec<&'a mut Map<String, Value>>> {
    let list = root
        .entry(key.to_string())
        .or_insert_with(|| Value::Array(Vec::new()));
    if list.is_null() {
        *list = Value::Array(Vec::new());
    }
    let items = list
        .as_array_mut()
        .ok_or_else(|| StoreError::InvalidData(format!("`{key}` must be an array")))?;
    items
        .iter_mut()
        .map(|item| {
            item.as_object_mut()
                .ok_or_else(|| StoreError::InvalidData(format!("`{key}` entries must be objects")))
        })
        .collect()
}

/// Converts single-content notes to the tab shape and repairs the active
/// tab index. Returns whether the legacy conversion ran.
fn upgrade_note(note: &mut Map<String, Value>, config: &BoardConfig) -> bool {
    let legacy_content = note.remove("content");
    let has_tabs = note
        .get("tabs")
        .and_then(Value::as_array)
        .is_some_and(|tabs| !tabs.is_empty());

    let converted = match legacy_content {
        Some(content) if !has_tabs => {
            let first = match content {
                Value::String(text) => text,
                _ => String::new(),
            };
            note.insert("tabs".to_string(), default_tabs(config, first));
            note.insert("activeTabIndex".to_string(), json!(0));
            true
        }
        _ => false,
    };

    if !note
        .get("tabs")
        .and_then(Value::as_array)
        .is_some_and(|tabs| !tabs.is_empty())
    {
        note.insert("tabs".to_string(), default_tabs(config, String::new()));
    }

    let tab_count = note
        .get("tabs")
        .and_then(Value::as_array)
        .map_or(0, Vec::len);
    let index_in_range = note
        .get("activeTabIndex")
        .and_then(Value::as_u64)
        .is_some_and(|index| (index as usize) < tab_count);
    if !index_in_range {
        note.insert("activeTabIndex".to_string(), json!(0));
    }

    converted
}

fn default_tabs(config: &BoardConfig, first_content: String) -> Value {
    let tab_count = config.initial_tab_count.max(1);
    let mut first_content = Some(first_content);
    let tabs = (0..tab_count)
        .map(|index| {
            json!({
                "name": config.tab_name(index),
                "content": first_content.take().unwrap_or_default(),
            })
        })
        .collect();
    Value::Array(tabs)
}

/// Fills missing or non-numeric geometry fields. Returns whether any changed.
fn fill_geometry(record: &mut Map<String, Value>, origin: (f64, f64), size: (f64, f64)) -> bool {
    let defaults = [
        ("x", origin.0),
        ("y", origin.1),
        ("width", size.0),
        ("height", size.1),
    ];
    let mut changed = false;
    for (key, default) in defaults {
        if !record.get(key).is_some_and(Value::is_number) {
            record.insert(key.to_string(), json!(default));
            changed = true;
        }
    }
    changed
}
