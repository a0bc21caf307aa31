//! Normalization of remote rows into entries.
//!
//! The backend stores milestones as JSON, but rows written by older clients
//! hold them as an encoded string, and some hold `null` or garbage. Every row
//! is normalized here before a refresh adopts it, and progress is recomputed
//! from the normalized milestones.

use serde_json::{Map, Value};
use tracing::debug;
use tracker_cloud::{CloudResult, RemoteGateway, RemoteRow};
use tracker_model::{compute_progress, Entry, Milestone};

/// Fetches every remote row and normalizes it.
///
/// Rows with an empty id cannot be addressed by later upserts and are dropped.
/// Transport and payload failures are returned, not swallowed, so a refresh
/// can tell "remote unreachable" from "remote empty".
pub async fn load_remote(gateway: &dyn RemoteGateway) -> CloudResult<Vec<Entry>> {
    let rows = gateway.try_fetch_all().await?;
    let total = rows.len();
    let entries: Vec<Entry> = rows
        .into_iter()
        .filter(|row| !row.id.is_empty())
        .map(normalize_remote_entry)
        .collect();
    if entries.len() != total {
        debug!("dropped {} remote rows without an id", total - entries.len());
    }
    Ok(entries)
}

/// Turns one remote row into an entry.
///
/// A row without usable milestones gets progress 0: unlike a local toggle
/// there is no earlier in-memory value to keep.
pub fn normalize_remote_entry(row: RemoteRow) -> Entry {
    let milestones = normalize_milestones(row.milestones);
    let progress = compute_progress(&milestones).unwrap_or(0.0);
    Entry {
        id: row.id,
        kind: row.kind,
        title: row.title,
        cover_url: row.cover_url,
        theme: row.theme,
        progress,
        milestones,
    }
}

/// Coerces a raw milestones value into an ordered milestone list.
///
/// Arrays are used as-is, strings are parsed as JSON, and anything else
/// (including `null` and unparsable text) becomes empty. Elements that are
/// not objects are skipped.
pub fn normalize_milestones(raw: Value) -> Vec<Milestone> {
    let items = match raw {
        Value::Array(items) => items,
        Value::String(text) => match serde_json::from_str::<Value>(&text) {
            Ok(Value::Array(items)) => items,
            Ok(other) => {
                debug!("encoded milestones are not an array: {other}");
                Vec::new()
            }
            Err(e) => {
                debug!("unparsable encoded milestones: {e}");
                Vec::new()
            }
        },
        _ => Vec::new(),
    };

    items
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| match item {
            Value::Object(fields) => Some(milestone_from_fields(index, &fields)),
            _ => None,
        })
        .collect()
}

fn milestone_from_fields(index: usize, fields: &Map<String, Value>) -> Milestone {
    let id = match fields.get("id") {
        Some(Value::String(id)) if !id.is_empty() => id.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => format!("m{index}"),
    };
    Milestone {
        id,
        label: fields
            .get("label")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        done: fields.get("done").is_some_and(is_truthy),
        image_url: fields
            .get("imageUrl")
            .and_then(Value::as_str)
            .map(str::to_string),
    }
}

/// JSON truthiness: `false`, `null`, `0`, and `""` are false.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
