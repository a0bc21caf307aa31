//! Wire shapes exchanged with the entries proxy.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracker_model::{Entry, EntryKind, Milestone};

/// A row as the remote returns it.
///
/// Scalar fields that are missing or of the wrong type fall back to `""` or
/// `game`. Milestones stay raw: the backend stores them as JSON and older rows
/// hold them as an encoded string, so normalizing them is left to the caller.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct RemoteRow {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: String,
    #[serde(rename = "type", default, deserialize_with = "lenient_kind")]
    pub kind: EntryKind,
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: String,
    #[serde(rename = "cover_url", alias = "coverUrl", default, deserialize_with = "lenient_string")]
    pub cover_url: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub theme: String,
    #[serde(default)]
    pub milestones: Value,
}

/// A row as the proxy accepts it for upsert. `progress` is derived client-side
/// and never sent.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutgoingRow<'a> {
    pub id: &'a str,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    pub title: &'a str,
    pub cover_url: &'a str,
    pub theme: &'a str,
    pub milestones: &'a [Milestone],
}

impl<'a> From<&'a Entry> for OutgoingRow<'a> {
    fn from(entry: &'a Entry) -> Self {
        Self {
            id: &entry.id,
            kind: entry.kind,
            title: &entry.title,
            cover_url: &entry.cover_url,
            theme: &entry.theme,
            milestones: &entry.milestones,
        }
    }
}

/// Maps a collection to its upsert payload.
pub fn outgoing_rows(entries: &[Entry]) -> Vec<OutgoingRow<'_>> {
    entries.iter().map(OutgoingRow::from).collect()
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        _ => String::new(),
    })
}

fn lenient_kind<'de, D>(deserializer: D) -> Result<EntryKind, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => EntryKind::parse(&s).unwrap_or_default(),
        _ => EntryKind::default(),
    })
}
