//! Entry and milestone types.

use crate::progress::{clamp_progress, compute_progress};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// What kind of media an entry tracks.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    #[default]
    Game,
    Show,
}

impl EntryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Game => "game",
            Self::Show => "show",
        }
    }

    /// Parses the wire name (`"game"` / `"show"`).
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "game" => Some(Self::Game),
            "show" => Some(Self::Show),
            _ => None,
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One step of an entry ("Ep 5", "Palace 2", ...).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Milestone {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub done: bool,
    /// Optional thumbnail.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl Milestone {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            done: false,
            image_url: None,
        }
    }

    pub fn done(mut self) -> Self {
        self.done = true;
        self
    }
}

/// A tracked game or show.
///
/// Serialized in the portable export format: `type` for the kind and
/// `coverUrl` for the cover. Fields other than `id`, `type` and `title`
/// are optional on input so older snapshots keep loading.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    pub title: String,
    #[serde(default)]
    pub cover_url: String,
    /// Color token, e.g. `"#D22"`.
    #[serde(default)]
    pub theme: String,
    #[serde(default)]
    pub progress: f64,
    #[serde(default)]
    pub milestones: Vec<Milestone>,
}

impl Entry {
    /// Creates an entry with a fresh time-ordered id and no milestones.
    pub fn new(kind: EntryKind, title: impl Into<String>) -> Self {
        Self::with_id(Uuid::now_v7().to_string(), kind, title)
    }

    pub fn with_id(id: impl Into<String>, kind: EntryKind, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind,
            title: title.into(),
            cover_url: String::new(),
            theme: String::new(),
            progress: 0.0,
            milestones: Vec::new(),
        }
    }

    /// Replaces the milestone list and recomputes progress from it.
    pub fn with_milestones(mut self, milestones: Vec<Milestone>) -> Self {
        self.milestones = milestones;
        self.recompute_progress();
        self
    }

    pub fn with_cover(mut self, cover_url: impl Into<String>) -> Self {
        self.cover_url = cover_url.into();
        self
    }

    pub fn with_theme(mut self, theme: impl Into<String>) -> Self {
        self.theme = theme.into();
        self
    }

    pub fn done_count(&self) -> usize {
        self.milestones.iter().filter(|m| m.done).count()
    }

    pub fn milestone(&self, milestone_id: &str) -> Option<&Milestone> {
        self.milestones.iter().find(|m| m.id == milestone_id)
    }

    /// Returns a copy with `milestone_id` flipped and progress recomputed,
    /// or `None` if the entry has no such milestone.
    pub fn toggled(&self, milestone_id: &str) -> Option<Entry> {
        let position = self.milestones.iter().position(|m| m.id == milestone_id)?;
        let mut next = self.clone();
        let milestone = &mut next.milestones[position];
        milestone.done = !milestone.done;
        next.recompute_progress();
        Some(next)
    }

    /// Returns a copy with progress set to `p`, clamped into `[0, 1]`.
    pub fn with_progress(&self, p: f64) -> Entry {
        Entry {
            progress: clamp_progress(p),
            ..self.clone()
        }
    }

    /// Recomputes progress from milestones. An empty list leaves it untouched.
    pub fn recompute_progress(&mut self) {
        if let Some(p) = compute_progress(&self.milestones) {
            self.progress = p;
        }
    }
}
