// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Class id to label lookup for the floor plan detector.

use rustc_hash::FxHashMap;
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::{Error, Result};

/// Label used for class ids missing from the table.
pub const UNKNOWN_LABEL: &str = "Unknown";

/// Labels of the pretrained floor plan detector, indexed by class id.
pub const FLOOR_PLAN_LABELS: [&str; 9] = [
    "Column",
    "Curtain Wall",
    "Dimension",
    "Door",
    "Railing",
    "Sliding Door",
    "Stair Case",
    "Wall",
    "Window",
];

/// Fixed mapping from detector class id to label name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelTable {
    labels: FxHashMap<u32, String>,
}

impl LabelTable {
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (u32, S)>,
        S: Into<String>,
    {
        Self {
            labels: entries.into_iter().map(|(id, s)| (id, s.into())).collect(),
        }
    }

    /// The table of the pretrained floor plan detector.
    pub fn floor_plan() -> Self {
        Self::new(
            FLOOR_PLAN_LABELS
                .iter()
                .enumerate()
                .map(|(id, label)| (id as u32, *label)),
        )
    }

    /// Load a table from a JSON object such as `{"7": "Wall", "3": "Door"}`.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| Error::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&content).map_err(|source| Error::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_json_str(content: &str) -> std::result::Result<Self, serde_json::Error> {
        // serde_json parses integer-like object keys into u32 directly
        let raw: BTreeMap<u32, String> = serde_json::from_str(content)?;
        Ok(Self::new(raw))
    }

    pub fn get(&self, class_id: u32) -> Option<&str> {
        self.labels.get(&class_id).map(String::as_str)
    }

    /// Label for `class_id`, or [`UNKNOWN_LABEL`] when the id is not in the table.
    pub fn resolve(&self, class_id: u32) -> &str {
        self.get(class_id).unwrap_or(UNKNOWN_LABEL)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Entries sorted by class id.
    pub fn entries(&self) -> Vec<(u32, &str)> {
        let mut entries: Vec<_> = self
            .labels
            .iter()
            .map(|(id, label)| (*id, label.as_str()))
            .collect();
        entries.sort_by_key(|(id, _)| *id);
        entries
    }
}

impl Default for LabelTable {
    fn default() -> Self {
        Self::floor_plan()
    }
}
