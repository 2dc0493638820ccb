// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! CLI defaults loaded from environment variables.

use floorplan_lite_scene::DEFAULT_FIXED_HEIGHT;
use std::path::PathBuf;

/// Defaults for the `convert` command; flags override every field.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory the viewer serves its assets from.
    pub output_dir: PathBuf,
    /// Output profile name (`flat` or `scene`).
    pub profile: String,
    /// Extrusion height for the scene profile.
    pub fixed_height: u32,
    /// Optional label table file replacing the built-in detector labels.
    pub labels: Option<PathBuf>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            output_dir: std::env::var("FLOORPLAN_OUTPUT_DIR")
                .unwrap_or_else(|_| "public/assets".into())
                .into(),
            profile: std::env::var("FLOORPLAN_PROFILE").unwrap_or_else(|_| "flat".into()),
            fixed_height: std::env::var("FLOORPLAN_FIXED_HEIGHT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_FIXED_HEIGHT),
            labels: std::env::var("FLOORPLAN_LABELS")
                .ok()
                .filter(|s| !s.is_empty())
                .map(PathBuf::from),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
