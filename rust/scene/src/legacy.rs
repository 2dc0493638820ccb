// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Legacy wall file adapter.
//!
//! Older viewer assets describe walls as segments (`{start: [x, y], end: [x, y]}`)
//! while the viewer reads endpoint records (`{x1, y1, x2, y2}`). Neither is
//! the center/size schema produced by [`crate::serializer`]; the adapter only
//! renames fields and never touches the numbers, so integers stay integers.

use serde::{Deserialize, Serialize};
use serde_json::Number;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::serializer::write_replace;

/// Subdirectory (next to the input) that receives the converted file
pub const LEGACY_OUTPUT_DIR: &str = "public";

/// Wall segment in the legacy start/end schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WallSegment {
    pub start: [Number; 2],
    pub end: [Number; 2],
}

/// Wall in the x1/y1/x2/y2 endpoint schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WallEndpoints {
    pub x1: Number,
    pub y1: Number,
    pub x2: Number,
    pub y2: Number,
}

impl From<&WallSegment> for WallEndpoints {
    fn from(segment: &WallSegment) -> Self {
        let [x1, y1] = segment.start.clone();
        let [x2, y2] = segment.end.clone();
        Self { x1, y1, x2, y2 }
    }
}

/// Rename segment records into endpoint records, one to one and in order.
pub fn adapt_walls(segments: &[WallSegment]) -> Vec<WallEndpoints> {
    segments.iter().map(WallEndpoints::from).collect()
}

/// Where [`adapt_walls_file`] writes the converted copy of `input`.
pub fn legacy_output_path(input: &Path) -> PathBuf {
    input
        .parent()
        .unwrap_or_else(|| Path::new(""))
        .join(LEGACY_OUTPUT_DIR)
        .join("walls.json")
}

/// Convert a legacy `walls.json` file and write it to `public/walls.json`
/// next to the input. Returns the output path.
pub fn adapt_walls_file(input: &Path) -> Result<PathBuf> {
    let content = fs::read_to_string(input).map_err(|source| Error::Read {
        path: input.to_path_buf(),
        source,
    })?;
    let segments: Vec<WallSegment> =
        serde_json::from_str(&content).map_err(|source| Error::Parse {
            path: input.to_path_buf(),
            source,
        })?;

    let walls = adapt_walls(&segments);
    let json = serde_json::to_string_pretty(&walls).map_err(Error::EncodeLegacy)?;

    let output = legacy_output_path(input);
    if let Some(dir) = output.parent() {
        fs::create_dir_all(dir).map_err(|source| Error::CreateDir {
            path: dir.to_path_buf(),
            source,
        })?;
    }
    write_replace(&output, json.as_bytes()).map_err(|source| Error::WriteLegacy {
        path: output.clone(),
        source,
    })?;

    tracing::info!(
        walls = walls.len(),
        input = %input.display(),
        output = %output.display(),
        "Converted legacy wall file"
    );
    Ok(output)
}
