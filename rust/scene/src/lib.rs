// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Floor plan detections to 3D viewer scene files
//!
//! This crate turns the output of a floor plan object detector into the JSON
//! assets a 3D viewer loads:
//! 1. Classify each detection's label into wall, door, window or furniture
//! 2. Project its pixel box into a geometry record
//! 3. Group the records by category, keeping detection order
//! 4. Write `walls.json`, `doors.json`, `windows.json` and `furniture.json`
//!
//! Two output schemas exist and are selected with [`Profile`]:
//! - [`Profile::Flat`]: `{x, y, width, height}` in pixel space
//! - [`Profile::Scene`]: `{position: {x, y, z}, size: {width, height, depth}}`
//!   on the ground plane with a fixed extrusion height
//!
//! # Usage
//!
//! ```rust,ignore
//! use floorplan_lite_scene::{convert, ConvertOptions, JsonDetections, Profile};
//!
//! let options = ConvertOptions::new("public/assets", Profile::scene());
//! let report = convert(&JsonDetections::new("detections.json"), &options)?;
//! println!("populated: {:?}", report.populated());
//! ```

pub mod bundle;
pub mod classifier;
pub mod error;
pub mod labels;
pub mod legacy;
pub mod projector;
pub mod serializer;
pub mod source;
pub mod types;

// Re-export commonly used types and functions
pub use bundle::{build, build_with_report, ConversionReport};
pub use classifier::classify;
pub use error::{Error, Result};
pub use labels::{LabelTable, FLOOR_PLAN_LABELS, UNKNOWN_LABEL};
pub use legacy::{adapt_walls, adapt_walls_file, WallEndpoints, WallSegment};
pub use projector::project;
pub use serializer::{render, serialize};
pub use source::{
    default_min_confidence, filter_by_confidence, retain_labels, validate_detections,
    DetectionSource, JsonDetections,
};
pub use types::{
    BoundingBox, Category, Detection, FlatRecord, GeometryRecord, Profile, SceneBundle,
    SceneOptions, SceneRecord, UnmatchedPolicy, DEFAULT_FIXED_HEIGHT,
};

use std::path::PathBuf;

/// Everything one conversion run needs; nothing is read from global state
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    pub label_table: LabelTable,
    pub profile: Profile,
    pub output_dir: PathBuf,
}

impl ConvertOptions {
    /// Options using the floor plan detector's label table
    pub fn new(output_dir: impl Into<PathBuf>, profile: Profile) -> Self {
        Self {
            label_table: LabelTable::floor_plan(),
            profile,
            output_dir: output_dir.into(),
        }
    }
}

/// Full pipeline: read detections, build the bundle and write the viewer files
///
/// The source is expected to be filtered already (confidence, label
/// selection). A box with a non-finite coordinate rejects the whole batch
/// before anything is written. Returns the run's report with the written
/// file paths.
pub fn convert<S>(source: &S, options: &ConvertOptions) -> Result<ConversionReport>
where
    S: DetectionSource + ?Sized,
{
    let detections = source.detections()?;
    validate_detections(&detections)?;
    let (bundle, mut report) = build_with_report(&detections, &options.label_table, &options.profile);
    report.files = serialize(&bundle, &options.output_dir)?;

    tracing::info!(
        profile = options.profile.name(),
        output_dir = %options.output_dir.display(),
        records = bundle.len(),
        dropped = report.dropped,
        "Conversion complete"
    );
    Ok(report)
}
