// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Core types for detection-to-scene conversion

use serde::{Deserialize, Serialize};
use std::fmt;

/// Default extrusion height (viewer units) for scene records
pub const DEFAULT_FIXED_HEIGHT: u32 = 20;

/// Scene-space elevation of the ground plane
pub const GROUND_PLANE: u32 = 0;

/// Axis-aligned pixel box as reported by the detector.
///
/// The detector does not guarantee `x1 <= x2` or `y1 <= y2`, so sizes are
/// always taken as absolute differences.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct BoundingBox {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl BoundingBox {
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self { x1, y1, x2, y2 }
    }

    pub fn from_xyxy(xyxy: [f64; 4]) -> Self {
        Self::new(xyxy[0], xyxy[1], xyxy[2], xyxy[3])
    }

    pub fn center(&self) -> (f64, f64) {
        ((self.x1 + self.x2) / 2.0, (self.y1 + self.y2) / 2.0)
    }

    /// Extent along x and y, never negative
    pub fn size(&self) -> (f64, f64) {
        ((self.x2 - self.x1).abs(), (self.y2 - self.y1).abs())
    }
}

/// One detector output: a predicted class with its box
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct Detection {
    /// Index into the label table
    pub class_id: u32,
    /// Detector confidence (0.0 - 1.0); already filtered by the caller
    pub confidence: f32,
    #[serde(rename = "box")]
    pub bbox: BoundingBox,
}

impl Detection {
    pub fn new(class_id: u32, confidence: f32, bbox: BoundingBox) -> Self {
        Self {
            class_id,
            confidence,
            bbox,
        }
    }
}

/// Floor plan element group
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    Wall,
    Door,
    Window,
    Furniture,
}

impl Category {
    /// All categories, in output order
    pub const ALL: [Category; 4] = [
        Category::Wall,
        Category::Door,
        Category::Window,
        Category::Furniture,
    ];

    /// File the viewer loads this category from
    pub fn file_name(self) -> &'static str {
        match self {
            Category::Wall => "walls.json",
            Category::Door => "doors.json",
            Category::Window => "windows.json",
            Category::Furniture => "furniture.json",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Wall => "Wall",
            Category::Door => "Door",
            Category::Window => "Window",
            Category::Furniture => "Furniture",
        }
    }

    fn index(self) -> usize {
        match self {
            Category::Wall => 0,
            Category::Door => 1,
            Category::Window => 2,
            Category::Furniture => 3,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the scene profile does with labels that match no category rule
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum UnmatchedPolicy {
    /// Bucket as furniture
    #[default]
    Furniture,
    /// Drop the detection
    Drop,
}

/// Options for the 3D scene profile
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct SceneOptions {
    /// Extrusion height written to every record's `size.height`
    pub fixed_height: u32,
    pub unmatched: UnmatchedPolicy,
}

impl Default for SceneOptions {
    fn default() -> Self {
        Self {
            fixed_height: DEFAULT_FIXED_HEIGHT,
            unmatched: UnmatchedPolicy::Furniture,
        }
    }
}

/// Classification rule and output schema, chosen once per conversion
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Profile {
    /// Exact label match, 2D `{x, y, width, height}` pixel records
    Flat,
    /// Substring label match, 3D `{position, size}` records
    Scene(SceneOptions),
}

impl Profile {
    pub fn scene() -> Self {
        Profile::Scene(SceneOptions::default())
    }

    pub fn name(&self) -> &'static str {
        match self {
            Profile::Flat => "flat",
            Profile::Scene(_) => "scene",
        }
    }
}

/// 2D record: box center and extent in pixel space
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct FlatRecord {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Scene position. Pixel y maps to scene z; scene y is the ground plane.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ScenePosition {
    pub x: f64,
    pub y: u32,
    pub z: f64,
}

/// Scene extent. Pixel height maps to depth; height is the fixed extrusion.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SceneSize {
    pub width: f64,
    pub height: u32,
    pub depth: f64,
}

/// 3D record placed on the ground plane
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SceneRecord {
    pub position: ScenePosition,
    pub size: SceneSize,
}

/// One output element, in whichever schema the profile produces
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
#[serde(untagged)]
pub enum GeometryRecord {
    Flat(FlatRecord),
    Scene(SceneRecord),
}

impl GeometryRecord {
    /// Whether this record has the schema `profile` produces
    pub fn matches(&self, profile: &Profile) -> bool {
        matches!(
            (self, profile),
            (GeometryRecord::Flat(_), Profile::Flat) | (GeometryRecord::Scene(_), Profile::Scene(_))
        )
    }
}

/// Records grouped by category, in detection order.
///
/// Every record in a bundle has the schema of the bundle's profile; records
/// are only added through [`crate::bundle::build`].
#[derive(Debug, Clone, PartialEq)]
pub struct SceneBundle {
    profile: Profile,
    groups: [Vec<GeometryRecord>; 4],
}

impl SceneBundle {
    pub fn new(profile: Profile) -> Self {
        Self {
            profile,
            groups: Default::default(),
        }
    }

    pub fn profile(&self) -> Profile {
        self.profile
    }

    pub fn records(&self, category: Category) -> &[GeometryRecord] {
        &self.groups[category.index()]
    }

    pub fn len(&self) -> usize {
        self.groups.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.iter().all(Vec::is_empty)
    }

    pub(crate) fn push(&mut self, category: Category, record: GeometryRecord) {
        debug_assert!(record.matches(&self.profile));
        self.groups[category.index()].push(record);
    }
}
