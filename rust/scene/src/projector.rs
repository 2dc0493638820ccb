// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Pixel box to geometry record projection

use crate::types::{
    BoundingBox, FlatRecord, GeometryRecord, Profile, SceneRecord, ScenePosition, SceneSize,
    GROUND_PLANE,
};

/// Project a detector box into the record schema of `profile`.
///
/// The flat profile keeps pixel space: center and absolute extent. The scene
/// profile lays the box on the ground plane, with pixel y becoming scene z
/// and the pixel height becoming the depth; the vertical extent is the
/// profile's fixed height.
pub fn project(bbox: &BoundingBox, profile: &Profile) -> GeometryRecord {
    let (cx, cy) = bbox.center();
    let (width, height) = bbox.size();

    match profile {
        Profile::Flat => GeometryRecord::Flat(FlatRecord {
            x: cx,
            y: cy,
            width,
            height,
        }),
        Profile::Scene(options) => GeometryRecord::Scene(SceneRecord {
            position: ScenePosition {
                x: cx,
                y: GROUND_PLANE,
                z: cy,
            },
            size: SceneSize {
                width,
                height: options.fixed_height,
                depth: height,
            },
        }),
    }
}
