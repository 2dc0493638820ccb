// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Grouping detections into a scene bundle

use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::classifier::classify;
use crate::labels::LabelTable;
use crate::projector::project;
use crate::types::{Category, Detection, Profile, SceneBundle};

/// Summary of one conversion run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConversionReport {
    pub profile: Profile,
    /// Detections handed to the builder
    pub detections: usize,
    /// Detections whose label matched no category
    pub dropped: usize,
    /// Detections whose class id is missing from the label table
    pub unknown_class_ids: usize,
    /// Records per category (all four categories are always present)
    pub categories: BTreeMap<Category, usize>,
    /// Detections per resolved label, dropped ones included
    pub labels: BTreeMap<String, usize>,
    /// Files written, in category order (empty until serialized)
    pub files: Vec<PathBuf>,
}

impl ConversionReport {
    fn new(profile: Profile) -> Self {
        Self {
            profile,
            detections: 0,
            dropped: 0,
            unknown_class_ids: 0,
            categories: Category::ALL.iter().map(|c| (*c, 0)).collect(),
            labels: BTreeMap::new(),
            files: Vec::new(),
        }
    }

    /// Categories that received at least one record
    pub fn populated(&self) -> Vec<Category> {
        self.categories
            .iter()
            .filter(|(_, count)| **count > 0)
            .map(|(category, _)| *category)
            .collect()
    }

    /// Per-label counts as CSV: a `Label,Count` header, one row per label
    /// in label order, `\n` line endings.
    pub fn labels_csv(&self) -> String {
        let mut csv = String::from("Label,Count\n");
        for (label, count) in &self.labels {
            csv.push_str(&csv_field(label));
            csv.push(',');
            csv.push_str(&count.to_string());
            csv.push('\n');
        }
        csv
    }
}

/// Quote a field when it holds a comma, quote or line break
fn csv_field(field: &str) -> std::borrow::Cow<'_, str> {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\"")).into()
    } else {
        field.into()
    }
}

/// Classify, project and group detections, keeping input order per category.
///
/// No deduplication, overlap resolution or confidence filtering happens here;
/// callers filter detections before handing them over.
pub fn build(detections: &[Detection], label_table: &LabelTable, profile: &Profile) -> SceneBundle {
    build_with_report(detections, label_table, profile).0
}

/// Same as [`build`], also returning per-category and per-label counts
pub fn build_with_report(
    detections: &[Detection],
    label_table: &LabelTable,
    profile: &Profile,
) -> (SceneBundle, ConversionReport) {
    let mut bundle = SceneBundle::new(*profile);
    let mut report = ConversionReport::new(*profile);
    report.detections = detections.len();

    for (index, detection) in detections.iter().enumerate() {
        let label = match label_table.get(detection.class_id) {
            Some(label) => label,
            None => {
                report.unknown_class_ids += 1;
                tracing::debug!(index, class_id = detection.class_id, "Class id not in label table");
                label_table.resolve(detection.class_id)
            }
        };
        *report.labels.entry(label.to_string()).or_default() += 1;

        let Some(category) = classify(label, profile) else {
            report.dropped += 1;
            tracing::debug!(index, label, profile = profile.name(), "Dropping unmatched detection");
            continue;
        };

        bundle.push(category, project(&detection.bbox, profile));
        *report.categories.entry(category).or_default() += 1;
    }

    tracing::debug!(
        profile = profile.name(),
        detections = report.detections,
        kept = bundle.len(),
        dropped = report.dropped,
        "Built scene bundle"
    );

    (bundle, report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BoundingBox, FlatRecord, GeometryRecord, SceneOptions, UnmatchedPolicy};

    fn det(class_id: u32, x: f64) -> Detection {
        Detection::new(class_id, 0.9, BoundingBox::new(x, 0.0, x + 10.0, 4.0))
    }

    fn flat_x(record: &GeometryRecord) -> f64 {
        match record {
            GeometryRecord::Flat(FlatRecord { x, .. }) => *x,
            GeometryRecord::Scene(scene) => scene.position.x,
        }
    }

    #[test]
    fn test_order_preserved_per_category() {
        let table = LabelTable::floor_plan();
        // A(Wall), B(Door), C(Wall)
        let detections = [det(7, 0.0), det(3, 100.0), det(7, 200.0)];

        let bundle = build(&detections, &table, &Profile::Flat);

        let walls: Vec<f64> = bundle.records(Category::Wall).iter().map(flat_x).collect();
        assert_eq!(walls, vec![5.0, 205.0]);
        assert_eq!(bundle.records(Category::Door).len(), 1);
        assert!(bundle.records(Category::Window).is_empty());
    }

    #[test]
    fn test_flat_drops_unmatched_and_unknown() {
        let table = LabelTable::floor_plan();
        // Dimension (2) and an id outside the table
        let detections = [det(2, 0.0), det(99, 10.0), det(8, 20.0)];

        let (bundle, report) = build_with_report(&detections, &table, &Profile::Flat);

        assert_eq!(bundle.len(), 1);
        assert_eq!(bundle.records(Category::Window).len(), 1);
        assert_eq!(report.dropped, 2);
        assert_eq!(report.unknown_class_ids, 1);
        assert_eq!(report.labels.get("Dimension"), Some(&1));
        assert_eq!(report.labels.get("Unknown"), Some(&1));
        assert_eq!(report.populated(), vec![Category::Window]);
    }

    #[test]
    fn test_scene_keeps_everything_as_furniture() {
        let table = LabelTable::floor_plan();
        let detections = [det(2, 0.0), det(99, 10.0), det(1, 20.0)];

        let (bundle, report) = build_with_report(&detections, &table, &Profile::scene());

        assert_eq!(bundle.len(), 3);
        assert_eq!(bundle.records(Category::Furniture).len(), 2);
        // Curtain Wall is a wall by substring
        assert_eq!(bundle.records(Category::Wall).len(), 1);
        assert_eq!(report.dropped, 0);
        assert_eq!(report.unknown_class_ids, 1);
    }

    #[test]
    fn test_scene_drop_policy_drops_unmatched() {
        let table = LabelTable::floor_plan();
        let profile = Profile::Scene(SceneOptions {
            unmatched: UnmatchedPolicy::Drop,
            ..SceneOptions::default()
        });
        let detections = [det(0, 0.0), det(7, 10.0)];

        let (bundle, report) = build_with_report(&detections, &table, &profile);

        assert_eq!(bundle.len(), 1);
        assert_eq!(report.dropped, 1);
    }

    #[test]
    fn test_no_detection_in_two_groups() {
        let table = LabelTable::floor_plan();
        let detections: Vec<Detection> = (0..9).map(|id| det(id, id as f64)).collect();

        for profile in [Profile::Flat, Profile::scene()] {
            let (bundle, report) = build_with_report(&detections, &table, &profile);
            assert_eq!(bundle.len() + report.dropped, detections.len());
            let total: usize = report.categories.values().sum();
            assert_eq!(total, bundle.len());
        }
    }

    #[test]
    fn test_labels_csv() {
        let table = LabelTable::new([(0, "Wall"), (1, "Door, \"double\""), (2, "Sofa")]);
        let detections = [det(0, 0.0), det(2, 10.0), det(0, 20.0), det(1, 30.0), det(9, 40.0)];

        let (_, report) = build_with_report(&detections, &table, &Profile::Flat);

        assert_eq!(
            report.labels_csv(),
            "Label,Count\n\"Door, \"\"double\"\"\",1\nSofa,1\nUnknown,1\nWall,2\n"
        );
    }

    #[test]
    fn test_labels_csv_empty_run() {
        let (_, report) = build_with_report(&[], &LabelTable::floor_plan(), &Profile::Flat);
        assert_eq!(report.labels_csv(), "Label,Count\n");
    }

    #[test]
    fn test_report_lists_all_categories() {
        let (_, report) = build_with_report(&[], &LabelTable::floor_plan(), &Profile::Flat);
        assert_eq!(report.categories.len(), 4);
        assert!(report.populated().is_empty());
    }
}
