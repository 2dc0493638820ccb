// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Detection sources and caller-side filtering.
//!
//! The detector itself lives outside this crate. Anything that can hand over
//! a batch of detections implements [`DetectionSource`]; the bundled
//! [`JsonDetections`] reads the JSON a detector exported, e.g.
//!
//! ```json
//! [{"class_id": 7, "confidence": 0.91, "box": [10, 20, 50, 60]}]
//! ```
//!
//! Confidence thresholds and label selection are applied by the caller with
//! [`filter_by_confidence`] and [`retain_labels`] before the batch reaches
//! [`crate::bundle::build`].

use serde::Deserialize;
use serde_json::Value;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::labels::LabelTable;
use crate::types::{BoundingBox, Detection, Profile};

/// Confidence threshold the HTTP upload flow used for the flat profile
pub const FLAT_MIN_CONFIDENCE: f32 = 0.3;

/// Confidence threshold the offline pipeline used for the scene profile
pub const SCENE_MIN_CONFIDENCE: f32 = 0.25;

/// Default caller-side confidence threshold for `profile`
pub fn default_min_confidence(profile: &Profile) -> f32 {
    match profile {
        Profile::Flat => FLAT_MIN_CONFIDENCE,
        Profile::Scene(_) => SCENE_MIN_CONFIDENCE,
    }
}

/// Something that produces one batch of detections
pub trait DetectionSource {
    fn detections(&self) -> Result<Vec<Detection>>;
}

impl DetectionSource for Vec<Detection> {
    fn detections(&self) -> Result<Vec<Detection>> {
        validate_detections(self)?;
        Ok(self.clone())
    }
}

/// Detections exported by an external detector as a JSON array
#[derive(Debug, Clone)]
pub struct JsonDetections {
    path: PathBuf,
}

impl JsonDetections {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DetectionSource for JsonDetections {
    fn detections(&self) -> Result<Vec<Detection>> {
        let content = std::fs::read_to_string(&self.path).map_err(|source| Error::Read {
            path: self.path.clone(),
            source,
        })?;
        let values: Vec<Value> = serde_json::from_str(&content).map_err(|source| Error::Parse {
            path: self.path.clone(),
            source,
        })?;
        let detections = parse_detections(&values)?;
        tracing::debug!(
            path = %self.path.display(),
            count = detections.len(),
            "Loaded detections"
        );
        Ok(detections)
    }
}

#[derive(Debug, Deserialize)]
struct RawDetection {
    #[serde(alias = "class", alias = "cls", alias = "classId")]
    class_id: u32,
    #[serde(default = "full_confidence", alias = "conf")]
    confidence: f32,
    #[serde(rename = "box", alias = "xyxy", alias = "bbox")]
    bbox: RawBox,
}

/// Box as `[x1, y1, x2, y2]` or as an `{x1, y1, x2, y2}` object
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawBox {
    Xyxy(Vec<f64>),
    Corners { x1: f64, y1: f64, x2: f64, y2: f64 },
}

fn full_confidence() -> f32 {
    1.0
}

/// Validate a batch of raw detection objects.
///
/// The first malformed entry rejects the whole batch: missing or non-numeric
/// fields, a box that is not exactly four numbers, or a non-finite coordinate.
pub fn parse_detections(values: &[Value]) -> Result<Vec<Detection>> {
    let detections = values
        .iter()
        .enumerate()
        .map(|(index, value)| parse_detection(index, value))
        .collect::<Result<Vec<_>>>()?;
    validate_detections(&detections)?;
    Ok(detections)
}

fn parse_detection(index: usize, value: &Value) -> Result<Detection> {
    let raw = RawDetection::deserialize(value).map_err(|e| Error::InvalidInput {
        index,
        reason: e.to_string(),
    })?;

    let bbox = match raw.bbox {
        RawBox::Xyxy(coords) => {
            let xyxy: [f64; 4] = coords.as_slice().try_into().map_err(|_| Error::InvalidInput {
                index,
                reason: format!("box must have 4 coordinates, got {}", coords.len()),
            })?;
            BoundingBox::from_xyxy(xyxy)
        }
        RawBox::Corners { x1, y1, x2, y2 } => BoundingBox::new(x1, y1, x2, y2),
    };

    Ok(Detection::new(raw.class_id, raw.confidence, bbox))
}

/// Reject the batch if any box has a NaN or infinite coordinate.
pub fn validate_detections(detections: &[Detection]) -> Result<()> {
    for (index, detection) in detections.iter().enumerate() {
        let b = &detection.bbox;
        if let Some(bad) = [b.x1, b.y1, b.x2, b.y2].into_iter().find(|v| !v.is_finite()) {
            return Err(Error::InvalidInput {
                index,
                reason: format!("box coordinate {} is not finite", bad),
            });
        }
    }
    Ok(())
}

/// Keep detections with `confidence >= min_confidence`, in order
pub fn filter_by_confidence(detections: Vec<Detection>, min_confidence: f32) -> Vec<Detection> {
    let before = detections.len();
    let kept: Vec<Detection> = detections
        .into_iter()
        .filter(|d| d.confidence >= min_confidence)
        .collect();
    tracing::debug!(
        min_confidence,
        before,
        after = kept.len(),
        "Applied confidence threshold"
    );
    kept
}

/// Keep detections whose resolved label is one of `selected`, in order
pub fn retain_labels<S: AsRef<str>>(
    detections: Vec<Detection>,
    label_table: &LabelTable,
    selected: &[S],
) -> Vec<Detection> {
    detections
        .into_iter()
        .filter(|d| {
            let label = label_table.resolve(d.class_id);
            selected.iter().any(|s| s.as_ref() == label)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_detections() {
        let values = vec![
            json!({"class_id": 7, "confidence": 0.9, "box": [10, 20, 50, 60]}),
            json!({"cls": 3, "conf": 0.5, "xyxy": [1.5, 2.5, 0.5, 0.25]}),
            json!({"classId": 8, "bbox": [0, 0, 1, 1]}),
        ];

        let detections = parse_detections(&values).unwrap();

        assert_eq!(detections.len(), 3);
        assert_eq!(detections[0].class_id, 7);
        assert_eq!(detections[0].bbox, BoundingBox::new(10.0, 20.0, 50.0, 60.0));
        assert_eq!(detections[1].class_id, 3);
        assert_eq!(detections[1].confidence, 0.5);
        assert_eq!(detections[2].confidence, 1.0);
    }

    #[test]
    fn test_parse_ultralytics_export() {
        let values = vec![json!({
            "name": "Wall",
            "class": 7,
            "confidence": 0.87,
            "box": {"x1": 10.0, "y1": 20.0, "x2": 50.0, "y2": 60.0}
        })];

        let detections = parse_detections(&values).unwrap();

        assert_eq!(detections[0].class_id, 7);
        assert_eq!(detections[0].bbox, BoundingBox::new(10.0, 20.0, 50.0, 60.0));
    }

    #[test]
    fn test_incomplete_box_object_rejects_batch() {
        let values = vec![json!({"class": 7, "box": {"x1": 10.0, "y1": 20.0, "x2": 50.0}})];
        assert!(matches!(
            parse_detections(&values),
            Err(Error::InvalidInput { index: 0, .. })
        ));
    }

    #[test]
    fn test_in_memory_source_rejects_non_finite_box() {
        let source = vec![
            Detection::new(7, 0.9, BoundingBox::new(0.0, 0.0, 1.0, 1.0)),
            Detection::new(7, 0.9, BoundingBox::new(f64::NAN, 0.0, f64::INFINITY, 10.0)),
        ];
        match source.detections() {
            Err(Error::InvalidInput { index, reason }) => {
                assert_eq!(index, 1);
                assert!(reason.contains("not finite"), "{reason}");
            }
            other => panic!("expected InvalidInput, got {:?}", other),
        }
    }

    #[test]
    fn test_wrong_arity_rejects_batch() {
        let values = vec![
            json!({"class_id": 7, "box": [10, 20, 50, 60]}),
            json!({"class_id": 7, "box": [10, 20, 50]}),
        ];
        match parse_detections(&values) {
            Err(Error::InvalidInput { index, reason }) => {
                assert_eq!(index, 1);
                assert!(reason.contains("4 coordinates"), "{reason}");
            }
            other => panic!("expected InvalidInput, got {:?}", other),
        }
    }

    #[test]
    fn test_non_numeric_rejects_batch() {
        let values = vec![json!({"class_id": 7, "box": [10, "20", 50, 60]})];
        assert!(matches!(
            parse_detections(&values),
            Err(Error::InvalidInput { index: 0, .. })
        ));

        let values = vec![json!({"class_id": "wall", "box": [10, 20, 50, 60]})];
        assert!(matches!(
            parse_detections(&values),
            Err(Error::InvalidInput { index: 0, .. })
        ));

        let values = vec![json!({"class_id": 7})];
        assert!(matches!(
            parse_detections(&values),
            Err(Error::InvalidInput { index: 0, .. })
        ));
    }

    #[test]
    fn test_filter_by_confidence() {
        let bbox = BoundingBox::new(0.0, 0.0, 1.0, 1.0);
        let detections = vec![
            Detection::new(7, 0.1, bbox),
            Detection::new(3, 0.3, bbox),
            Detection::new(8, 0.95, bbox),
        ];
        let kept = filter_by_confidence(detections, FLAT_MIN_CONFIDENCE);
        let ids: Vec<u32> = kept.iter().map(|d| d.class_id).collect();
        assert_eq!(ids, vec![3, 8]);
    }

    #[test]
    fn test_default_min_confidence() {
        assert_eq!(default_min_confidence(&Profile::Flat), 0.3);
        assert_eq!(default_min_confidence(&Profile::scene()), 0.25);
    }

    #[test]
    fn test_retain_labels() {
        let table = LabelTable::floor_plan();
        let bbox = BoundingBox::new(0.0, 0.0, 1.0, 1.0);
        let detections = vec![
            Detection::new(7, 1.0, bbox),
            Detection::new(2, 1.0, bbox),
            Detection::new(8, 1.0, bbox),
            Detection::new(42, 1.0, bbox),
        ];
        let kept = retain_labels(detections, &table, &["Wall", "Window"]);
        let ids: Vec<u32> = kept.iter().map(|d| d.class_id).collect();
        assert_eq!(ids, vec![7, 8]);
    }

    #[test]
    fn test_json_detections_missing_file() {
        let source = JsonDetections::new("/nonexistent/floorplan-lite/detections.json");
        assert!(matches!(source.detections(), Err(Error::Read { .. })));
    }
}
