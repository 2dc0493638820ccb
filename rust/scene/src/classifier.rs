// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Label to category bucketing

use crate::types::{Category, Profile, SceneOptions, UnmatchedPolicy};

/// Labels the flat profile accepts, with their category
const FLAT_RULES: [(&str, Category); 8] = [
    ("Wall", Category::Wall),
    ("Door", Category::Door),
    ("Sliding Door", Category::Door),
    ("Window", Category::Window),
    ("Stair Case", Category::Furniture),
    ("Column", Category::Furniture),
    ("Curtain Wall", Category::Furniture),
    ("Railing", Category::Furniture),
];

/// Map a label to its category under `profile`.
///
/// Returns `None` when the detection should be dropped: always for unknown
/// labels in the flat profile, and in the scene profile only when its
/// unmatched policy is [`UnmatchedPolicy::Drop`].
pub fn classify(label: &str, profile: &Profile) -> Option<Category> {
    match profile {
        Profile::Flat => classify_exact(label),
        Profile::Scene(options) => classify_substring(label, options),
    }
}

fn classify_exact(label: &str) -> Option<Category> {
    FLAT_RULES
        .iter()
        .find(|(name, _)| *name == label)
        .map(|(_, category)| *category)
}

fn classify_substring(label: &str, options: &SceneOptions) -> Option<Category> {
    let lower = label.to_lowercase();

    // Door and window win over wall ("Wall Door" is a door)
    if lower.contains("door") {
        Some(Category::Door)
    } else if lower.contains("window") {
        Some(Category::Window)
    } else if lower.contains("wall") {
        Some(Category::Wall)
    } else {
        match options.unmatched {
            UnmatchedPolicy::Furniture => Some(Category::Furniture),
            UnmatchedPolicy::Drop => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::labels::FLOOR_PLAN_LABELS;

    #[test]
    fn test_flat_known_labels() {
        let flat = Profile::Flat;
        assert_eq!(classify("Wall", &flat), Some(Category::Wall));
        assert_eq!(classify("Door", &flat), Some(Category::Door));
        assert_eq!(classify("Sliding Door", &flat), Some(Category::Door));
        assert_eq!(classify("Window", &flat), Some(Category::Window));
        assert_eq!(classify("Stair Case", &flat), Some(Category::Furniture));
        assert_eq!(classify("Column", &flat), Some(Category::Furniture));
        assert_eq!(classify("Curtain Wall", &flat), Some(Category::Furniture));
        assert_eq!(classify("Railing", &flat), Some(Category::Furniture));
    }

    #[test]
    fn test_flat_drops_everything_else() {
        let flat = Profile::Flat;
        for label in ["Dimension", "wall", "WALL", "Doors", "", "Unknown", "Sofa", " Wall"] {
            assert_eq!(classify(label, &flat), None, "label {:?}", label);
        }
    }

    #[test]
    fn test_scene_door_any_case() {
        let scene = Profile::scene();
        for label in ["Door", "door", "Sliding Door", "DOOR", "Trapdoor", "Wall Door", "window door"] {
            assert_eq!(classify(label, &scene), Some(Category::Door), "label {:?}", label);
        }
    }

    #[test]
    fn test_scene_substring_rules() {
        let scene = Profile::scene();
        assert_eq!(classify("Wall", &scene), Some(Category::Wall));
        assert_eq!(classify("Curtain Wall", &scene), Some(Category::Wall));
        assert_eq!(classify("Bay WINDOW", &scene), Some(Category::Window));
        assert_eq!(classify("Column", &scene), Some(Category::Furniture));
        assert_eq!(classify("Dimension", &scene), Some(Category::Furniture));
        assert_eq!(classify("", &scene), Some(Category::Furniture));
    }

    #[test]
    fn test_scene_never_drops_floor_plan_labels() {
        let scene = Profile::scene();
        for label in FLOOR_PLAN_LABELS {
            assert!(classify(label, &scene).is_some(), "label {:?}", label);
        }
    }

    #[test]
    fn test_scene_drop_policy() {
        let scene = Profile::Scene(SceneOptions {
            unmatched: UnmatchedPolicy::Drop,
            ..SceneOptions::default()
        });
        assert_eq!(classify("Column", &scene), None);
        assert_eq!(classify("Curtain Wall", &scene), Some(Category::Wall));
    }
}
