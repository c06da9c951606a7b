use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Numeric drift tolerated when checking that a box stays inside the unit square.
pub const BOX_EPSILON: f64 = 1e-6;

/// Class count used when nothing else is configured.
pub const DEFAULT_NUM_CLASSES: u32 = 4;

/// The fixed set of valid class ids `{0, 1, ..., num_classes - 1}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassUniverse {
    num_classes: u32,
}

impl ClassUniverse {
    pub fn new(num_classes: u32) -> Self {
        Self { num_classes }
    }

    pub fn num_classes(&self) -> u32 {
        self.num_classes
    }

    pub fn contains(&self, class_id: i64) -> bool {
        class_id >= 0 && class_id < i64::from(self.num_classes)
    }
}

impl Default for ClassUniverse {
    fn default() -> Self {
        Self::new(DEFAULT_NUM_CLASSES)
    }
}

/// One object instance in one image, in normalized YOLO layout.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnnotationRecord {
    pub class_id: i64,
    pub x_center: f64,
    pub y_center: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Error, PartialEq)]
pub enum InvalidAnnotation {
    #[error("class id {class_id} outside 0..{num_classes}")]
    UnknownClass { class_id: i64, num_classes: u32 },
    #[error("center out of range: ({0}, {1})")]
    CenterOutOfRange(f64, f64),
    #[error("width/height out of range: ({0}, {1})")]
    SizeOutOfRange(f64, f64),
    #[error("box extends outside the image: {0:?}")]
    OutsideImage([f64; 4]),
}

impl AnnotationRecord {
    pub fn new(class_id: i64, x_center: f64, y_center: f64, width: f64, height: f64) -> Self {
        Self {
            class_id,
            x_center,
            y_center,
            width,
            height,
        }
    }

    /// Box corners as `[x_min, y_min, x_max, y_max]`.
    pub fn corners(&self) -> [f64; 4] {
        let half_w = self.width / 2.0;
        let half_h = self.height / 2.0;
        [
            self.x_center - half_w,
            self.y_center - half_h,
            self.x_center + half_w,
            self.y_center + half_h,
        ]
    }

    /// Checks class membership, then center range, then size range, then containment.
    ///
    /// Containment uses one tolerant comparison for every edge, so a box that
    /// touches the unit square exactly is accepted, and so is one that overshoots
    /// by no more than [`BOX_EPSILON`].
    pub fn validate(&self, classes: &ClassUniverse) -> Result<(), InvalidAnnotation> {
        if !classes.contains(self.class_id) {
            return Err(InvalidAnnotation::UnknownClass {
                class_id: self.class_id,
                num_classes: classes.num_classes(),
            });
        }
        if !(0.0..=1.0).contains(&self.x_center) || !(0.0..=1.0).contains(&self.y_center) {
            return Err(InvalidAnnotation::CenterOutOfRange(
                self.x_center,
                self.y_center,
            ));
        }
        let size_ok = |v: f64| v > 0.0 && v <= 1.0;
        if !size_ok(self.width) || !size_ok(self.height) {
            return Err(InvalidAnnotation::SizeOutOfRange(self.width, self.height));
        }
        let corners = self.corners();
        let inside = corners[0] >= -BOX_EPSILON
            && corners[1] >= -BOX_EPSILON
            && corners[2] <= 1.0 + BOX_EPSILON
            && corners[3] <= 1.0 + BOX_EPSILON;
        if !inside {
            return Err(InvalidAnnotation::OutsideImage(corners));
        }
        Ok(())
    }

    pub fn is_valid(&self, classes: &ClassUniverse) -> bool {
        self.validate(classes).is_ok()
    }
}

/// Label-file line layout without the trailing newline.
impl fmt::Display for AnnotationRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {:.6} {:.6} {:.6} {:.6}",
            self.class_id, self.x_center, self.y_center, self.width, self.height
        )
    }
}
