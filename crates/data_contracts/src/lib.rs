//! Shared data contracts for annotation records, class universes, and split manifests.

pub mod annotation;
pub mod manifest;

pub use annotation::{
    AnnotationRecord, ClassUniverse, InvalidAnnotation, BOX_EPSILON, DEFAULT_NUM_CLASSES,
};
pub use manifest::{
    ManifestEntry, SelectionMode, SplitKind, SubsetReport, SubsetReportSchemaVersion,
};
