use data_contracts::{AnnotationRecord, ClassUniverse, InvalidAnnotation, BOX_EPSILON};

fn classes() -> ClassUniverse {
    ClassUniverse::new(4)
}

#[test]
fn out_of_universe_class_rejected_even_with_good_geometry() {
    for class_id in [-3, -1, 4, 7, 1_000] {
        let rec = AnnotationRecord::new(class_id, 0.5, 0.5, 0.2, 0.2);
        let err = rec.validate(&classes()).unwrap_err();
        assert!(matches!(err, InvalidAnnotation::UnknownClass { .. }));
    }
    for class_id in 0..4 {
        assert!(AnnotationRecord::new(class_id, 0.5, 0.5, 0.2, 0.2).is_valid(&classes()));
    }
}

#[test]
fn non_positive_size_rejected() {
    let cases = [(0.0, 0.2), (0.2, 0.0), (-0.1, 0.2), (0.2, -0.5), (0.0, 0.0)];
    for (w, h) in cases {
        let rec = AnnotationRecord::new(1, 0.5, 0.5, w, h);
        assert_eq!(
            rec.validate(&classes()),
            Err(InvalidAnnotation::SizeOutOfRange(w, h))
        );
    }
}

#[test]
fn oversized_box_rejected() {
    let rec = AnnotationRecord::new(1, 0.5, 0.5, 1.2, 0.5);
    assert!(matches!(
        rec.validate(&classes()),
        Err(InvalidAnnotation::SizeOutOfRange(..))
    ));
}

#[test]
fn center_outside_unit_interval_rejected() {
    let rec = AnnotationRecord::new(1, 1.1, 0.5, 0.2, 0.2);
    assert!(matches!(
        rec.validate(&classes()),
        Err(InvalidAnnotation::CenterOutOfRange(..))
    ));
    let rec = AnnotationRecord::new(1, 0.5, -0.01, 0.2, 0.2);
    assert!(!rec.is_valid(&classes()));
}

#[test]
fn box_touching_boundary_accepted() {
    assert!(AnnotationRecord::new(0, 0.5, 0.5, 1.0, 1.0).is_valid(&classes()));
    assert!(AnnotationRecord::new(0, 0.1, 0.9, 0.2, 0.2).is_valid(&classes()));
    assert!(AnnotationRecord::new(0, 0.0, 0.0, 0.0000001, 0.0000001).is_valid(&classes()));
}

#[test]
fn drift_within_tolerance_accepted() {
    let drift = BOX_EPSILON / 2.0;
    // right edge at 1 + 5e-7
    assert!(AnnotationRecord::new(0, 0.5 + drift, 0.5, 1.0, 1.0).is_valid(&classes()));
    // top edge at -5e-7
    assert!(AnnotationRecord::new(0, 0.5, 0.5 - drift, 1.0, 1.0).is_valid(&classes()));
}

#[test]
fn drift_beyond_tolerance_rejected() {
    let drift = BOX_EPSILON * 2.0;
    let rec = AnnotationRecord::new(0, 0.5 + drift, 0.5, 1.0, 1.0);
    assert!(matches!(
        rec.validate(&classes()),
        Err(InvalidAnnotation::OutsideImage(_))
    ));
    let rec = AnnotationRecord::new(0, 0.1, 0.5, 0.4, 0.2);
    assert!(matches!(
        rec.validate(&classes()),
        Err(InvalidAnnotation::OutsideImage(_))
    ));
}

#[test]
fn record_serializes_to_json() {
    let rec = AnnotationRecord::new(3, 0.25, 0.75, 0.1, 0.2);
    let json = serde_json::to_value(rec).expect("serialize");
    assert_eq!(json["class_id"], 3);
    assert_eq!(json["width"], 0.1);
}
