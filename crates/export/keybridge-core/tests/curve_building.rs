use approx::assert_relative_eq;
use keybridge_core::{
    build_curve, build_segments,
    curve::arc_length::arc_length,
    CurveData, Ease, ExportConfig, ExportError, Handle, InterpolationKind, Keyframe, KeyframeTrack,
    Segment, Value,
};
use keybridge_test_fixtures::properties;

fn handles(segment: &Segment) -> (Vec<Handle>, Vec<Handle>) {
    let (out, r#in) = segment.handles().expect("segment should carry handles");
    (out.to_vec(), r#in.to_vec())
}

#[test]
fn symmetric_ease_matching_average_speed_yields_straight_handles() {
    // 0 -> 100 over one second; both eases run at the average speed.
    let track: KeyframeTrack = properties::load("scalar-ease").expect("fixture");
    let curve = build_segments(&track, &ExportConfig::default()).expect("curve");

    assert_eq!(curve.segments.len(), 1);
    let (out, r#in) = handles(&curve.segments[0]);
    assert_eq!(out, vec![Handle::new(0.333, 0.333)]);
    assert_eq!(r#in, vec![Handle::new(0.667, 0.667)]);

    assert_eq!(curve.end.time, 1.0);
    assert_eq!(curve.end.value, Value::scalar(100.0));
    assert_eq!(curve.evaluate(0.5), Value::scalar(50.0));
}

#[test]
fn both_sides_linear_collapses_every_handle() {
    let track = KeyframeTrack::new(vec![
        Keyframe::new(0.0, Value::vec2(0.0, 10.0))
            .with_eases(Ease::new(20.0, 3.0), Ease::new(40.0, 7.0))
            .with_interpolation(InterpolationKind::Linear, InterpolationKind::Linear),
        Keyframe::new(2.0, Value::vec2(50.0, -10.0))
            .with_eases(Ease::new(60.0, -2.0), Ease::new(10.0, 1.0))
            .with_interpolation(InterpolationKind::Linear, InterpolationKind::Linear),
    ]);
    let curve = build_segments(&track, &ExportConfig::default()).unwrap();
    let segment = &curve.segments[0];
    assert!(matches!(segment, Segment::Linear { .. }));
    let (out, r#in) = handles(segment);
    assert_eq!(out.len(), 2);
    for h in out.iter().chain(r#in.iter()) {
        assert_eq!(h.x, h.y);
    }
    assert_eq!(out[0].x, 0.4);
    assert_eq!(r#in[0].x, 0.4);
}

#[test]
fn unchanged_value_falls_back_to_straight_handles() {
    let track = KeyframeTrack::new(vec![
        Keyframe::new(0.0, Value::scalar(5.0)).with_eases(Ease::default(), Ease::new(50.0, 12.0)),
        Keyframe::new(1.0, Value::scalar(5.0)).with_eases(Ease::new(25.0, -4.0), Ease::default()),
    ]);
    let curve = build_segments(&track, &ExportConfig::default()).unwrap();
    let (out, r#in) = handles(&curve.segments[0]);
    assert_eq!(out[0], Handle::new(0.5, 0.5));
    assert_eq!(r#in[0], Handle::new(0.75, 0.75));
    for h in out.iter().chain(r#in.iter()) {
        assert!(h.y.is_finite());
    }
}

#[test]
fn hold_segment_keeps_first_value_throughout() {
    let track: KeyframeTrack = properties::load("rotation-hold").expect("fixture");
    let curve = build_segments(&track, &ExportConfig::default()).unwrap();

    assert!(matches!(curve.segments[0], Segment::Hold { .. }));
    assert!(matches!(curve.segments[1], Segment::Linear { .. }));
    for i in 0..50 {
        let t = i as f64 / 100.0;
        assert_eq!(curve.evaluate(t), Value::scalar(0.0), "t = {t}");
    }
    assert_eq!(curve.evaluate(0.5), Value::scalar(45.0));
    assert_eq!(curve.evaluate(0.75), Value::scalar(67.5));
    assert_eq!(curve.evaluate(3.0), Value::scalar(90.0));
}

#[test]
fn independent_axes_get_their_own_handles() {
    let track: KeyframeTrack = properties::load("scale-per-axis").expect("fixture");
    let curve = build_segments(&track, &ExportConfig::default()).unwrap();
    let (out, r#in) = handles(&curve.segments[0]);
    assert_eq!(out, vec![Handle::new(0.75, 0.0), Handle::new(0.1, -0.1)]);
    assert_eq!(r#in, vec![Handle::new(0.25, 1.0), Handle::new(0.9, 0.9)]);
}

#[test]
fn spatial_segments_use_arc_length_and_keep_raw_tangents() {
    let track: KeyframeTrack = properties::load("position-spatial").expect("fixture");
    let curve = build_segments(&track, &ExportConfig::default()).unwrap();
    assert_eq!(curve.segments.len(), 2);

    // Straight 500px move with zero-speed eases.
    let (out, r#in) = handles(&curve.segments[0]);
    assert_eq!(out, vec![Handle::new(0.5, 0.0); 2]);
    assert_eq!(r#in, vec![Handle::new(0.5, 1.0); 2]);

    // 400px along x at 250 px/s.
    let (out, r#in) = handles(&curve.segments[1]);
    assert_eq!(out[0], Handle::new(0.167, 0.104));
    assert_eq!(r#in[0], Handle::new(0.833, 0.896));
    assert_eq!(out[0], out[1]);

    match &curve.segments[1] {
        Segment::Bezier {
            spatial_tangents: Some(tangents),
            ..
        } => {
            assert_eq!(tangents.out, vec![100.0, 0.0]);
            assert_eq!(tangents.r#in, vec![-100.0, 0.0]);
        }
        other => panic!("expected spatial bezier, got {other:?}"),
    }
}

#[test]
fn straight_spatial_path_matches_euclidean_distance() {
    let len = arc_length(&[10.0, 20.0], &[0.0, 0.0], &[310.0, 420.0], &[0.0, 0.0], 200);
    assert!((len - 500.0).abs() / 500.0 < 1e-3, "len {len}");

    // Speed equal to arc length / duration gives straight handles.
    let track = KeyframeTrack::new(vec![
        Keyframe::new(0.0, Value::vec2(0.0, 0.0))
            .with_eases(Ease::default(), Ease::new(50.0, 250.0))
            .with_spatial_tangents(vec![0.0, 0.0], vec![0.0, 0.0]),
        Keyframe::new(2.0, Value::vec2(300.0, 400.0))
            .with_eases(Ease::new(50.0, 250.0), Ease::default())
            .with_spatial_tangents(vec![0.0, 0.0], vec![0.0, 0.0]),
    ])
    .spatial();
    let curve = build_segments(&track, &ExportConfig::default()).unwrap();
    let (out, r#in) = handles(&curve.segments[0]);
    assert_eq!(out[0], Handle::new(0.5, 0.5));
    assert_eq!(r#in[0], Handle::new(0.5, 0.5));
}

#[test]
fn shapes_ease_as_one_axis_without_tangents() {
    let track: KeyframeTrack = properties::load("shape-morph").expect("fixture");
    let curve = build_segments(&track, &ExportConfig::default()).unwrap();
    match &curve.segments[0] {
        Segment::Bezier {
            out_handles,
            in_handles,
            spatial_tangents,
            ..
        } => {
            assert_eq!(out_handles, &vec![Handle::new(0.33, 0.0)]);
            assert_eq!(in_handles, &vec![Handle::new(0.67, 1.0)]);
            assert!(spatial_tangents.is_none());
        }
        other => panic!("expected bezier, got {other:?}"),
    }
    // Endpoints are the keyframe shapes.
    assert_eq!(curve.evaluate(0.0), track.keyframes[0].value);
    assert_eq!(curve.evaluate(1.0), track.keyframes[1].value);
}

#[test]
fn single_keyframe_is_static_and_empty_is_rejected() {
    let one = KeyframeTrack::new(vec![Keyframe::new(0.25, Value::scalar(7.0))]);
    match build_curve(&one, &ExportConfig::default()).unwrap() {
        CurveData::Static(point) => {
            assert_eq!(point.time, 0.25);
            assert_eq!(point.value, Value::scalar(7.0));
        }
        other => panic!("expected static, got {other:?}"),
    }
    assert_eq!(
        build_segments(&one, &ExportConfig::default()).unwrap_err(),
        ExportError::InputShape { keyframes: 1 }
    );

    let none = KeyframeTrack::default();
    assert_eq!(
        build_curve(&none, &ExportConfig::default()).unwrap_err(),
        ExportError::InputShape { keyframes: 0 }
    );
}

#[test]
fn mixed_value_kinds_are_rejected() {
    let track = KeyframeTrack::new(vec![
        Keyframe::new(0.0, Value::scalar(0.0)),
        Keyframe::new(1.0, Value::vec2(1.0, 1.0)),
    ]);
    let err = build_segments(&track, &ExportConfig::default()).unwrap_err();
    assert!(matches!(err, ExportError::ValueKindMismatch { index: 1, .. }));
}

#[test]
fn rebuilding_is_idempotent_and_times_increase() {
    let cfg = ExportConfig::default();
    for name in properties::keys() {
        let track: KeyframeTrack = properties::load(&name).expect("fixture");
        let a = build_segments(&track, &cfg).unwrap();
        let b = build_segments(&track, &cfg).unwrap();
        assert_eq!(a, b, "{name}");

        let mut times: Vec<f64> = a.segments.iter().map(Segment::start_time).collect();
        times.push(a.end.time);
        for pair in times.windows(2) {
            assert!(pair[0] < pair[1], "{name}: {times:?}");
        }
    }
}

#[test]
fn evaluated_curve_tracks_keyframe_values() {
    let track: KeyframeTrack = properties::load("position-spatial").expect("fixture");
    let curve = build_segments(&track, &ExportConfig::default()).unwrap();
    for key in &track.keyframes {
        match (curve.evaluate(key.time), &key.value) {
            (Value::Vec2(a), Value::Vec2(b)) => {
                assert_relative_eq!(a[0], b[0], epsilon = 1e-9);
                assert_relative_eq!(a[1], b[1], epsilon = 1e-9);
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}

#[test]
fn shape_vertex_count_change_is_rejected() {
    let shape = |vertices: Vec<[f64; 2]>| {
        Value::Shape(keybridge_core::ShapePath {
            vertices,
            ..Default::default()
        })
    };
    let track = KeyframeTrack::new(vec![
        Keyframe::new(0.0, shape(vec![[0.0, 0.0], [10.0, 0.0]])),
        Keyframe::new(1.0, shape(vec![[0.0, 0.0], [10.0, 0.0], [10.0, 10.0]])),
    ]);
    assert_eq!(
        build_segments(&track, &ExportConfig::default()).unwrap_err(),
        ExportError::ComponentCountMismatch {
            index: 1,
            expected: 4,
            actual: 6,
        }
    );
}
