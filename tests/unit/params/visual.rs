use super::*;

#[test]
fn defaults_match_initial_values() {
    let p = VisualParams::default();
    assert_eq!(p.wave_width, 250.0);
    assert_eq!(p.waves_amount, 175.0);
    assert_eq!(p.amplify, 92.1);
    assert_eq!(p.frequency, 71.3);
    assert_eq!(p.noise_seed, 3135.0);
}

#[test]
fn clamped_forces_ranges() {
    let canvas = Canvas::new(400, 300).unwrap();
    let p = VisualParams {
        offset_x: 1000.0,
        offset_y: -1000.0,
        rotation: 720.0,
        smoothness: -5.0,
        speed: f64::NAN,
        frequency: f64::INFINITY,
        ..VisualParams::default()
    }
    .clamped(canvas);
    assert_eq!(p.offset_x, 200.0);
    assert_eq!(p.offset_y, -150.0);
    assert_eq!(p.rotation, 180.0);
    assert_eq!(p.smoothness, 1.0);
    assert_eq!(p.speed, 0.5);
    assert_eq!(p.frequency, 10.0);
}

#[test]
fn serde_uses_camel_case_and_defaults_missing_fields() {
    let p: VisualParams = serde_json::from_str(r#"{"waveWidth": 300, "noiseSeed": 7}"#).unwrap();
    assert_eq!(p.wave_width, 300.0);
    assert_eq!(p.noise_seed, 7.0);
    assert_eq!(p.smoothness, 5.0);

    let json = serde_json::to_value(VisualParams::default()).unwrap();
    assert!(json.get("wavesAmount").is_some());
    assert!(json.get("offsetX").is_some());
}
