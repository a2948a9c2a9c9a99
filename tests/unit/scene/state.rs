use super::*;

#[test]
fn legacy_record_with_only_an_id() {
    let s: SceneState = serde_json::from_str(r#"{"id":"dream_1_2"}"#).unwrap();
    assert_eq!(s.schema_version, LEGACY_SCHEMA_VERSION);
    assert_eq!(s.id, "dream_1_2");
    assert!(s.fragments_data.is_empty());
    assert!(s.helper_seed.is_none());
    assert_eq!(s.effective_mood_text(), "");
}

#[test]
fn missing_id_is_an_error() {
    assert!(serde_json::from_str::<SceneState>(r#"{"tBase":3}"#).is_err());
}

#[test]
fn new_records_carry_current_version() {
    let json = serde_json::to_value(SceneState::new("a")).unwrap();
    assert_eq!(json["schemaVersion"], 2);
    assert_eq!(json["id"], "a");
    assert!(json.get("thumbnail").is_none());
}

#[test]
fn camel_case_fields_decode() {
    let s: SceneState = serde_json::from_str(
        r##"{
            "id": "x",
            "answers": {"ownerName": "Ada", "visual": "Bars", "fx": {"done": true}},
            "bgColor": {"r": 1, "g": 2, "b": 3},
            "timeSpeed": 1.5,
            "tBase": 42.5,
            "visualParams": {"waveWidth": 120},
            "visualPalette": ["#000000", "#ffffff"],
            "visControls": {"fragments": {"amount": 2}},
            "fxParams": {"fragPixel": 4},
            "fragmentsData": [{"x": 1, "y": 2, "size": 100}],
            "helperIndexes": [3, -1],
            "helperNames": ["a.jpg", null],
            "helperSeed": 7, "fragmentSeed": 8, "moodSeed": 9
        }"##,
    )
    .unwrap();
    assert_eq!(s.answers.owner_name.as_deref(), Some("Ada"));
    assert_eq!(s.answers.visual.as_deref(), Some("Bars"));
    assert!(s.answers.is_answered("fx"));
    assert!(!s.answers.is_answered("imgctrl"));
    assert_eq!(s.bg_color.map(Rgb8::from), Some(Rgb8 { r: 1, g: 2, b: 3 }));
    assert_eq!(s.visual_params.unwrap().wave_width, 120.0);
    assert_eq!(s.vis_controls.unwrap().fragments.amount, 2.0);
    assert_eq!(s.vis_controls.unwrap().fragments.speed, 1.0);
    assert_eq!(s.fx_params.unwrap().frag_pixel, 4.0);
    assert_eq!(s.fragments_data[0].size, 100.0);
    let refs: Vec<_> = s.helper_refs().collect();
    assert_eq!(refs, vec![(Some("a.jpg"), 3), (None, -1)]);
    assert_eq!((s.helper_seed, s.fragment_seed, s.mood_seed), (Some(7), Some(8), Some(9)));
}

#[test]
fn unknown_answers_survive_a_round_trip() {
    let raw = r#"{"id":"x","answers":{"image":["a","b"],"time":"dusk"}}"#;
    let s: SceneState = serde_json::from_str(raw).unwrap();
    assert_eq!(s.answers.time.as_deref(), Some("dusk"));
    let back = serde_json::to_value(&s).unwrap();
    assert_eq!(back["answers"]["image"], serde_json::json!(["a", "b"]));
}

#[test]
fn mood_falls_back_to_answers() {
    let mut s = SceneState::new("m");
    s.answers.mood_text = Some("soft".into());
    s.answers.mood_intensity = Some(3);
    assert_eq!(s.effective_mood_text(), "soft");
    assert_eq!(s.effective_mood_intensity(), Some(3));
    s.mood_text = Some("loud".into());
    assert_eq!(s.effective_mood_text(), "loud");
}

#[test]
fn display_name_variants() {
    let mut s = SceneState::new("d");
    assert_eq!(s.display_name(), "dream");
    s.mood_text = Some("fog".into());
    assert_eq!(s.display_name(), "fog");
    s.answers.owner_name = Some("Kim".into());
    assert_eq!(s.display_name(), "Kim - fog");
}

#[test]
fn helper_refs_tolerate_missing_names() {
    let mut s = SceneState::new("h");
    s.helper_indexes = vec![0, 4];
    let refs: Vec<_> = s.helper_refs().collect();
    assert_eq!(refs, vec![(None, 0), (None, 4)]);
}
