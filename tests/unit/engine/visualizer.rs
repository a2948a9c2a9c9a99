use std::io::Cursor;

use super::*;
use crate::params::controls::SELECTION_DEFAULT;
use crate::particles::fragment::{INITIAL_FRAGMENTS, MAX_FRAGMENT_TARGET};

fn config(w: u32, h: u32) -> EngineConfig {
    EngineConfig {
        width: w,
        height: h,
        seed: 7,
        ..EngineConfig::default()
    }
}

fn gradient(w: u32, h: u32) -> SourceImage {
    let mut rgba = Vec::with_capacity((w * h * 4) as usize);
    for y in 0..h {
        for x in 0..w {
            rgba.extend_from_slice(&[(x % 256) as u8, (y % 256) as u8, 90, 255]);
        }
    }
    SourceImage::from_straight_rgba8(w, h, rgba).unwrap()
}

fn png_bytes(w: u32, h: u32) -> Vec<u8> {
    let img = ::image::RgbaImage::from_pixel(w, h, ::image::Rgba([10, 200, 30, 255]));
    let mut buf = Vec::new();
    ::image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), ::image::ImageFormat::Png)
        .unwrap();
    buf
}

fn pool_of(n: usize) -> ReferencePool {
    ReferencePool::from_images((0..n).map(|i| (format!("img{i}.png"), gradient(32 + i as u32, 24))))
}

fn vis(w: u32, h: u32) -> Visualizer {
    Visualizer::new(&config(w, h), ReferencePool::empty(), None).unwrap()
}

#[test]
fn frame_advances_counters_and_time_base() {
    let mut v = vis(64, 48);
    let frame = v.frame().unwrap();
    assert_eq!((frame.width, frame.height), (64, 48));
    assert_eq!(v.frame_count(), 1);
    assert!((v.t_base() - T_BASE_STEP).abs() < 1e-12);

    v.set_time_speed(2.0);
    v.frame().unwrap();
    assert!((v.t_base() - 3.0 * T_BASE_STEP).abs() < 1e-12);
}

#[test]
fn background_is_solid_until_a_preset_is_chosen() {
    let mut v = vis(64, 48);
    v.set_bg_color(Rgb8 { r: 200, g: 40, b: 10 });
    let frame = v.frame().unwrap();
    let px = frame.pixel(32, 24).unwrap();
    assert_eq!(px[3], 255);
    assert!(px[0].abs_diff(200) <= 1 && px[1].abs_diff(40) <= 1 && px[2].abs_diff(10) <= 1);
    assert_eq!(v.preset(), None);

    v.select_preset("Blocks");
    assert_eq!(v.preset(), Some(Preset::Blocks));
}

#[test]
fn unknown_preset_falls_back_to_calm() {
    let mut v = vis(64, 48);
    assert_eq!(v.select_preset("nope"), Preset::Calm);
    assert_eq!(v.answers().visual.as_deref(), Some("Calm"));
}

#[test]
fn scene_image_seeds_initial_fragments() {
    let mut v = vis(200, 150);
    v.set_scene_image(gradient(200, 150));
    let expected = trunc_count(INITIAL_FRAGMENTS * FragmentControls::default().amount);
    assert_eq!(v.fragments().len(), expected);
    v.run_frames(3).unwrap();
    assert!(v.fragments().len() >= expected);
}

#[test]
fn click_needs_a_scene_image_and_a_point_on_canvas() {
    let mut v = vis(200, 150);
    assert!(!v.click(Point::new(50.0, 50.0)));
    v.set_scene_image(gradient(200, 150));
    let before = v.fragments().len();
    assert!(v.click(Point::new(50.0, 50.0)));
    assert!(!v.click(Point::new(500.0, 50.0)));
    assert_eq!(v.fragments().len(), before + 1);
}

#[test]
fn fragment_count_adjusts_from_the_end() {
    let mut v = vis(200, 150);
    v.adjust_fragment_count(5.0);
    assert!(v.fragments().is_empty());

    v.set_scene_image(gradient(200, 150));
    v.adjust_fragment_count(20.0);
    assert_eq!(v.fragments().len(), 20);
    let kept: Vec<_> = v.fragments().iter().take(6).map(|f| f.anchor()).collect();
    v.adjust_fragment_count(6.0);
    let after: Vec<_> = v.fragments().iter().map(|f| f.anchor()).collect();
    assert_eq!(kept, after);
}

#[test]
fn huge_fragment_target_is_capped() {
    let mut v = vis(200, 150);
    v.set_scene_image(gradient(200, 150));
    v.adjust_fragment_count(1e9);
    assert_eq!(v.fragments().len(), MAX_FRAGMENT_TARGET);
}

#[test]
fn time_speed_is_clamped() {
    let mut v = vis(200, 150);
    v.set_time_speed(1e300);
    assert_eq!(v.time_speed(), TIME_SPEED_MAX);
    v.set_time_speed(-3.0);
    assert_eq!(v.time_speed(), 0.0);
    v.set_time_speed(f64::NAN);
    assert_eq!(v.time_speed(), 0.0);
}

#[test]
fn helper_count_is_clamped_and_needs_a_scene_image() {
    let mut v = Visualizer::new(&config(200, 150), pool_of(3), None).unwrap();
    v.adjust_helper_count(4.0);
    assert!(v.helpers().is_empty());

    v.set_scene_image(gradient(200, 150));
    v.adjust_helper_count(40.0);
    assert_eq!(v.helpers().len(), 8);
    v.adjust_helper_count(0.0);
    assert_eq!(v.helpers().len(), 1);
    assert!(v.helpers().iter().all(|h| h.pool_index().is_some()));
}

#[test]
fn random_set_takes_scene_and_three_tagged_helpers() {
    let mut v = Visualizer::new(&config(200, 150), pool_of(6), None).unwrap();
    assert!(v.load_random_set());
    assert!(v.scene_image().is_some());
    assert_eq!(v.helpers().len(), RANDOM_SET_SIZE - 1);
    assert!(v.helpers().iter().all(|h| h.pool_name().is_some()));

    let mut empty = vis(64, 48);
    assert!(!empty.load_random_set());
}

#[test]
fn loaded_bytes_become_scene_and_helpers() {
    let mut v = vis(120, 90);
    v.load_image_bytes(vec![
        LoadSource::Bytes {
            label: Some("scene".into()),
            bytes: png_bytes(40, 30),
        },
        LoadSource::Bytes {
            label: None,
            bytes: png_bytes(20, 20),
        },
    ]);
    assert!(v.wait_for_loads(Duration::from_secs(10)));
    assert_eq!(v.scene_image().map(|i| i.width()), Some(40));
    assert_eq!(v.helpers().len(), 1);
    assert_eq!(v.helpers().iter().next().and_then(|h| h.pool_index()), None);
}

#[test]
fn undecodable_load_leaves_state_unchanged() {
    let mut v = vis(120, 90);
    v.set_scene_image(gradient(120, 90));
    let before = v.fragments().len();
    v.load_image_bytes(vec![LoadSource::Bytes {
        label: None,
        bytes: b"garbage".to_vec(),
    }]);
    assert!(!v.wait_for_loads(Duration::from_secs(10)));
    assert_eq!(v.scene_image().map(|i| i.width()), Some(120));
    assert_eq!(v.fragments().len(), before);
}

#[test]
fn image_answer_requires_a_scene_image() {
    let mut v = vis(64, 48);
    assert!(matches!(
        v.answer("image", serde_json::json!(true)),
        Err(DreamError::Validation(_))
    ));
    assert_eq!(v.current_question(), Some("ownerName"));

    v.answer("ownerName", serde_json::json!("  Ada ")).unwrap();
    assert_eq!(v.answers().owner_name.as_deref(), Some("Ada"));
    assert_eq!(v.current_question(), Some("image"));
    assert!(v.answer("ownerName", serde_json::json!("")).is_err());
}

#[test]
fn finishing_questions_leaves_build_mode_once_an_image_exists() {
    let mut v = vis(120, 90);
    v.finish_questions();
    assert!(v.is_build_mode());
    v.set_scene_image(gradient(120, 90));
    assert!(!v.is_build_mode());
    assert_eq!(v.current_question(), None);
}

#[test]
fn drag_only_draws_while_drawing_is_on() {
    let mut v = vis(120, 90);
    v.drag(Point::new(10.0, 10.0), Point::new(80.0, 40.0));
    assert!(v.sketch().is_empty());
    v.set_drawing(true);
    v.drag(Point::new(10.0, 10.0), Point::new(80.0, 40.0));
    assert!(!v.sketch().is_empty());
    assert!(v.sketch().len() <= v.sketch().max());
}

#[test]
fn wheel_and_zoom_inputs() {
    let mut v = vis(64, 48);
    v.wheel(100.0);
    assert_eq!(v.selection_size(), 110.0);
    v.wheel(-1e9);
    assert_eq!(v.selection_size(), 260.0);

    v.toggle_zoom();
    v.frame().unwrap();
    assert!(v.zoom().factor > 1.0);
}

#[test]
fn resize_recreates_layers() {
    let mut v = vis(64, 48);
    v.set_scene_image(gradient(64, 48));
    let canvas = Canvas::new(96, 72).unwrap();
    v.resize(canvas).unwrap();
    assert_eq!(v.canvas(), canvas);
    assert_eq!(v.layers().presented.canvas(), canvas);
    let frame = v.frame().unwrap();
    assert_eq!((frame.width, frame.height), (96, 72));
}

#[test]
fn reset_returns_to_a_fresh_session() {
    let mut v = vis(120, 90);
    v.set_scene_image(gradient(120, 90));
    v.select_preset("Burst");
    v.wheel(300.0);
    v.fragment_controls_mut().amount = 2.5;
    v.add_palette_color();
    let palette_len = v.palette().len();
    v.run_frames(2).unwrap();

    v.reset();
    assert!(v.scene_image().is_none());
    assert!(v.fragments().is_empty());
    assert_eq!(v.step(), 0);
    assert_eq!(v.answers(), &Answers::default());
    assert_eq!(v.selection_size(), SELECTION_DEFAULT);
    assert_eq!(v.t_base(), 0.0);
    assert_eq!(v.palette().len(), palette_len);
    let mut calm = VisualParams::default();
    Preset::Calm.apply(&mut calm);
    assert_eq!(v.visual_params(), &calm);
}

#[test]
fn palette_never_empties() {
    let mut v = vis(64, 48);
    while v.palette().len() > 1 {
        assert!(v.remove_palette_color(0));
    }
    assert!(!v.remove_palette_color(0));
    assert!(v.edit_palette_color(0, "#00ff00"));
}

#[test]
fn mood_intensity_is_clamped() {
    let mut v = vis(64, 48);
    v.set_mood_intensity(42);
    assert_eq!(v.mood().intensity(), 10);
    assert_eq!(v.answers().mood_intensity, Some(10));
    v.set_mood_text("drift");
    assert_eq!(v.answers().mood_text.as_deref(), Some("drift"));
}
