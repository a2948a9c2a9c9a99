use super::*;
use crate::render::layer::Layer;

fn canvas() -> Canvas {
    Canvas::new(400, 300).unwrap()
}

#[test]
fn intensity_is_clamped() {
    assert_eq!(clamp_intensity(0), 1);
    assert_eq!(clamp_intensity(-4), 1);
    assert_eq!(clamp_intensity(7), 7);
    assert_eq!(clamp_intensity(99), 10);
}

#[test]
fn sprite_count_follows_intensity() {
    let mut mood = MoodText::default();
    let mut rng = SceneRng::new(1);
    mood.set_text("drifting");
    mood.set_intensity(7);
    mood.rebuild(&mut rng, canvas());
    assert_eq!(mood.sprites().len(), 7);
    mood.set_intensity(42);
    mood.rebuild(&mut rng, canvas());
    assert_eq!(mood.sprites().len(), 10);
}

#[test]
fn blank_text_has_no_sprites() {
    let mut mood = MoodText::default();
    let mut rng = SceneRng::new(1);
    mood.set_text("   ");
    mood.rebuild(&mut rng, canvas());
    assert!(mood.sprites().is_empty());
}

#[test]
fn sprites_stay_inside_margins() {
    let mut mood = MoodText::default();
    let mut rng = SceneRng::new(3);
    mood.set_text("x");
    mood.set_intensity(10);
    mood.rebuild(&mut rng, canvas());
    for s in mood.sprites() {
        assert!((45.0..355.0).contains(&s.base.x));
        assert!((45.0..255.0).contains(&s.base.y));
        assert!((24.0..66.0).contains(&s.radius));
        assert!((0.35..0.9).contains(&s.speed));
    }
}

#[test]
fn rebuild_is_seed_deterministic() {
    let build = |seed| {
        let mut mood = MoodText::default();
        let mut rng = SceneRng::new(seed);
        mood.set_text("calm");
        mood.rebuild(&mut rng, canvas());
        mood.sprites().to_vec()
    };
    assert_eq!(build(11), build(11));
    assert_ne!(build(11), build(12));
}

#[test]
fn pose_oscillates_within_bounds() {
    let sprite = MoodSprite {
        base: Point::new(100.0, 100.0),
        radius: 40.0,
        angle_offset: 0.3,
        scale_phase: 1.0,
        alpha_phase: 2.0,
        speed: 0.5,
    };
    for i in 0..500 {
        let (at, alpha, scale) = sprite.pose(i as f64 * 7.3);
        assert!((at.x - 100.0).abs() <= 40.0 + 1e-9);
        assert!((at.y - 100.0).abs() <= 24.0 + 1e-9);
        assert!((20.0..=160.0).contains(&alpha));
        assert!((0.72..=1.08).contains(&scale));
    }
    let (at, _, _) = sprite.pose(0.0);
    assert!((at.x - (100.0 + 0.3f64.cos() * 40.0)).abs() < 1e-9);
}

#[test]
fn draw_without_font_paints_nothing() {
    let mut mood = MoodText::default();
    let mut rng = SceneRng::new(1);
    mood.set_text("hello");
    mood.rebuild(&mut rng, canvas());
    let mut layer = Layer::new(canvas()).unwrap();
    let mut painter = Painter::for_layer(&layer);
    assert!(!mood.draw(&mut painter, canvas(), 10.0));
    assert!(!mood.draw(&mut painter, canvas(), 11.0));
    painter.finish(&mut layer);
    assert!(layer.is_blank());
}
