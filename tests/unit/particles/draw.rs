use super::*;
use crate::foundation::core::Canvas;
use crate::render::layer::Layer;

#[test]
fn particle_starts_near_the_point() {
    let mut rng = SceneRng::new(1);
    for _ in 0..100 {
        let p = DrawParticle::new(&mut rng, Point::new(50.0, 50.0));
        let d = p.position() - Point::new(50.0, 50.0);
        assert!(d.x.abs() <= 2.0 && d.y.abs() <= 2.0);
        assert!(p.is_alive());
    }
}

#[test]
fn particle_dies_after_its_life() {
    let mut rng = SceneRng::new(1);
    let noise = NoiseField::new(1);
    let mut p = DrawParticle::new(&mut rng, Point::new(0.0, 0.0));
    let mut frames = 0u64;
    while p.is_alive() {
        p.update(frames, &noise);
        frames += 1;
        assert!(frames <= 720);
    }
    assert!(frames >= 360);
}

#[test]
fn drag_interpolates_along_the_segment() {
    let mut rng = SceneRng::new(2);
    let noise = NoiseField::new(2);
    let mut sketch = Sketch::new(260);
    sketch.drag(&mut rng, Point::new(0.0, 0.0), Point::new(18.0, 0.0), 0, &noise);
    // 18 / 1.8 = 10 steps, endpoints included.
    assert_eq!(sketch.len(), 11);
    for p in sketch.iter() {
        let pos = p.position();
        assert!(pos.y.abs() <= 6.0);
        assert!(pos.x >= -4.0 && pos.x <= 22.0);
    }
}

#[test]
fn zero_length_drag_still_marks() {
    let mut rng = SceneRng::new(2);
    let noise = NoiseField::new(2);
    let mut sketch = Sketch::new(260);
    sketch.drag(&mut rng, Point::new(5.0, 5.0), Point::new(5.0, 5.0), 3, &noise);
    assert_eq!(sketch.len(), 2);
}

#[test]
fn population_is_capped_oldest_first() {
    let mut rng = SceneRng::new(3);
    let noise = NoiseField::new(3);
    let mut sketch = Sketch::new(20);
    sketch.drag(&mut rng, Point::new(0.0, 0.0), Point::new(100.0, 0.0), 0, &noise);
    assert_eq!(sketch.len(), 20);
    // Survivors are the tail of the stroke.
    assert!(sketch.iter().all(|p| p.position().x > 50.0));
    sketch.set_max(5);
    assert_eq!(sketch.len(), 5);
}

#[test]
fn step_paints_white_dots_and_culls() {
    let c = Canvas::new(64, 64).unwrap();
    let mut rng = SceneRng::new(4);
    let noise = NoiseField::new(4);
    let mut sketch = Sketch::new(260);
    sketch.drag(&mut rng, Point::new(32.0, 32.0), Point::new(32.0, 32.0), 0, &noise);
    let mut layer = Layer::new(c).unwrap();
    let mut painter = Painter::for_layer(&layer);
    sketch.step(&mut painter, 1, &noise);
    painter.finish(&mut layer);
    assert!(!layer.is_blank());

    for frame in 2..800 {
        let mut painter = Painter::for_layer(&layer);
        sketch.step(&mut painter, frame, &noise);
    }
    assert!(sketch.is_empty());
}
