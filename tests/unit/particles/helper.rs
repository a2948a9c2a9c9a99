use super::*;
use crate::render::layer::Layer;

fn canvas(w: u32, h: u32) -> Canvas {
    Canvas::new(w, h).unwrap()
}

fn solid(w: u32, h: u32, rgba: [u8; 4]) -> SourceImage {
    SourceImage::from_straight_rgba8(w, h, rgba.repeat((w * h) as usize)).unwrap()
}

fn pool(n: usize) -> ReferencePool {
    ReferencePool::from_images(
        (0..n).map(|i| (format!("ref{i}.png"), solid(40, 20, [200, 40, 40, 255]))),
    )
}

#[test]
fn construction_follows_canvas_width_and_aspect() {
    let c = canvas(1000, 600);
    let mut rng = SceneRng::new(1);
    for _ in 0..50 {
        let h = HelperImage::new(&mut rng, solid(40, 20, [0, 0, 0, 255]), c);
        let (w, hh) = h.size();
        assert!((104.0..160.0).contains(&w), "{w}");
        assert!((w / hh - 2.0).abs() < 1e-9);
        let p = h.centre();
        assert!((60.0..940.0).contains(&p.x));
        assert!((60.0..540.0).contains(&p.y));
        assert_eq!(h.position(), p);
    }
}

#[test]
fn base_color_is_sampled_from_the_image() {
    let mut rng = SceneRng::new(1);
    let h = HelperImage::new(&mut rng, solid(8, 8, [10, 20, 30, 255]), canvas(400, 400));
    assert_eq!(h.base_color(), [10.0, 20.0, 30.0]);
}

#[test]
fn update_stays_inside_margins() {
    let c = canvas(500, 400);
    let mut rng = SceneRng::new(8);
    let noise = NoiseField::new(8);
    let mut h = HelperImage::new(&mut rng, solid(40, 20, [0, 0, 0, 255]), c);
    let frag = FragmentControls::default();
    let img = ImageControls {
        drift: 2.0,
        ..ImageControls::default()
    };
    let margin = h.size().0 * 0.55;
    for _ in 0..300 {
        h.update(&mut rng, c, &frag, &img, 1.0, &noise);
        let p = h.position();
        assert!(p.x >= margin && p.x <= 500.0 - margin);
        assert!(p.y >= margin && p.y <= 400.0 - margin);
    }
}

#[test]
fn glitches_spawn_and_expire() {
    let c = canvas(500, 400);
    let mut rng = SceneRng::new(21);
    let noise = NoiseField::new(21);
    let mut h = HelperImage::new(&mut rng, solid(40, 20, [0, 0, 0, 255]), c);
    let frag = FragmentControls {
        amount: 3.0,
        ..FragmentControls::default()
    };
    let mut seen = false;
    for _ in 0..200 {
        h.update(&mut rng, c, &frag, &ImageControls::default(), 1.0, &noise);
        seen |= !h.glitches().is_empty();
        assert!(h.glitches().iter().all(|g| g.age() <= g.life()));
    }
    assert!(seen);

    let idle = FragmentControls {
        amount: 0.0,
        ..FragmentControls::default()
    };
    for _ in 0..60 {
        h.update(&mut rng, c, &idle, &ImageControls::default(), 1.0, &noise);
    }
    assert!(h.glitches().is_empty());
}

#[test]
fn glitch_alpha_fades_with_age() {
    let mut rng = SceneRng::new(2);
    let mut g = Glitch::spawn(&mut rng, 100.0, 50.0);
    assert_eq!(g.alpha(), 210.0);
    let noise = NoiseField::new(2);
    g.update(1.0, 1.0, &noise);
    assert!(g.alpha() < 210.0);
    assert!((25.0..45.0).contains(&g.life()));
}

#[test]
fn adjust_count_clamps_and_tags_pool_entries() {
    let c = canvas(600, 400);
    let mut rng = SceneRng::new(4);
    let pool = pool(3);
    let mut sys = HelperSystem::default();
    sys.adjust_count(20.0, &mut rng, &pool, c);
    assert_eq!(sys.len(), MAX_HELPERS);
    sys.adjust_count(0.0, &mut rng, &pool, c);
    assert_eq!(sys.len(), 1);
    let r = &sys.refs()[0];
    assert!((0..3).contains(&r.index));
    assert_eq!(r.name.as_deref(), pool.name(r.index as usize));
}

#[test]
fn adjust_count_stops_on_empty_pool() {
    let mut rng = SceneRng::new(4);
    let mut sys = HelperSystem::default();
    sys.adjust_count(4.0, &mut rng, &ReferencePool::empty(), canvas(300, 300));
    assert!(sys.is_empty());
}

#[test]
fn uploaded_helpers_record_minus_one() {
    let mut rng = SceneRng::new(4);
    let mut sys = HelperSystem::default();
    sys.push(HelperImage::new(&mut rng, solid(4, 4, [1, 2, 3, 255]), canvas(300, 300)));
    assert_eq!(
        sys.refs(),
        vec![HelperRef {
            index: -1,
            name: None
        }]
    );
}

#[test]
fn rebuild_keeps_images_and_tags() {
    let mut rng = SceneRng::new(4);
    let pool = pool(2);
    let mut sys = HelperSystem::default();
    sys.adjust_count(3.0, &mut rng, &pool, canvas(600, 400));
    let refs = sys.refs();
    sys.rebuild(&mut rng, canvas(300, 300));
    assert_eq!(sys.refs(), refs);
    assert!(sys.iter().all(|h| (h.size().0 - 48.0 * 0.65) > -1e-9 && h.size().0 < 48.0));
}

#[test]
fn draw_paints_helper_translucent() {
    let c = canvas(200, 200);
    let mut rng = SceneRng::new(6);
    let noise = NoiseField::new(6);
    let h = HelperImage::new(&mut rng, solid(10, 10, [255, 255, 255, 255]), c);
    let mut layer = Layer::new(c).unwrap();
    let mut painter = Painter::for_layer(&layer);
    h.draw(&mut painter, &mut rng, &ImageControls::default(), &noise);
    painter.finish(&mut layer);
    let p = h.position();
    let px = layer.pixel(p.x as u32, p.y as u32);
    assert!((225..=235).contains(&px[3]), "{px:?}");
}
