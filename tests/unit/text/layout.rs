use super::*;

#[test]
fn garbage_font_bytes_are_rejected() {
    let mut engine = TextLayoutEngine::default();
    assert!(engine.register_font(b"definitely not a font".to_vec()).is_err());
}

#[test]
fn empty_font_bytes_are_rejected() {
    let mut engine = TextLayoutEngine::default();
    assert!(engine.register_font(Vec::new()).is_err());
}
