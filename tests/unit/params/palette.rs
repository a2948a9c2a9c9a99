use super::*;

#[test]
fn parse_hex_forms() {
    assert_eq!(parse_hex("#ff6c08"), Rgb8 { r: 255, g: 108, b: 8 });
    assert_eq!(parse_hex("a0f5ff"), Rgb8 { r: 160, g: 245, b: 255 });
    assert_eq!(parse_hex("#fff"), Rgb8::WHITE);
    assert_eq!(parse_hex("  #1e0326 "), Rgb8 { r: 30, g: 3, b: 38 });
}

#[test]
fn parse_hex_garbage_is_black() {
    assert_eq!(parse_hex(""), Rgb8::BLACK);
    assert_eq!(parse_hex("#zzzzzz"), Rgb8::BLACK);
    assert_eq!(parse_hex("not a colour"), Rgb8::BLACK);
}

#[test]
fn add_remove_edit() {
    let mut p = Palette::new(["#000000"]).unwrap();
    assert!(!p.remove(0), "last colour must survive");
    p.add();
    assert_eq!(p.hex(), &["#000000".to_owned(), "#ffffff".to_owned()]);
    assert!(p.edit(1, "#ff0000"));
    assert!(!p.edit(5, "#ff0000"));
    assert!(p.remove(0));
    assert_eq!(p.base(), Rgb8 { r: 255, g: 0, b: 0 });
}

#[test]
fn empty_palette_rejected_on_decode() {
    assert!(Palette::new(Vec::<String>::new()).is_err());
    assert!(serde_json::from_str::<Palette>("[]").is_err());
    let p: Palette = serde_json::from_str(r##"["#123456"]"##).unwrap();
    assert_eq!(p.len(), 1);
}

#[test]
fn noise_lookup_stays_in_bounds() {
    let rgb = PaletteRgb::new(&Palette::default());
    assert_eq!(rgb.for_noise(0.0), parse_hex(DEFAULT_PALETTE[0]));
    assert_eq!(rgb.for_noise(0.9999), parse_hex(DEFAULT_PALETTE[4]));
    assert_eq!(rgb.for_noise(1.5), parse_hex(DEFAULT_PALETTE[4]));
    assert_eq!(rgb.cycle(7), parse_hex(DEFAULT_PALETTE[2]));

    let single = PaletteRgb::new(&Palette::new(["#102030"]).unwrap());
    assert_eq!(single.for_noise(0.99), Rgb8 { r: 16, g: 32, b: 48 });
    assert_eq!(single.cycle(9), Rgb8 { r: 16, g: 32, b: 48 });
}
