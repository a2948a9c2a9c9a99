use super::*;

fn frame(w: u32, h: u32, px: [u8; 4]) -> Frame {
    Frame {
        width: w,
        height: h,
        data: px.repeat((w * h) as usize),
        premultiplied: true,
    }
}

#[test]
fn thumbnail_is_card_sized_jpeg() {
    let uri = thumbnail_data_uri(&frame(64, 48, [200, 10, 10, 255]))
        .unwrap()
        .unwrap();
    assert!(uri.starts_with("data:image/jpeg;base64,"));
    let img = decode_data_uri(&uri).unwrap();
    assert_eq!((img.width(), img.height()), (THUMB_WIDTH, THUMB_HEIGHT));
    let px = &img.data()[..4];
    assert!(px[0] > 170 && px[1] < 50 && px[3] == 255, "{px:?}");
}

#[test]
fn zero_size_frame_has_no_thumbnail() {
    let f = Frame {
        width: 0,
        height: 0,
        data: Vec::new(),
        premultiplied: true,
    };
    assert!(thumbnail_data_uri(&f).unwrap().is_none());
}

#[test]
fn data_uri_errors() {
    assert!(decode_data_uri("http://example.com/x.png").is_err());
    assert!(decode_data_uri("data:image/png;base64").is_err());
    assert!(decode_data_uri("data:text/plain,hello").is_err());
    assert!(decode_data_uri("data:image/png;base64,!!!").is_err());
}

#[test]
fn png_data_uri_decodes() {
    let png = encode_png(&frame(3, 2, [0, 0, 255, 255])).unwrap();
    let uri = format!(
        "data:image/png;base64,{}",
        base64::engine::general_purpose::STANDARD.encode(png)
    );
    let img = decode_data_uri(&uri).unwrap();
    assert_eq!((img.width(), img.height()), (3, 2));
    assert_eq!(img.label(), Some("thumbnail"));
}

#[test]
fn export_names() {
    let mut answers = Answers::default();
    assert_eq!(export_file_name(&answers, 7), "dream_f7");
    answers.visual = Some("Halftone".into());
    assert_eq!(export_file_name(&answers, 12), "visual-halftone_f12");
    answers.time = Some("night".into());
    assert_eq!(export_file_name(&answers, 3), "visual-halftone_time-night_f3");
}

#[test]
fn png_is_written_unpremultiplied() {
    let dir = std::env::temp_dir().join(format!("dreamviz_png_{}", std::process::id()));
    let path = dir.join("nested").join("out.png");
    write_png(&frame(2, 2, [64, 0, 0, 128]), &path).unwrap();
    let back = image::open(&path).unwrap().to_rgba8();
    assert_eq!(back.get_pixel(0, 0).0, [128, 0, 0, 128]);
    let _ = std::fs::remove_dir_all(&dir);
}
