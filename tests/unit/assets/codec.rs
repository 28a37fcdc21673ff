use std::io::Cursor;

use super::*;
use crate::raster::color::Color;

fn png_bytes(width: u32, height: u32, rgba: Vec<u8>) -> Vec<u8> {
    let img = image::RgbaImage::from_raw(width, height, rgba).unwrap();
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

#[test]
fn decode_image_png_keeps_straight_alpha() {
    let buf = png_bytes(2, 1, vec![100, 50, 200, 128, 255, 0, 0, 255]);

    let decoded = decode_image(&buf).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (2, 1));
    assert_eq!(decoded.get_pixel(0, 0), Color::pack(128, 100, 50, 200));
    assert_eq!(decoded.get_pixel(1, 0), Color(0xFFFF_0000));
}

#[test]
fn decode_image_rejects_garbage() {
    assert!(decode_image(b"definitely not a png").is_err());
}

#[test]
fn encode_then_decode_file_preserves_pixels() {
    let dir = std::path::PathBuf::from("target")
        .join("unit_assets_codec")
        .join("nested");
    let path = dir.join("roundtrip.png");
    let _ = std::fs::remove_file(&path);

    let mut buf = PixelBuffer::new(3, 2).unwrap();
    buf.set_pixel(0, 0, Color(0xFF11_2233));
    buf.set_pixel(2, 1, Color(0x8044_5566));

    encode_file(&buf, &path).unwrap();
    let back = decode_file(&path).unwrap();
    assert_eq!(back, buf);
}

#[test]
fn decode_missing_file_names_the_path() {
    let err = decode_file(Path::new("target/does/not/exist.png")).unwrap_err();
    assert!(err.to_string().contains("exist.png"));
}
