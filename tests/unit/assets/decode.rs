use std::io::Cursor;

use super::*;

fn png(width: u32, height: u32, px: [u8; 4]) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(width, height, image::Rgba(px));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

#[test]
fn decode_png_dimensions_and_premul() {
    let img = decode_image(&png(1, 1, [100, 50, 200, 128])).unwrap();
    assert_eq!((img.width, img.height), (1, 1));
    assert_eq!(
        img.rgba8_premul.as_slice(),
        &[
            ((100u16 * 128 + 127) / 255) as u8,
            ((50u16 * 128 + 127) / 255) as u8,
            ((200u16 * 128 + 127) / 255) as u8,
            128u8
        ]
    );
}

#[test]
fn decode_jpeg_is_supported() {
    let img = image::RgbImage::from_pixel(4, 3, image::Rgb([10, 20, 30]));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Jpeg)
        .unwrap();

    let decoded = decode_image(&buf).unwrap();
    assert_eq!((decoded.width, decoded.height), (4, 3));
    assert!(decoded.rgba8_premul.chunks_exact(4).all(|px| px[3] == 255));
}

#[test]
fn garbage_bytes_fail_to_decode() {
    assert!(decode_image(b"<html>not an image</html>").is_err());
    assert!(decode_image(&[]).is_err());
}

#[test]
fn resized_stretches_to_target() {
    let img = decode_image(&png(3, 2, [255, 0, 0, 255])).unwrap();
    let out = img.resized(30, 50).unwrap();
    assert_eq!((out.width, out.height), (30, 50));
    assert_eq!(out.rgba8_premul.len(), 30 * 50 * 4);
    assert!(
        out.rgba8_premul
            .chunks_exact(4)
            .all(|px| px == [255, 0, 0, 255])
    );
}

#[test]
fn resized_to_same_size_is_identity() {
    let img = decode_image(&png(5, 5, [1, 2, 3, 255])).unwrap();
    assert_eq!(img.resized(5, 5).unwrap(), img);
    assert!(img.resized(0, 5).is_err());
}
