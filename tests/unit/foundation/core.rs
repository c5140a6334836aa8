use super::*;

#[test]
fn card_canvas_is_square_1080() {
    assert_eq!(Canvas::CARD.width, 1080);
    assert_eq!(Canvas::CARD.height, 1080);
    assert_eq!(Canvas::CARD.center_x(), 540.0);
    assert_eq!(Canvas::CARD.rect(), Rect::new(0.0, 0.0, 1080.0, 1080.0));
}

#[test]
fn hex_colors_unpack_channels() {
    let c = Rgba8::from_rgb_hex(0x35553D);
    assert_eq!((c.r, c.g, c.b, c.a), (0x35, 0x55, 0x3D, 255));
}

#[test]
fn zero_rotation_is_identity() {
    let r = Rect::new(10.0, 20.0, 30.0, 60.0);
    assert_eq!(rotate_about_center(r, 0.0), Affine::IDENTITY);
}

#[test]
fn rotation_keeps_center_fixed() {
    let r = Rect::new(820.0, 50.0, 1020.0, 330.0);
    let t = rotate_about_center(r, 8.0);
    let c = t * r.center();
    assert!((c.x - r.center().x).abs() < 1e-9);
    assert!((c.y - r.center().y).abs() < 1e-9);

    let corners = transformed_corners(r, t);
    assert!(corners[0].x > r.x0, "top-left swings right under clockwise rotation");
}
