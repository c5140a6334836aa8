use kurbo::{Ellipse, Shape};

use crate::{
    entry::model::ContentType,
    foundation::core::{BezPath, Point, Rect},
};

const TOLERANCE: f64 = 0.1;

/// Solid glyph for `content_type`, scaled to fill `bounds`.
pub fn type_icon(content_type: ContentType, bounds: Rect) -> BezPath {
    let s = bounds.width().min(bounds.height());
    let o = bounds.origin();
    // Unit-square coordinates → bounds.
    let r = |x0: f64, y0: f64, x1: f64, y1: f64| {
        Rect::new(o.x + x0 * s, o.y + y0 * s, o.x + x1 * s, o.y + y1 * s)
    };
    let p = |x: f64, y: f64| Point::new(o.x + x * s, o.y + y * s);

    let mut path = BezPath::new();
    match content_type {
        ContentType::Book => {
            // Two pages with a spine gap.
            push(&mut path, quad(p(0.0, 0.15), p(0.46, 0.25), p(0.46, 0.95), p(0.0, 0.85)));
            push(&mut path, quad(p(0.54, 0.25), p(1.0, 0.15), p(1.0, 0.85), p(0.54, 0.95)));
        }
        ContentType::Music => {
            let head = Ellipse::new(p(0.3, 0.8), (0.2 * s, 0.15 * s), -0.35);
            path.extend(head.path_elements(TOLERANCE));
            path.extend(r(0.42, 0.1, 0.5, 0.8).path_elements(TOLERANCE));
            push(&mut path, quad(p(0.5, 0.1), p(0.85, 0.25), p(0.85, 0.4), p(0.5, 0.28)));
        }
        ContentType::Movie => {
            path.extend(r(0.0, 0.35, 1.0, 1.0).path_elements(TOLERANCE));
            push(&mut path, quad(p(0.0, 0.15), p(0.92, 0.0), p(0.96, 0.2), p(0.04, 0.32)));
        }
        ContentType::Series => {
            path.extend(r(0.0, 0.05, 1.0, 0.75).path_elements(TOLERANCE));
            path.extend(r(0.45, 0.75, 0.55, 0.88).path_elements(TOLERANCE));
            path.extend(r(0.25, 0.88, 0.75, 0.96).path_elements(TOLERANCE));
        }
    }
    path
}

fn quad(a: Point, b: Point, c: Point, d: Point) -> [Point; 4] {
    [a, b, c, d]
}

fn push(path: &mut BezPath, pts: [Point; 4]) {
    path.move_to(pts[0]);
    for pt in &pts[1..] {
        path.line_to(*pt);
    }
    path.close_path();
}
