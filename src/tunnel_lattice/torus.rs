//! Geometry on a `width × height` tile that wraps on both axes.

use derive_more::{Add, Mul, Sub};

/// A point (or displacement) in pixel space
#[derive(Debug, Clone, Copy, PartialEq, Default, Add, Sub, Mul)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn length(self) -> f64 {
        self.x.hypot(self.y)
    }
}

/// The toroidal domain `[0, width) × [0, height)`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TorusDomain {
    pub width: f64,
    pub height: f64,
}

impl TorusDomain {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width as f64,
            height: height as f64,
        }
    }

    /// Shortest displacement from `a` to `b` over all wrapped copies of `b`
    pub fn shortest_vector(&self, a: Point, b: Point) -> Point {
        Point::new(
            shortest_component(b.x - a.x, self.width),
            shortest_component(b.y - a.y, self.height),
        )
    }

    pub fn distance(&self, a: Point, b: Point) -> f64 {
        self.shortest_vector(a, b).length()
    }

    /// Wrap a point into the domain
    pub fn wrap(&self, p: Point) -> Point {
        Point::new(wrap_coord(p.x, self.width), wrap_coord(p.y, self.height))
    }

    /// Normalized UV of a point, in `[0, 1)` on both axes
    pub fn to_uv(&self, p: Point) -> (f64, f64) {
        let wrapped = self.wrap(p);
        (wrapped.x / self.width, wrapped.y / self.height)
    }
}

/// `value mod size` in `[0, size)`
pub fn wrap_coord(value: f64, size: f64) -> f64 {
    let r = value.rem_euclid(size);
    // rem_euclid can round up to `size` for tiny negative inputs
    if r >= size { 0.0 } else { r }
}

fn shortest_component(delta: f64, size: f64) -> f64 {
    let d = delta.rem_euclid(size);
    if d > size / 2.0 { d - size } else { d }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shortest_vector_crosses_border() {
        let domain = TorusDomain::new(100, 50);
        let v = domain.shortest_vector(Point::new(95.0, 10.0), Point::new(5.0, 10.0));
        assert!((v.x - 10.0).abs() < 1e-9);
        assert!(v.y.abs() < 1e-9);

        let v = domain.shortest_vector(Point::new(5.0, 2.0), Point::new(95.0, 48.0));
        assert!((v.x + 10.0).abs() < 1e-9);
        assert!((v.y + 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_shortest_vector_interior() {
        let domain = TorusDomain::new(100, 100);
        let v = domain.shortest_vector(Point::new(10.0, 10.0), Point::new(30.0, 40.0));
        assert_eq!(v, Point::new(20.0, 30.0));
        assert!((domain.distance(Point::new(10.0, 10.0), Point::new(30.0, 40.0)) - 36.0555).abs() < 1e-3);
    }

    #[test]
    fn test_distance_is_symmetric() {
        let domain = TorusDomain::new(64, 48);
        let a = Point::new(3.0, 47.0);
        let b = Point::new(60.0, 1.5);
        assert!((domain.distance(a, b) - domain.distance(b, a)).abs() < 1e-12);
        assert!(domain.distance(a, b) <= (32.0f64.powi(2) + 24.0f64.powi(2)).sqrt());
    }

    #[test]
    fn test_wrap_into_domain() {
        let domain = TorusDomain::new(64, 32);
        assert_eq!(domain.wrap(Point::new(-1.0, 33.0)), Point::new(63.0, 1.0));
        assert_eq!(domain.wrap(Point::new(64.0, 0.0)), Point::new(0.0, 0.0));

        let tiny = domain.wrap(Point::new(-1e-18, -1e-18));
        assert!(tiny.x < 64.0 && tiny.y < 32.0);
    }

    #[test]
    fn test_to_uv_range() {
        let domain = TorusDomain::new(64, 32);
        let (u, v) = domain.to_uv(Point::new(96.0, -8.0));
        assert!((u - 0.5).abs() < 1e-12);
        assert!((v - 0.75).abs() < 1e-12);
    }
}
