//! Periodic boundary helpers.
use crate::Bird;

/// Wraps a coordinate into `[0, size)`.
pub(crate) fn wrap(v: f64, size: f64) -> f64 {
    let r = v.rem_euclid(size);
    // rem_euclid rounds tiny negative values up to `size`.
    if r >= size {
        0.0
    } else {
        r
    }
}

/// Shortest displacement from `from` to `to` on the torus.
pub(crate) fn displacement(from: &Bird, to: &Bird, size: f64) -> (f64, f64) {
    let min_image = |d: f64| d - size * (d / size).round();
    (min_image(to.x - from.x), min_image(to.y - from.y))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap() {
        assert_eq!(wrap(10.5, 10.0), 0.5);
        assert_eq!(wrap(-0.5, 10.0), 9.5);
        assert_eq!(wrap(-1e-18, 10.0), 0.0);
    }

    #[test]
    fn test_minimum_image() {
        let a = Bird::new(0.5, 9.5, 0.0);
        let b = Bird::new(9.5, 0.5, 0.0);
        let (dx, dy) = displacement(&a, &b, 10.0);
        assert!((dx + 1.0).abs() < 1e-12);
        assert!((dy - 1.0).abs() < 1e-12);
    }
}
