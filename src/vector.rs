use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

const XZ_BOUNDS: i32 = 30_000_000;
const Y_MAX: i32 = 256;

/// An immutable 3-dimensional block coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Vector {
    x: i32,
    y: i32,
    z: i32,
}

impl Vector {
    pub const ZERO: Vector = Vector { x: 0, y: 0, z: 0 };
    pub const ONE: Vector = Vector { x: 1, y: 1, z: 1 };

    pub const fn at(x: i32, y: i32, z: i32) -> Self {
        Vector { x, y, z }
    }

    /// Clamps x into `[min_x, max_x]` and z into `[min_z, max_z]` before
    /// constructing. Fails if either range is inverted.
    pub fn at_xz_clamped(
        x: i32,
        y: i32,
        z: i32,
        min_x: i32,
        max_x: i32,
        min_z: i32,
        max_z: i32,
    ) -> Result<Self> {
        if min_x > max_x {
            return Err(Error::InvalidRange {
                min: min_x,
                max: max_x,
            });
        }
        if min_z > max_z {
            return Err(Error::InvalidRange {
                min: min_z,
                max: max_z,
            });
        }
        Ok(Vector::at(x.clamp(min_x, max_x), y, z.clamp(min_z, max_z)))
    }

    pub const fn x(&self) -> i32 {
        self.x
    }

    pub const fn y(&self) -> i32 {
        self.y
    }

    pub const fn z(&self) -> i32 {
        self.z
    }

    /// Number of cells in a volume of this size.
    pub fn volume(&self) -> i64 {
        self.x as i64 * self.y as i64 * self.z as i64
    }

    pub fn add(&self, other: Vector) -> Vector {
        Vector::at(self.x + other.x, self.y + other.y, self.z + other.z)
    }

    pub fn subtract(&self, other: Vector) -> Vector {
        Vector::at(self.x - other.x, self.y - other.y, self.z - other.z)
    }

    pub fn divide(&self, n: i32) -> Vector {
        Vector::at(self.x / n, self.y / n, self.z / n)
    }

    pub fn min(&self, other: Vector) -> Vector {
        Vector::at(
            self.x.min(other.x),
            self.y.min(other.y),
            self.z.min(other.z),
        )
    }

    pub fn max(&self, other: Vector) -> Vector {
        Vector::at(
            self.x.max(other.x),
            self.y.max(other.y),
            self.z.max(other.z),
        )
    }

    pub fn contained_within(&self, min: Vector, max: Vector) -> bool {
        self.x >= min.x
            && self.x <= max.x
            && self.y >= min.y
            && self.y <= max.y
            && self.z >= min.z
            && self.z <= max.z
    }

    /// Whether this vector lies inside the world's legal coordinate space.
    /// Validation is the caller's decision; `at` never enforces it.
    pub fn is_valid(&self) -> bool {
        is_valid_xz(self.x) && is_valid_xz(self.z) && is_valid_y(self.y)
    }
}

fn is_valid_xz(val: i32) -> bool {
    -XZ_BOUNDS < val && val < XZ_BOUNDS
}

fn is_valid_y(val: i32) -> bool {
    (0..Y_MAX).contains(&val)
}

impl fmt::Display for Vector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.x, self.y, self.z)
    }
}

#[cfg(test)]
mod tests {
    use super::Vector;
    use crate::error::Error;

    #[test]
    fn accessors() {
        let v = Vector::at(3, 64, -7);
        assert_eq!(v.x(), 3);
        assert_eq!(v.y(), 64);
        assert_eq!(v.z(), -7);
    }

    #[test]
    fn arithmetic() {
        let a = Vector::at(1, 2, 3);
        let b = Vector::at(10, 20, 30);
        assert_eq!(a.add(b), Vector::at(11, 22, 33));
        assert_eq!(b.subtract(a), Vector::at(9, 18, 27));
        assert_eq!(b.divide(10), Vector::at(1, 2, 3));
        assert_eq!(a.min(Vector::at(0, 5, 2)), Vector::at(0, 2, 2));
        assert_eq!(a.max(Vector::at(0, 5, 2)), Vector::at(1, 5, 3));
    }

    #[test]
    fn clamped_constructor() {
        let v = Vector::at_xz_clamped(100, 10, -100, 0, 15, -15, 0).unwrap();
        assert_eq!(v, Vector::at(15, 10, -15));

        let inside = Vector::at_xz_clamped(5, 10, -5, 0, 15, -15, 0).unwrap();
        assert_eq!(inside, Vector::at(5, 10, -5));
    }

    #[test]
    fn clamped_constructor_rejects_inverted_range() {
        let err = Vector::at_xz_clamped(0, 0, 0, 10, 5, 0, 0).unwrap_err();
        assert!(matches!(err, Error::InvalidRange { min: 10, max: 5 }));

        let err = Vector::at_xz_clamped(0, 0, 0, 0, 0, 3, -3).unwrap_err();
        assert!(matches!(err, Error::InvalidRange { min: 3, max: -3 }));
    }

    #[test]
    fn validity_bounds() {
        assert!(Vector::at(0, 0, 0).is_valid());
        assert!(Vector::at(29_999_999, 255, -29_999_999).is_valid());
        assert!(!Vector::at(30_000_000, 0, 0).is_valid());
        assert!(!Vector::at(0, -1, 0).is_valid());
        assert!(!Vector::at(0, 256, 0).is_valid());
    }

    #[test]
    fn canonical_constants() {
        assert_eq!(Vector::ZERO, Vector::at(0, 0, 0));
        assert_eq!(Vector::ONE, Vector::at(1, 1, 1));
    }

    #[test]
    fn volume_product() {
        assert_eq!(Vector::at(16, 256, 16).volume(), 65_536 * 16);
        assert_eq!(Vector::at(2, 1, 2).volume(), 4);
    }
}
