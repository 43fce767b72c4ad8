use crate::vector::Vector;
use serde::{Deserialize, Serialize};

/// Edge length of the chunk grid along x and z.
pub const GRID_EDGE: i32 = 16;

/// An axis-aligned box described by its minimum corner and its size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    minimum: Vector,
    size: Vector,
}

impl Region {
    pub fn new(minimum: Vector, size: Vector) -> Self {
        Region { minimum, size }
    }

    /// Builds the region spanned by two arbitrary corner points, inclusive.
    pub fn from_corners(a: Vector, b: Vector) -> Self {
        let min = a.min(b);
        let max = a.max(b);
        Region {
            minimum: min,
            size: max.subtract(min).add(Vector::ONE),
        }
    }

    pub fn minimum(&self) -> Vector {
        self.minimum
    }

    pub fn size(&self) -> Vector {
        self.size
    }

    pub fn maximum(&self) -> Vector {
        self.minimum.add(self.size).subtract(Vector::ONE)
    }

    pub fn volume(&self) -> i64 {
        self.size.volume()
    }

    /// Chunk grid x coordinate of the minimum corner. Only meaningful for
    /// grid-aligned regions.
    pub fn grid_x(&self) -> i32 {
        self.minimum.x() / GRID_EDGE
    }

    /// Chunk grid z coordinate of the minimum corner.
    pub fn grid_z(&self) -> i32 {
        self.minimum.z() / GRID_EDGE
    }

    /// Whether the minimum corner and the x/z extents land exactly on the
    /// chunk grid.
    pub fn is_grid_aligned(&self) -> bool {
        self.minimum.x() % GRID_EDGE == 0
            && self.minimum.z() % GRID_EDGE == 0
            && self.size.x() % GRID_EDGE == 0
            && self.size.z() % GRID_EDGE == 0
    }

    pub fn contains(&self, point: Vector) -> bool {
        point.contained_within(self.minimum, self.maximum())
    }

    /// Iterates every cell of the region in relative coordinates, x cycling
    /// fastest, then z, then y. Each call produces a fresh, restartable pass.
    pub fn iter(&self) -> RegionIterator {
        RegionIterator::new(self.size)
    }
}

/// Lazy walk over all relative coordinates of a volume.
pub struct RegionIterator {
    max: Vector,
    next_x: i32,
    next_y: i32,
    next_z: i32,
    remaining: usize,
}

impl RegionIterator {
    fn new(size: Vector) -> Self {
        let remaining = size.volume().max(0) as usize;
        RegionIterator {
            max: size,
            next_x: 0,
            next_y: 0,
            next_z: 0,
            remaining,
        }
    }
}

impl Iterator for RegionIterator {
    type Item = Vector;

    fn next(&mut self) -> Option<Vector> {
        if self.remaining == 0 {
            return None;
        }
        let answer = Vector::at(self.next_x, self.next_y, self.next_z);
        self.remaining -= 1;
        self.next_x += 1;
        if self.next_x >= self.max.x() {
            self.next_x = 0;
            self.next_z += 1;
            if self.next_z >= self.max.z() {
                self.next_z = 0;
                self.next_y += 1;
            }
        }
        Some(answer)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for RegionIterator {}

#[cfg(test)]
mod tests {
    use super::Region;
    use crate::vector::Vector;

    #[test]
    fn corners_and_extents() {
        let region = Region::from_corners(Vector::at(5, 10, 5), Vector::at(0, 0, 0));
        assert_eq!(region.minimum(), Vector::at(0, 0, 0));
        assert_eq!(region.size(), Vector::at(6, 11, 6));
        assert_eq!(region.maximum(), Vector::at(5, 10, 5));
        assert!(region.contains(Vector::at(3, 3, 3)));
        assert!(!region.contains(Vector::at(6, 0, 0)));
    }

    #[test]
    fn grid_coordinates() {
        let region = Region::new(Vector::at(32, 0, -16), Vector::at(16, 256, 16));
        assert_eq!(region.grid_x(), 2);
        assert_eq!(region.grid_z(), -1);
        assert!(region.is_grid_aligned());

        let off = Region::new(Vector::at(33, 0, 0), Vector::at(16, 256, 16));
        assert!(!off.is_grid_aligned());
    }

    #[test]
    fn iteration_order_x_then_z_then_y() {
        let region = Region::new(Vector::ZERO, Vector::at(2, 1, 2));
        let cells: Vec<Vector> = region.iter().collect();
        assert_eq!(
            cells,
            vec![
                Vector::at(0, 0, 0),
                Vector::at(1, 0, 0),
                Vector::at(0, 0, 1),
                Vector::at(1, 0, 1),
            ]
        );
    }

    #[test]
    fn iteration_count_and_restartability() {
        let region = Region::new(Vector::ZERO, Vector::at(3, 4, 5));
        let first: Vec<Vector> = region.iter().collect();
        assert_eq!(first.len(), 60);

        let second: Vec<Vector> = region.iter().collect();
        assert_eq!(first, second);
    }

    #[test]
    fn iterator_reports_exact_size() {
        let region = Region::new(Vector::ZERO, Vector::at(2, 2, 2));
        let mut it = region.iter();
        assert_eq!(it.len(), 8);
        it.next();
        assert_eq!(it.len(), 7);
        for _ in it.by_ref() {}
        assert_eq!(it.len(), 0);
        assert!(it.next().is_none());
    }
}
