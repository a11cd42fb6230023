//! Coordinate types shared by the chunk model and the export driver.

use std::ops::{Add, Sub};

/// A world-space block position (editor coordinates after centering).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pos(pub i32, pub i32, pub i32);

/// A world-space column (x, z), ignoring height.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Column(pub i32, pub i32);

/// Offset in blocks, used for `block_offset` translation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Vec2(pub i32, pub i32);

impl Add<Vec2> for Column {
    type Output = Column;
    fn add(self, rhs: Vec2) -> Column {
        Column(self.0 + rhs.0, self.1 + rhs.1)
    }
}

impl Sub<Vec2> for Column {
    type Output = Column;
    fn sub(self, rhs: Vec2) -> Column {
        Column(self.0 - rhs.0, self.1 - rhs.1)
    }
}

/// Hytale region coordinates (32×32 chunks per axis).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RegionIndex(pub i32, pub i32);

/// An inclusive, axis-aligned rectangle of editor-tile coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub min: Column,
    pub max: Column,
}

impl Rect {
    /// Smallest rectangle containing every given tile coordinate, or `None` if empty.
    pub fn bounding(tiles: impl IntoIterator<Item = (i32, i32)>) -> Option<Rect> {
        let mut iter = tiles.into_iter();
        let (x0, z0) = iter.next()?;
        let mut min = Column(x0, z0);
        let mut max = Column(x0, z0);
        for (x, z) in iter {
            min.0 = min.0.min(x);
            min.1 = min.1.min(z);
            max.0 = max.0.max(x);
            max.1 = max.1.max(z);
        }
        Some(Rect { min, max })
    }

    /// Integer center, floor-rounded, matching `⌊(min+max)/2⌋` from `spec.md` §8.
    pub fn center(self) -> Column {
        Column(
            (self.min.0 + self.max.0).div_euclid(2),
            (self.min.1 + self.max.1).div_euclid(2),
        )
    }
}
