//! Face directions for region boundary queries.

use serde::{Deserialize, Serialize};

use crate::coords::BlockPos;

/// One of the six axis-aligned face directions.
///
/// The variant set is closed: an out-of-range direction is
/// unrepresentable, so no runtime validity check exists anywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// +Z
    Forward,
    /// +X
    Right,
    /// -Z
    Back,
    /// -X
    Left,
    /// +Y
    Up,
    /// -Y
    Down,
}

impl Direction {
    /// All six directions, in a fixed iteration order.
    pub const ALL: [Self; 6] = [
        Self::Forward,
        Self::Right,
        Self::Back,
        Self::Left,
        Self::Up,
        Self::Down,
    ];

    /// The unit block offset for this direction.
    #[must_use]
    pub const fn offset(self) -> BlockPos {
        match self {
            Self::Forward => BlockPos::new(0, 0, 1),
            Self::Right => BlockPos::new(1, 0, 0),
            Self::Back => BlockPos::new(0, 0, -1),
            Self::Left => BlockPos::new(-1, 0, 0),
            Self::Up => BlockPos::new(0, 1, 0),
            Self::Down => BlockPos::new(0, -1, 0),
        }
    }

    /// The opposite direction.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Forward => Self::Back,
            Self::Right => Self::Left,
            Self::Back => Self::Forward,
            Self::Left => Self::Right,
            Self::Up => Self::Down,
            Self::Down => Self::Up,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opposite_is_involution() {
        for dir in Direction::ALL {
            assert_eq!(dir.opposite().opposite(), dir);
        }
    }

    #[test]
    fn test_offsets_cancel_with_opposite() {
        for dir in Direction::ALL {
            let a = dir.offset();
            let b = dir.opposite().offset();
            assert_eq!(BlockPos::new(a.x + b.x, a.y + b.y, a.z + b.z), BlockPos::ZERO);
        }
    }
}
