//! Block types stored in region voxel arrays.

use serde::{Deserialize, Serialize};

/// The type of a single voxel.
///
/// `Nothing` is the explicit result of a lookup outside any stored
/// region; it is a valid steady-state value, never an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[repr(u8)]
pub enum BlockType {
    /// No data: lookup miss outside any stored region.
    #[default]
    Nothing,
    /// Empty space inside a stored region.
    Air,
    /// Subsurface soil.
    Dirt,
    /// Grass-topped soil.
    GrassDirt,
    /// Deep rock.
    Stone,
    /// Shoreline sand.
    Sand,
    /// Still water.
    Water,
    /// Tree trunk.
    TreeTrunk,
    /// Tree canopy, placed by the decoration pass.
    TreeLeaves,
}

impl BlockType {
    /// Whether the block occludes and can be stood on.
    #[must_use]
    pub const fn is_solid(self) -> bool {
        !matches!(self, Self::Nothing | Self::Air | Self::Water)
    }

    /// Whether light passes through the block.
    #[must_use]
    pub const fn is_transparent(self) -> bool {
        matches!(self, Self::Nothing | Self::Air | Self::Water | Self::TreeLeaves)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nothing_is_default_and_not_solid() {
        assert_eq!(BlockType::default(), BlockType::Nothing);
        assert!(!BlockType::Nothing.is_solid());
        assert!(!BlockType::Water.is_solid());
        assert!(BlockType::GrassDirt.is_solid());
    }

    #[test]
    fn test_transparency_classification() {
        assert!(BlockType::Water.is_transparent());
        assert!(BlockType::TreeLeaves.is_transparent());
        assert!(!BlockType::Stone.is_transparent());
        // Leaves pass light but still carry weight.
        assert!(BlockType::TreeLeaves.is_solid());
    }
}
