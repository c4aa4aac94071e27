use std::fmt;

use super::curve::CurveId;
use super::surface::SurfaceId;

slotmap::new_key_type! {
    /// Unique identifier for a physical group in the topology store.
    pub struct GroupId;
}

/// Dimension of the entities a physical group tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Dimension {
    /// Boundary curves.
    Curve,
    /// Surface regions.
    Surface,
}

impl Dimension {
    /// Numeric dimension as used by mesh formats.
    #[must_use]
    pub fn as_u8(self) -> u8 {
        match self {
            Self::Curve => 1,
            Self::Surface => 2,
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_u8())
    }
}

/// The entities tagged by a group. The variant fixes the group's dimension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupMembers {
    Curves(Vec<CurveId>),
    Surfaces(Vec<SurfaceId>),
}

impl GroupMembers {
    /// Dimension of the member entities.
    #[must_use]
    pub fn dimension(&self) -> Dimension {
        match self {
            Self::Curves(_) => Dimension::Curve,
            Self::Surfaces(_) => Dimension::Surface,
        }
    }
}

/// A named tag attached to entities of one dimension.
#[derive(Debug, Clone)]
pub struct PhysicalGroupData {
    /// Integer tag, unique among the store's groups.
    pub tag: u32,
    /// Group name, unique within its dimension.
    pub name: String,
    /// Tagged entities.
    pub members: GroupMembers,
}

impl PhysicalGroupData {
    /// Dimension of the group.
    #[must_use]
    pub fn dimension(&self) -> Dimension {
        self.members.dimension()
    }
}
