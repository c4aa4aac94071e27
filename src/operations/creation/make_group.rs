use crate::error::{Result, TopologyError};
use crate::topology::{GroupId, GroupMembers, TopologyStore};

/// Creates a named physical group over curves or surfaces.
pub struct MakePhysicalGroup {
    name: String,
    members: GroupMembers,
}

impl MakePhysicalGroup {
    /// Creates a new `MakePhysicalGroup` operation.
    #[must_use]
    pub fn new(name: impl Into<String>, members: GroupMembers) -> Self {
        Self {
            name: name.into(),
            members,
        }
    }

    /// Executes the operation, creating the group in the topology store.
    ///
    /// # Errors
    ///
    /// Returns an error if a member is not in the store or a group with the
    /// same name already exists in the same dimension.
    pub fn execute(&self, store: &mut TopologyStore) -> Result<GroupId> {
        let dim = self.members.dimension();
        if store.find_group(dim, &self.name).is_some() {
            return Err(TopologyError::DuplicateGroup {
                dim: dim.as_u8(),
                name: self.name.clone(),
            }
            .into());
        }
        match &self.members {
            GroupMembers::Curves(curves) => {
                for &c in curves {
                    store.curve(c)?;
                }
            }
            GroupMembers::Surfaces(surfaces) => {
                for &s in surfaces {
                    store.surface(s)?;
                }
            }
        }
        Ok(store.insert_group(self.name.clone(), self.members.clone()))
    }
}
