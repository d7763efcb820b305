//! Role entity <-> model mapper

use tracker_core::entities::Role;
use tracker_core::value_objects::{Privilege, RoleId};

use crate::models::RoleModel;

/// Convert RoleModel to Role entity
///
/// Rows are trusted: the table's CHECK constraints already enforce the role invariants.
impl From<RoleModel> for Role {
    fn from(model: RoleModel) -> Self {
        Role {
            id: RoleId::new(model.id),
            name: model.name,
            privilege: Privilege::new(model.privilege),
        }
    }
}
