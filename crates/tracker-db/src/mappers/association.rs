//! Association entity <-> model mappers

use tracker_core::entities::{Association, Role, RosterEntry};
use tracker_core::value_objects::{CourseId, MemberId, Privilege, RoleId};

use crate::models::{AssociationModel, RosterRowModel};

/// Convert AssociationModel to Association entity
impl From<AssociationModel> for Association {
    fn from(model: AssociationModel) -> Self {
        Association {
            course_id: CourseId::new(model.course_id),
            role_id: RoleId::new(model.role_id),
            member_id: MemberId::new(model.member_id),
        }
    }
}

/// Convert a roster row; members without a row map to the Unassigned role
impl From<RosterRowModel> for RosterEntry {
    fn from(model: RosterRowModel) -> Self {
        let unassigned = Role::unassigned();
        RosterEntry {
            member_id: MemberId::new(model.member_id),
            member_name: model.member_name,
            is_admin: model.is_admin,
            role_id: model.role_id.map_or(unassigned.id, RoleId::new),
            role_name: model.role_name.unwrap_or(unassigned.name),
            privilege: model.privilege.map_or(unassigned.privilege, Privilege::new),
        }
    }
}
