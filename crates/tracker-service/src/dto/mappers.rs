//! Entity to DTO mappers
//!
//! Implements `From` conversions from domain entities to response DTOs.

use tracker_core::entities::{Course, Member, Role};

use super::responses::{CourseResponse, MemberResponse, RoleResponse};

// ============================================================================
// Member Mappers
// ============================================================================

impl From<&Member> for MemberResponse {
    fn from(member: &Member) -> Self {
        Self {
            id: member.id,
            name: member.name.clone(),
            email: member.email.clone(),
            is_admin: member.is_admin,
            created_at: member.created_at,
            updated_at: member.updated_at,
        }
    }
}

impl From<Member> for MemberResponse {
    fn from(member: Member) -> Self {
        Self::from(&member)
    }
}

// ============================================================================
// Course Mappers
// ============================================================================

impl From<&Course> for CourseResponse {
    fn from(course: &Course) -> Self {
        Self {
            id: course.id,
            name: course.name.clone(),
            code: course.code.clone(),
            group: course.group.clone(),
            description: course.description.clone(),
            created_at: course.created_at,
            updated_at: course.updated_at,
        }
    }
}

impl From<Course> for CourseResponse {
    fn from(course: Course) -> Self {
        Self::from(&course)
    }
}

// ============================================================================
// Role Mappers
// ============================================================================

impl From<&Role> for RoleResponse {
    fn from(role: &Role) -> Self {
        Self {
            id: role.id,
            name: role.name.clone(),
            privilege: role.privilege,
        }
    }
}

impl From<Role> for RoleResponse {
    fn from(role: Role) -> Self {
        Self::from(&role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use tracker_core::{MemberId, NewMember, Privilege, RoleId};

    #[test]
    fn test_member_response_hides_hash() {
        let member = NewMember::new("paul", "paul@atreides.com", "secret-hash", true)
            .unwrap()
            .into_member(MemberId::new(2), Utc::now());
        let response = MemberResponse::from(&member);
        assert_eq!(response.id, MemberId::new(2));
        assert!(response.is_admin);

        let json = serde_json::to_string(&response).unwrap();
        assert!(!json.contains("secret-hash"));
        assert!(json.contains(r#""id":2"#));
    }

    #[test]
    fn test_role_response() {
        let role = Role::new(RoleId::new(3), "Teacher", Privilege::new(20)).unwrap();
        let response = RoleResponse::from(role);
        assert_eq!(response.name, "Teacher");
        assert_eq!(response.privilege, Privilege::new(20));
    }
}
