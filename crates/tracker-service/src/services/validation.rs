//! Store-aware input validation
//!
//! Each entity kind has one validation function. It runs the `validator`
//! derive for shape, the domain patterns for format, then checks uniqueness
//! against stored rows. Nothing is written here; a passing result is the
//! only way to obtain the values a use case writes.

use tracing::{debug, instrument};
use validator::{Validate, ValidationErrors};

use tracker_core::entities::{Course, Member, NewCourse, NewRole, Role};
use tracker_core::validation::{validate_email, validate_member_name, validate_password};
use tracker_core::{DomainError, Privilege};

use crate::dto::{CourseInput, MemberInput, ProfileInput, RoleInput};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Member fields that passed validation
///
/// `password` is the plaintext to hash; `None` keeps the stored hash.
#[derive(Clone, PartialEq, Eq)]
pub struct ValidMember {
    pub name: String,
    pub email: String,
    pub password: Option<String>,
    pub is_admin: bool,
}

impl std::fmt::Debug for ValidMember {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValidMember")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("is_admin", &self.is_admin)
            .finish()
    }
}

/// Profile fields that passed validation
#[derive(Clone, PartialEq, Eq)]
pub struct ValidProfile {
    pub email: String,
    pub password: Option<String>,
}

impl std::fmt::Debug for ValidProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValidProfile")
            .field("email", &self.email)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Validation layer
pub struct Validator<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> Validator<'a> {
    /// Create a new Validator
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Validate member fields for add (`existing` is `None`) or edit
    ///
    /// On edit the member's own name and email are not duplicates, and a
    /// blank password keeps the stored hash.
    #[instrument(skip(self, input, existing), fields(name = %input.name))]
    pub async fn validate_member(
        &self,
        mut input: MemberInput,
        existing: Option<&Member>,
    ) -> ServiceResult<ValidMember> {
        input.name = input.name.trim().to_string();
        input.email = input.email.trim().to_string();
        input.password = blank_to_none(input.password);
        input.confirm_password = blank_to_none(input.confirm_password);

        if existing.is_none() && input.password.is_none() {
            return Err(DomainError::InvalidPassword.into());
        }
        input.validate().map_err(member_shape_error)?;

        validate_member_name(&input.name)?;
        validate_email(&input.email)?;
        check_password(input.password.as_deref(), input.confirm_password.as_deref())?;

        let own_id = existing.map(|m| m.id);
        if let Some(other) = self.ctx.member_repo().find_by_name(&input.name).await? {
            if Some(other.id) != own_id {
                debug!(member_id = %other.id, "Member name already taken");
                return Err(DomainError::DuplicateName.into());
            }
        }
        self.check_email_free(&input.email, own_id).await?;

        Ok(ValidMember {
            name: input.name,
            email: input.email,
            password: input.password,
            is_admin: input.is_admin,
        })
    }

    /// Validate a member's own profile change
    #[instrument(skip(self, input, existing), fields(member_id = %existing.id))]
    pub async fn validate_profile(
        &self,
        mut input: ProfileInput,
        existing: &Member,
    ) -> ServiceResult<ValidProfile> {
        input.email = input.email.trim().to_string();
        input.password = blank_to_none(input.password);
        input.confirm_password = blank_to_none(input.confirm_password);

        input.validate().map_err(member_shape_error)?;
        validate_email(&input.email)?;
        check_password(input.password.as_deref(), input.confirm_password.as_deref())?;
        self.check_email_free(&input.email, Some(existing.id)).await?;

        Ok(ValidProfile {
            email: input.email,
            password: input.password,
        })
    }

    /// Validate course fields for add (`existing` is `None`) or edit
    #[instrument(skip(self, input, existing), fields(name = %input.name, code = %input.code))]
    pub async fn validate_course(
        &self,
        input: CourseInput,
        existing: Option<&Course>,
    ) -> ServiceResult<NewCourse> {
        input.validate().map_err(text_shape_error)?;
        let fields = NewCourse::new(input.name, input.code, input.group, input.description)?;

        let taken = self
            .ctx
            .course_repo()
            .find_by_name_and_code(&fields.name, &fields.code)
            .await?;
        if let Some(other) = taken {
            if Some(other.id) != existing.map(|c| c.id) {
                return Err(DomainError::DuplicateCourse {
                    name: fields.name,
                    code: fields.code,
                }
                .into());
            }
        }

        Ok(fields)
    }

    /// Validate role fields for add (`existing` is `None`) or edit
    #[instrument(skip(self, input, existing), fields(name = %input.name, privilege = input.privilege))]
    pub async fn validate_role(
        &self,
        input: RoleInput,
        existing: Option<&Role>,
    ) -> ServiceResult<NewRole> {
        if existing.is_some_and(Role::is_unassigned) {
            return Err(DomainError::ReservedRoleId.into());
        }
        if !Privilege::new(input.privilege).is_grantable() {
            return Err(DomainError::InvalidPrivilege(input.privilege).into());
        }
        input.validate().map_err(text_shape_error)?;

        let fields = match existing {
            Some(role) => NewRole::with_id(role.id, input.name, Privilege::new(input.privilege))?,
            None => NewRole::new(input.name, Privilege::new(input.privilege))?,
        };
        let own_id = existing.map(|r| r.id);

        if let Some(other) = self.ctx.role_repo().find_by_name(&fields.name).await? {
            if Some(other.id) != own_id {
                return Err(DomainError::DuplicateRoleName.into());
            }
        }
        if let Some(other) = self.ctx.role_repo().find_by_privilege(fields.privilege).await? {
            if Some(other.id) != own_id {
                return Err(DomainError::DuplicatePrivilege.into());
            }
        }

        Ok(fields)
    }

    async fn check_email_free(
        &self,
        email: &str,
        own_id: Option<tracker_core::MemberId>,
    ) -> ServiceResult<()> {
        if let Some(other) = self.ctx.member_repo().find_by_email(email).await? {
            if Some(other.id) != own_id {
                debug!(member_id = %other.id, "Email already taken");
                return Err(DomainError::DuplicateEmail.into());
            }
        }
        Ok(())
    }
}

fn blank_to_none(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn check_password(password: Option<&str>, confirm: Option<&str>) -> Result<(), DomainError> {
    if let Some(password) = password {
        validate_password(password)?;
        if confirm.is_some_and(|c| c != password) {
            return Err(DomainError::PasswordMismatch);
        }
    }
    Ok(())
}

/// Map derive failures on member and profile inputs onto field-level errors
fn member_shape_error(errors: ValidationErrors) -> ServiceError {
    let fields = errors.field_errors();
    let domain = if fields.contains_key("name") {
        Some(DomainError::InvalidName)
    } else if fields.contains_key("email") {
        Some(DomainError::InvalidEmail)
    } else if fields.contains_key("password") {
        Some(DomainError::InvalidPassword)
    } else {
        None
    };

    match domain {
        Some(err) => err.into(),
        None => ServiceError::from(errors),
    }
}

/// Map derive failures on course and role inputs onto `InvalidField`
fn text_shape_error(errors: ValidationErrors) -> ServiceError {
    let fields = errors.field_errors();
    let domain = ["name", "code", "group", "description"]
        .into_iter()
        .find_map(|field| {
            let message = fields
                .get(field)?
                .first()
                .and_then(|e| e.message.as_ref())
                .map_or_else(|| "is invalid".to_string(), ToString::to_string);
            Some(DomainError::InvalidField { field, message })
        });

    match domain {
        Some(err) => err.into(),
        None => ServiceError::from(errors),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::Fixture;

    #[tokio::test]
    async fn test_member_fields_trimmed() {
        let fx = Fixture::new().await;
        let validator = Validator::new(&fx.ctx);

        let input = MemberInput::new("  leto  ", " leto@tracker.com ").with_password("Secret123");
        let valid = validator.validate_member(input, None).await.unwrap();
        assert_eq!(valid.name, "leto");
        assert_eq!(valid.email, "leto@tracker.com");
        assert_eq!(valid.password.as_deref(), Some("Secret123"));
        assert!(!format!("{valid:?}").contains("Secret123"));
    }

    #[tokio::test]
    async fn test_member_name_unique_ignoring_case() {
        let fx = Fixture::new().await;
        let validator = Validator::new(&fx.ctx);

        let input = MemberInput::new("ADMIN", "other@tracker.com").with_password("Secret123");
        let err = validator.validate_member(input, None).await.unwrap_err();
        assert!(matches!(err, ServiceError::Domain(DomainError::DuplicateName)));

        let own = MemberInput::new("Admin", "ADMIN@tracker.com");
        let valid = validator.validate_member(own, Some(&fx.admin)).await.unwrap();
        assert!(valid.password.is_none());
    }

    #[tokio::test]
    async fn test_confirmation_only_checked_when_given() {
        let fx = Fixture::new().await;
        let validator = Validator::new(&fx.ctx);

        let mut input = MemberInput::new("leto", "leto@tracker.com");
        input.password = Some("Secret123".to_string());
        assert!(validator.validate_member(input.clone(), None).await.is_ok());

        input.confirm_password = Some("Secret321".to_string());
        let err = validator.validate_member(input, None).await.unwrap_err();
        assert!(matches!(err, ServiceError::Domain(DomainError::PasswordMismatch)));
    }

    #[tokio::test]
    async fn test_profile_keeps_own_email() {
        let fx = Fixture::new().await;
        let paul = fx.member("paul").await;
        let validator = Validator::new(&fx.ctx);

        let profile = ProfileInput {
            email: "PAUL@tracker.com".to_string(),
            ..ProfileInput::default()
        };
        let valid = validator.validate_profile(profile, &paul).await.unwrap();
        assert!(valid.password.is_none());

        let weak = ProfileInput {
            email: "paul@tracker.com".to_string(),
            password: Some("password".to_string()),
            confirm_password: None,
        };
        let err = validator.validate_profile(weak, &paul).await.unwrap_err();
        assert_eq!(err.field(), Some("password"));
    }

    #[tokio::test]
    async fn test_course_fields() {
        let fx = Fixture::new().await;
        let course_id = fx.course("Database Security").await;
        let course = fx.ctx.course_repo().find_by_id(course_id).await.unwrap().unwrap();
        let validator = Validator::new(&fx.ctx);

        let fields = validator
            .validate_course(CourseInput::new("Web Security", "SDEV 300").group(" "), None)
            .await
            .unwrap();
        assert_eq!(fields.group, None);

        let err = validator
            .validate_course(CourseInput::new("Database Security", "sdev 300"), None)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Domain(DomainError::DuplicateCourse { .. })));

        let same = CourseInput::new("Database Security", "SDEV 300").description("Updated");
        assert!(validator.validate_course(same, Some(&course)).await.is_ok());

        let err = validator
            .validate_course(CourseInput::new("Web Security", "#300"), None)
            .await
            .unwrap_err();
        assert_eq!(err.field(), Some("code"));
    }

    #[tokio::test]
    async fn test_role_fields() {
        let fx = Fixture::new().await;
        let teacher = fx.role("Teacher", 20).await;
        let validator = Validator::new(&fx.ctx);

        let fields = validator
            .validate_role(RoleInput::new("Chair", 30), None)
            .await
            .unwrap();
        assert_eq!(fields.id, None);

        let err = validator
            .validate_role(RoleInput::new("Unassigned", 5), None)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Domain(DomainError::DuplicateRoleName)));

        let fields = validator
            .validate_role(RoleInput::new("Teacher", 20), Some(&teacher))
            .await
            .unwrap();
        assert_eq!(fields.id, Some(teacher.id));

        let err = validator
            .validate_role(RoleInput::new("Teacher", 99), Some(&tracker_core::Role::unassigned()))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Domain(DomainError::ReservedRoleId)));
    }
}
