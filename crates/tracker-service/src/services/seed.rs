//! Default data seeding
//!
//! Creates the reserved Unassigned role, the default course roles and the
//! configured administrator. Running it again only fills in what is missing.

use tracing::{debug, info, instrument, warn};

use tracker_common::SeedConfig;
use tracker_core::entities::{NewMember, NewRole};
use tracker_core::{Privilege, RoleId, UNASSIGNED_ROLE_NAME};

use crate::dto::{MemberInput, SeedReport};

use super::context::ServiceContext;
use super::error::ServiceResult;
use super::validation::Validator;

/// Roles every fresh install starts with
pub const DEFAULT_ROLES: [(&str, i32); 3] = [("Student", 1), ("Teacher", 20), ("Chair", 30)];

/// Seed default roles and the configured admin
#[instrument(skip(ctx, config))]
pub async fn seed_defaults(ctx: &ServiceContext, config: &SeedConfig) -> ServiceResult<SeedReport> {
    let mut report = SeedReport::default();
    let roles = ctx.role_repo();

    if roles.find_by_id(RoleId::UNASSIGNED).await?.is_none() {
        let unassigned = NewRole::with_id(RoleId::UNASSIGNED, UNASSIGNED_ROLE_NAME, Privilege::UNASSIGNED)?;
        roles.create(&unassigned).await?;
        report.roles_created.push(UNASSIGNED_ROLE_NAME.to_string());
    }

    for (name, level) in DEFAULT_ROLES {
        let privilege = Privilege::new(level);
        if roles.find_by_name(name).await?.is_some() || roles.find_by_privilege(privilege).await?.is_some() {
            debug!(name, level, "Default role already present");
            continue;
        }
        roles.create(&NewRole::new(name, privilege)?).await?;
        report.roles_created.push(name.to_string());
    }

    match config.admin_password.as_deref() {
        Some(password) => {
            let members = ctx.member_repo();
            let taken = members.find_by_name(&config.admin_name).await?.is_some()
                || members.find_by_email(&config.admin_email).await?.is_some();
            if taken {
                debug!(name = %config.admin_name, "Admin already present");
            } else {
                let input = MemberInput::new(config.admin_name.as_str(), config.admin_email.as_str())
                    .with_password(password)
                    .admin(true);
                let valid = Validator::new(ctx).validate_member(input, None).await?;
                let password_hash = ctx.password_service().hash(password)?;
                let admin = members
                    .create(&NewMember::new(valid.name, valid.email, password_hash, true)?)
                    .await?;
                report.admin_created = Some(admin.name);
            }
        }
        None => warn!("No admin password configured; skipping admin seed"),
    }

    if report.is_noop() {
        info!("Seed data already present");
    } else {
        info!(roles = ?report.roles_created, admin = ?report.admin_created, "Seeded defaults");
    }

    Ok(report)
}
