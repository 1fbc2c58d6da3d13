//! One-off startup tasks: the bootstrap admin account and catalog seeding.

use eduvillage_core::account::normalize_email;
use eduvillage_core::catalog::school_catalog;
use eduvillage_core::roles::Role;
use eduvillage_db::models::user::CreateUser;
use eduvillage_db::repositories::{CourseRepo, UserRepo};
use eduvillage_db::DbPool;

use crate::auth::password::hash_password;
use crate::config::AdminBootstrap;

#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Password hashing failed: {0}")]
    PasswordHash(String),
}

/// Create the configured admin account unless a user with that email exists.
///
/// Returns `true` if an account was created. An existing account is left
/// untouched, including its role and password.
pub async fn ensure_admin(pool: &DbPool, admin: &AdminBootstrap) -> Result<bool, BootstrapError> {
    let email = normalize_email(&admin.email);
    if UserRepo::find_by_email(pool, &email).await?.is_some() {
        tracing::debug!(email = %email, "Bootstrap admin already exists");
        return Ok(false);
    }

    let password_hash =
        hash_password(&admin.password).map_err(|e| BootstrapError::PasswordHash(e.to_string()))?;
    let user = UserRepo::create(
        pool,
        &CreateUser {
            name: "Administrator".to_string(),
            email,
            password_hash,
            role: Role::Admin.as_str().to_string(),
        },
    )
    .await?;

    tracing::info!(user_id = user.id, "Bootstrap admin created");
    Ok(true)
}

/// Insert the built-in school catalog if the course table is empty.
///
/// Returns the number of courses inserted.
pub async fn seed_courses(pool: &DbPool) -> Result<usize, BootstrapError> {
    if CourseRepo::count(pool).await? > 0 {
        tracing::debug!("Course catalog not empty, skipping seed");
        return Ok(0);
    }
    let created = CourseRepo::create_many(pool, &school_catalog(), None).await?;
    tracing::info!(count = created.len(), "Seeded school catalog");
    Ok(created.len())
}
