// src/accounts.rs
//! Staff accounts and their permission grants.
use std::collections::HashSet;

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::info;

use crate::auth::password::hash_password;
use crate::error::AppError;
use crate::models::entity::Permission;
use crate::models::user::User;

pub struct NewUser<'a> {
    pub username: &'a str,
    pub password: &'a str,
    pub is_superuser: bool,
}

pub async fn create_user(pool: &SqlitePool, user: &NewUser<'_>, bcrypt_cost: u32) -> Result<i64, AppError> {
    let password_hash = hash_password(user.password, bcrypt_cost)?;

    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO users (username, password_hash, is_active, is_superuser, created_at)
         VALUES (?, ?, 1, ?, ?) RETURNING id",
    )
    .bind(user.username)
    .bind(password_hash)
    .bind(user.is_superuser)
    .bind(Utc::now())
    .fetch_one(pool)
    .await?;

    Ok(id)
}

pub async fn grant_permission(pool: &SqlitePool, user_id: i64, permission: Permission) -> Result<(), AppError> {
    sqlx::query("INSERT OR IGNORE INTO user_permissions (user_id, codename) VALUES (?, ?)")
        .bind(user_id)
        .bind(permission.to_string())
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn set_active(pool: &SqlitePool, user_id: i64, is_active: bool) -> Result<(), AppError> {
    sqlx::query("UPDATE users SET is_active = ? WHERE id = ?")
        .bind(is_active)
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn find_by_username(pool: &SqlitePool, username: &str) -> Result<Option<User>, AppError> {
    let user = sqlx::query_as::<_, User>(
        "SELECT id, username, password_hash, is_active, is_superuser FROM users WHERE username = ?",
    )
    .bind(username)
    .fetch_optional(pool)
    .await?;
    Ok(user)
}

pub async fn find_active_user(pool: &SqlitePool, user_id: i64) -> Result<Option<User>, AppError> {
    let user = sqlx::query_as::<_, User>(
        "SELECT id, username, password_hash, is_active, is_superuser
         FROM users WHERE id = ? AND is_active = 1",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;
    Ok(user)
}

pub async fn permissions_for(pool: &SqlitePool, user_id: i64) -> Result<HashSet<String>, AppError> {
    let codenames = sqlx::query_scalar::<_, String>(
        "SELECT codename FROM user_permissions WHERE user_id = ?",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    Ok(codenames.into_iter().collect())
}

/// Creates the bootstrap superuser unless an account with that name exists.
pub async fn ensure_superuser(
    pool: &SqlitePool,
    username: &str,
    password: &str,
    bcrypt_cost: u32,
) -> Result<(), AppError> {
    if find_by_username(pool, username).await?.is_some() {
        return Ok(());
    }
    let user = NewUser { username, password, is_superuser: true };
    let id = create_user(pool, &user, bcrypt_cost).await?;
    info!(user_id = id, %username, "Created bootstrap superuser");
    Ok(())
}
