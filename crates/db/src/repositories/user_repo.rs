//! Repository for the `users` table and its `viewers` / `admins` role markers.

use cinestream_core::roles::Role;
use cinestream_core::types::DbId;
use sqlx::PgPool;

use crate::models::user::{CreateUser, UpdateUser, User, UserWithRole};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, age, email, password_hash, preference, created_at, updated_at";

/// Resolves the role of the row aliased `u`. Viewer membership is checked
/// first; a user without a marker row yields NULL.
const ROLE_EXPR: &str = "CASE \
        WHEN EXISTS (SELECT 1 FROM viewers v WHERE v.user_id = u.id) THEN 'viewer' \
        WHEN EXISTS (SELECT 1 FROM admins a WHERE a.user_id = u.id) THEN 'admin' \
     END";

/// Provides CRUD operations for users.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new user and its role marker in one transaction.
    ///
    /// If the marker insert fails the user row is rolled back, so a user
    /// never exists without exactly one role.
    pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<User, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO users (name, age, email, password_hash, preference)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        let user = sqlx::query_as::<_, User>(&query)
            .bind(&input.name)
            .bind(input.age)
            .bind(&input.email)
            .bind(&input.password_hash)
            .bind(input.preference.as_str())
            .fetch_one(&mut *tx)
            .await?;

        Self::insert_role_marker(&mut tx, user.id, input.role).await?;

        tx.commit().await?;
        Ok(user)
    }

    /// Find a user by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by email. Emails are stored lowercased.
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE email = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// Resolve a user's role from the marker tables.
    ///
    /// Returns `None` if the user does not exist or has no marker row.
    pub async fn resolve_role(pool: &PgPool, user_id: DbId) -> Result<Option<Role>, sqlx::Error> {
        let query = format!("SELECT {ROLE_EXPR} FROM users u WHERE u.id = $1");
        let role: Option<Option<String>> = sqlx::query_scalar(&query)
            .bind(user_id)
            .fetch_optional(pool)
            .await?;
        Ok(role.flatten().and_then(|r| r.parse().ok()))
    }

    /// List all users with their resolved role, ordered by name.
    pub async fn list_with_roles(pool: &PgPool) -> Result<Vec<UserWithRole>, sqlx::Error> {
        let query = format!(
            "SELECT u.id, u.name, u.age, u.email, u.preference, {ROLE_EXPR} AS role, u.created_at
             FROM users u
             ORDER BY u.name ASC, u.id ASC"
        );
        sqlx::query_as::<_, UserWithRole>(&query)
            .fetch_all(pool)
            .await
    }

    /// Update a user. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateUser,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "UPDATE users SET
                name = COALESCE($2, name),
                age = COALESCE($3, age),
                email = COALESCE($4, email),
                preference = COALESCE($5, preference)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(input.age)
            .bind(&input.email)
            .bind(input.preference.map(|p| p.as_str()))
            .fetch_optional(pool)
            .await
    }

    /// Apply an admin edit in one transaction: profile fields, then the
    /// role marker and password hash when given.
    ///
    /// Returns `None` if no row with the given `id` exists; nothing is
    /// written in that case.
    pub async fn update_account(
        pool: &PgPool,
        id: DbId,
        input: &UpdateUser,
        role: Option<Role>,
        password_hash: Option<&str>,
    ) -> Result<Option<User>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE users SET
                name = COALESCE($2, name),
                age = COALESCE($3, age),
                email = COALESCE($4, email),
                preference = COALESCE($5, preference),
                password_hash = COALESCE($6, password_hash)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let Some(user) = sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(input.age)
            .bind(&input.email)
            .bind(input.preference.map(|p| p.as_str()))
            .bind(password_hash)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(None);
        };

        if let Some(role) = role {
            Self::replace_role_marker(&mut tx, id, role).await?;
        }

        tx.commit().await?;
        Ok(Some(user))
    }

    async fn replace_role_marker(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        user_id: DbId,
        role: Role,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM viewers WHERE user_id = $1")
            .bind(user_id)
            .execute(&mut **tx)
            .await?;
        sqlx::query("DELETE FROM admins WHERE user_id = $1")
            .bind(user_id)
            .execute(&mut **tx)
            .await?;
        Self::insert_role_marker(tx, user_id, role).await
    }

    /// Update a user's password hash. Returns `true` if the row was updated.
    pub async fn update_password(
        pool: &PgPool,
        id: DbId,
        password_hash: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE users SET password_hash = $2 WHERE id = $1")
            .bind(id)
            .bind(password_hash)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete a user. Bookings, subscriptions, payments, activity and the
    /// role marker go with it via `ON DELETE CASCADE`.
    ///
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn insert_role_marker(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        user_id: DbId,
        role: Role,
    ) -> Result<(), sqlx::Error> {
        let query = format!("INSERT INTO {} (user_id) VALUES ($1)", role.marker_table());
        sqlx::query(&query)
            .bind(user_id)
            .execute(&mut **tx)
            .await?;
        Ok(())
    }
}
