use crate::models::{Role, User};
use sqlx::PgPool;
use uuid::Uuid;

/// Find a user by ID
pub async fn find_by_id(pool: &PgPool, user_id: Uuid) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(
        r#"
        SELECT id, name, email, username, role, created_at
        FROM users
        WHERE id = $1
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await
}

/// All users holding `role`, ordered by name
pub async fn list_by_role(pool: &PgPool, role: Role) -> Result<Vec<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(
        r#"
        SELECT id, name, email, username, role, created_at
        FROM users
        WHERE role = $1
        ORDER BY name ASC, id ASC
        "#,
    )
    .bind(role.as_str())
    .fetch_all(pool)
    .await
}

/// Insert a user. Accounts are normally provisioned by the identity
/// frontend; this is used by tooling and tests.
pub async fn create_user(
    pool: &PgPool,
    name: &str,
    email: &str,
    username: &str,
    role: Role,
) -> Result<User, sqlx::Error> {
    sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (name, email, username, role)
        VALUES ($1, $2, $3, $4)
        RETURNING id, name, email, username, role, created_at
        "#,
    )
    .bind(name)
    .bind(email)
    .bind(username)
    .bind(role.as_str())
    .fetch_one(pool)
    .await
}
