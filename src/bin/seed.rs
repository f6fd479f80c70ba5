//! Provisions the ADMIN account. Registration only ever creates vendors, so this
//! is the one way an administrator comes into existence.

use anyhow::{Context, bail};
use marketplace_api::{
    config::DatabaseConfig,
    db::{create_pool, run_migrations},
    dto::auth::{is_plausible_email, normalize_email},
    security::hash_password,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = DatabaseConfig::from_env()?;

    let email = normalize_email(&std::env::var("ADMIN_EMAIL").context("ADMIN_EMAIL is not set")?);
    let password = std::env::var("ADMIN_PASSWORD").context("ADMIN_PASSWORD is not set")?;
    let name = std::env::var("ADMIN_NAME").unwrap_or_else(|_| "Administrator".to_string());

    anyhow::ensure!(is_plausible_email(&email), "ADMIN_EMAIL is not a valid email");
    anyhow::ensure!(
        password.chars().count() >= 6,
        "ADMIN_PASSWORD must be at least 6 characters"
    );

    let pool = create_pool(&config.database_url, config.max_connections).await?;
    run_migrations(&pool).await?;

    let admin_id = ensure_admin(&pool, &name, &email, &password).await?;
    println!("Seed completed. Admin ID: {admin_id}");
    Ok(())
}

async fn ensure_admin(
    pool: &sqlx::PgPool,
    name: &str,
    email: &str,
    password: &str,
) -> anyhow::Result<i64> {
    let password_hash = hash_password(password)?;

    let row: Option<(i64,)> = sqlx::query_as(
        r#"
        INSERT INTO users (name, email, password_hash, role)
        VALUES ($1, $2, $3, 'ADMIN')
        ON CONFLICT (email) DO NOTHING
        RETURNING id
        "#,
    )
    .bind(name)
    .bind(email)
    .bind(password_hash)
    .fetch_optional(pool)
    .await?;

    if let Some((id,)) = row {
        println!("Created admin {email}");
        return Ok(id);
    }

    // An existing account keeps its password and role.
    let (id, role): (i64, String) = sqlx::query_as("SELECT id, role FROM users WHERE email = $1")
        .bind(email)
        .fetch_one(pool)
        .await?;
    existing_admin(email, id, &role)
}

fn existing_admin(email: &str, id: i64, role: &str) -> anyhow::Result<i64> {
    if role != "ADMIN" {
        bail!("{email} already belongs to a {role} account (id {id}); choose another ADMIN_EMAIL");
    }
    println!("Admin {email} already exists");
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn existing_admin_is_reused() {
        assert_eq!(existing_admin("root@example.com", 3, "ADMIN").unwrap(), 3);
    }

    #[test]
    fn existing_vendor_is_not_reported_as_admin() {
        let err = existing_admin("asha@example.com", 9, "VENDOR").unwrap_err();
        assert!(err.to_string().contains("VENDOR"));
    }
}
