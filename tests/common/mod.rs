#![allow(dead_code)]

pub mod doubles;

use sqlx::PgPool;

/// Create a pool for the test database and apply migrations
///
/// Returns `None` when DATABASE_URL is unset so PostgreSQL tests pass
/// trivially on machines without a database. Runs the same
/// `sqlx::migrate!` migrations as the server, so tests see the production
/// schema.
pub async fn create_test_pool() -> Option<PgPool> {
    let Ok(database_url) = std::env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL not set; skipping PostgreSQL test");
        return None;
    };

    let pool = PgPool::connect(&database_url)
        .await
        .expect("Failed to connect to test database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    Some(pool)
}

/// Remove every catalog row so each test starts empty
pub async fn cleanup_database(pool: &PgPool) {
    sqlx::query("TRUNCATE TABLE books")
        .execute(pool)
        .await
        .expect("Failed to truncate books");
}
