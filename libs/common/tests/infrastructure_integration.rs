//! Integration tests for the infrastructure components
//!
//! These tests verify that PostgreSQL is reachable, that the embedded
//! migrations apply and that deleting a user cascades to orders and cart items.
//! They need `DATABASE_URL` to point at a disposable database.

use common::database::{DatabaseConfig, health_check, init_pool, run_migrations};
use sqlx::Row;
use uuid::Uuid;

#[tokio::test]
#[ignore = "requires a running PostgreSQL instance"]
async fn test_infrastructure_integration() -> Result<(), Box<dyn std::error::Error>> {
    let db_config = DatabaseConfig::from_env()?;
    let pool = init_pool(&db_config).await?;

    assert!(health_check(&pool).await?, "Database health check failed");

    run_migrations(&pool).await?;

    let row = sqlx::query("SELECT 1 as result").fetch_one(&pool).await?;
    let result: i32 = row.get("result");
    assert_eq!(result, 1, "PostgreSQL simple query test failed");

    Ok(())
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL instance"]
async fn test_user_deletion_cascades_to_orders() -> Result<(), Box<dyn std::error::Error>> {
    let pool = init_pool(&DatabaseConfig::from_env()?).await?;
    run_migrations(&pool).await?;

    let user_id = Uuid::new_v4();
    let pizza_id = Uuid::new_v4();
    let order_id = Uuid::new_v4();

    sqlx::query(
        "INSERT INTO users (id, name, email, phone, gender, role, password_hash)
         VALUES ($1, 'Cascade', $2, '0800', 'Male', 'User', 'hash')",
    )
    .bind(user_id)
    .bind(format!("{}@example.com", user_id))
    .execute(&pool)
    .await?;

    sqlx::query(
        "INSERT INTO pizzas (id, name, topping, price, quantity, image, description)
         VALUES ($1, 'Margherita', 'Basil', 10, 5, 'img.png', 'Classic')",
    )
    .bind(pizza_id)
    .execute(&pool)
    .await?;

    sqlx::query("INSERT INTO orders (id, user_id, total_price, total_quantity) VALUES ($1, $2, 20, 2)")
        .bind(order_id)
        .bind(user_id)
        .execute(&pool)
        .await?;

    sqlx::query(
        "INSERT INTO cart_items (id, name, price, quantity, pizza_id, order_id)
         VALUES ($1, 'Margherita', 10, 2, $2, $3)",
    )
    .bind(Uuid::new_v4())
    .bind(pizza_id)
    .bind(order_id)
    .execute(&pool)
    .await?;

    sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(user_id)
        .execute(&pool)
        .await?;

    let remaining: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM cart_items WHERE order_id = $1")
        .bind(order_id)
        .fetch_one(&pool)
        .await?;
    assert_eq!(remaining, 0, "cart items should be removed with their order");

    sqlx::query("DELETE FROM pizzas WHERE id = $1")
        .bind(pizza_id)
        .execute(&pool)
        .await?;

    Ok(())
}
