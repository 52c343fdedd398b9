use sqlx::{Pool, Postgres, Row};
use tracing::{error, info};

/// Quick connectivity check used by the `verify-db` subcommand.
///
/// Pings the database, prints the server version and lists the tables in the
/// public schema so an operator can confirm migrations have been applied.
pub async fn run(pool: &Pool<Postgres>) -> Result<(), sqlx::Error> {
    info!("Testing database connection...");

    let row = sqlx::query("SELECT NOW()::text AS now, version() AS version")
        .fetch_one(pool)
        .await
        .map_err(|e| {
            error!("Connection failed: {}", e);
            e
        })?;

    let now: String = row.get("now");
    let version: String = row.get("version");
    println!("Connection successful");
    println!("Current time: {}", now);
    println!(
        "PostgreSQL version: {}",
        version.split(',').next().unwrap_or(&version)
    );

    let tables = sqlx::query(
        r#"
        SELECT table_name
        FROM information_schema.tables
        WHERE table_schema = 'public'
        ORDER BY table_name
        "#,
    )
    .fetch_all(pool)
    .await?;

    let names: Vec<String> = tables
        .iter()
        .map(|r| r.get::<String, _>("table_name"))
        .collect();

    if names.is_empty() {
        println!("Existing tables: none");
    } else {
        println!("Existing tables: {}", names.join(", "));
    }

    Ok(())
}
