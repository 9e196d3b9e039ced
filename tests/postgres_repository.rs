//! Repository contract suite against PostgreSQL
//!
//! Needs a reachable database: set `POSTGRES_TEST_URL` (a `.env` file is
//! honoured) and run `cargo test -- --ignored`.

use identity_core::config::DatabaseConfig;
use identity_core::testing::repository_contract;
use identity_core::PostgresUserRepository;

#[tokio::test]
#[ignore = "requires POSTGRES_TEST_URL pointing at a PostgreSQL database"]
async fn postgres_repository_satisfies_the_contract() {
    dotenvy::dotenv().ok();
    let url = std::env::var("POSTGRES_TEST_URL")
        .expect("POSTGRES_TEST_URL must be set to run the PostgreSQL contract suite");

    let config = DatabaseConfig {
        postgres_url: Some(url),
        ..DatabaseConfig::default()
    };
    let repo = PostgresUserRepository::connect(&config).await.unwrap();
    repo.ensure_schema().await.unwrap();

    let pool = repo.pool().clone();
    repository_contract::run(|| {
        let pool = pool.clone();
        async move {
            sqlx::query("TRUNCATE TABLE users")
                .execute(&pool)
                .await
                .unwrap();
            PostgresUserRepository::new(pool.clone())
        }
    })
    .await;
}
