//! Repository contract suite against the in-memory adapter

use identity_core::testing::repository_contract;
use identity_core::InMemoryUserRepository;

#[tokio::test]
async fn in_memory_repository_satisfies_the_contract() {
    repository_contract::run(|| async { InMemoryUserRepository::new() }).await;
}
