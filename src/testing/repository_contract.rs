//! Repository contract: the behavior every [`UserRepository`] must show.
//!
//! [`run`] drives the full suite against any adapter. The factory is called
//! once per case and must produce an empty store each time; cleanup between
//! cases (truncation, teardown) is the caller's job.

use std::future::Future;
use std::time::Duration;

use chrono::Utc;

use crate::domain::user::{
    Continent, CountryCode, Email, HashedPassword, NewUser, Role, User, UserId, UserPatch,
    UserRepository, UserStatus, Username,
};
use crate::domain::{DomainError, UniqueField};

const HASH: &str = "$2b$12$C6UzMDM.H6dfI/f/IKcEeO7ZBw5qMeEjV1kqCJS8g6cMqrYhWCEG6";

/// Run every contract case, each against a fresh repository from `factory`.
pub async fn run<R, F, Fut>(factory: F)
where
    R: UserRepository,
    F: Fn() -> Fut,
    Fut: Future<Output = R>,
{
    persists_new_account_with_pending_status(factory().await).await;
    round_trips_every_field(factory().await).await;
    finds_by_email_and_username(factory().await).await;
    misses_return_none(factory().await).await;
    rejects_duplicate_email(factory().await).await;
    rejects_duplicate_username(factory().await).await;
    exists_helpers_observe_the_store(factory().await).await;
    update_applies_patch_and_refreshes_updated_at(factory().await).await;
    update_missing_id_returns_none(factory().await).await;
    update_rejects_taken_email(factory().await).await;
    update_clears_country(factory().await).await;
    update_records_last_login(factory().await).await;
    delete_is_idempotent(factory().await).await;
    counts_users(factory().await).await;
    lists_by_role(factory().await).await;
    lists_by_country(factory().await).await;
    lists_oldest_first(factory().await).await;
    continent_filter_follows_primary_policy(factory().await).await;
    continent_stats_follow_primary_policy(factory().await).await;
}

fn account(email: &str, username: &str, role: Role, country: Option<&str>) -> NewUser {
    NewUser {
        email: Email::new(email).unwrap(),
        username: Username::new(username).unwrap(),
        password_hash: HashedPassword::new(HASH).unwrap(),
        role,
        country: country.map(|code| CountryCode::new(code).unwrap()),
    }
}

fn student(email: &str, username: &str, country: Option<&str>) -> NewUser {
    account(email, username, Role::Student, country)
}

/// Both engines store microseconds; a short pause guarantees strictly
/// increasing `created_at` values between consecutive inserts.
async fn pause() {
    tokio::time::sleep(Duration::from_millis(2)).await;
}

fn assert_same_user(left: &User, right: &User) {
    assert_eq!(left.id(), right.id());
    assert_eq!(left.email(), right.email());
    assert_eq!(left.username(), right.username());
    assert_eq!(left.password_hash().as_str(), right.password_hash().as_str());
    assert_eq!(left.role(), right.role());
    assert_eq!(left.status(), right.status());
    assert_eq!(left.country(), right.country());
    assert_eq!(left.last_login_at(), right.last_login_at());
    assert_eq!(left.created_at(), right.created_at());
    assert_eq!(left.updated_at(), right.updated_at());
}

fn usernames(users: &[User]) -> Vec<&str> {
    users.iter().map(|user| user.username().as_str()).collect()
}

async fn persists_new_account_with_pending_status<R: UserRepository>(repo: R) {
    repo.create(student("a@b.com", "abc", None)).await.unwrap();

    let created = repo
        .find_by_email(&Email::new("a@b.com").unwrap())
        .await
        .unwrap()
        .unwrap();

    assert!(!created.id().as_str().is_empty());
    assert!(created.role().is_student());
    assert_eq!(created.status(), UserStatus::ConfirmationPending);
    assert!(created.last_login_at().is_none());
    assert_eq!(created.created_at(), created.updated_at());
}

async fn round_trips_every_field<R: UserRepository>(repo: R) {
    let created = repo
        .create(account(
            "ruslan@example.com",
            "ruslan",
            Role::Admin,
            Some("RU"),
        ))
        .await
        .unwrap();

    let fetched = repo.find_by_id(created.id()).await.unwrap().unwrap();
    assert_same_user(&created, &fetched);
}

async fn finds_by_email_and_username<R: UserRepository>(repo: R) {
    let created = repo
        .create(student("maria@example.com", "maria", None))
        .await
        .unwrap();

    let by_email = repo
        .find_by_email(created.email())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(by_email.id(), created.id());

    let by_username = repo
        .find_by_username(created.username())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(by_username.id(), created.id());
}

async fn misses_return_none<R: UserRepository>(repo: R) {
    assert!(repo
        .find_by_id(&UserId::generate())
        .await
        .unwrap()
        .is_none());
    assert!(repo
        .find_by_email(&Email::new("ghost@example.com").unwrap())
        .await
        .unwrap()
        .is_none());
    assert!(repo
        .find_by_username(&Username::new("ghost").unwrap())
        .await
        .unwrap()
        .is_none());
}

async fn rejects_duplicate_email<R: UserRepository>(repo: R) {
    let first = repo
        .create(student("maria@example.com", "maria", None))
        .await
        .unwrap();

    let err = repo
        .create(student("maria@example.com", "other", None))
        .await
        .unwrap_err();

    assert_eq!(
        err,
        DomainError::conflict(UniqueField::Email, "maria@example.com")
    );

    // The first record is untouched
    let kept = repo
        .find_by_email(first.email())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(kept.id(), first.id());
    assert_eq!(kept.username().as_str(), "maria");
    assert_eq!(repo.count_users().await.unwrap(), 1);
}

async fn rejects_duplicate_username<R: UserRepository>(repo: R) {
    repo.create(student("maria@example.com", "maria", None))
        .await
        .unwrap();

    let err = repo
        .create(student("other@example.com", "maria", None))
        .await
        .unwrap_err();

    assert_eq!(err, DomainError::conflict(UniqueField::Username, "maria"));
}

async fn exists_helpers_observe_the_store<R: UserRepository>(repo: R) {
    let email = Email::new("maria@example.com").unwrap();
    let username = Username::new("maria").unwrap();

    assert!(!repo.exists_by_email(&email).await.unwrap());
    assert!(!repo.exists_by_username(&username).await.unwrap());

    repo.create(student("maria@example.com", "maria", None))
        .await
        .unwrap();

    assert!(repo.exists_by_email(&email).await.unwrap());
    assert!(repo.exists_by_username(&username).await.unwrap());
}

async fn update_applies_patch_and_refreshes_updated_at<R: UserRepository>(repo: R) {
    let created = repo
        .create(student("maria@example.com", "maria", Some("ES")))
        .await
        .unwrap();
    pause().await;

    let patch = UserPatch {
        email: Some(Email::new("maria.lopez@example.com").unwrap()),
        role: Some(Role::ContentCreator),
        status: Some(UserStatus::Active),
        ..UserPatch::default()
    };
    let updated = repo.update(created.id(), patch).await.unwrap().unwrap();

    assert_eq!(updated.email().as_str(), "maria.lopez@example.com");
    assert_eq!(updated.role(), Role::ContentCreator);
    assert_eq!(updated.status(), UserStatus::Active);
    assert_eq!(updated.username().as_str(), "maria");
    assert!(updated.updated_at() > created.updated_at());
    assert_eq!(updated.created_at(), created.created_at());

    let fetched = repo.find_by_id(created.id()).await.unwrap().unwrap();
    assert_same_user(&updated, &fetched);
}

async fn update_missing_id_returns_none<R: UserRepository>(repo: R) {
    let patch = UserPatch {
        role: Some(Role::Admin),
        ..UserPatch::default()
    };
    let result = repo.update(&UserId::generate(), patch).await.unwrap();
    assert!(result.is_none());
}

async fn update_rejects_taken_email<R: UserRepository>(repo: R) {
    repo.create(student("maria@example.com", "maria", None))
        .await
        .unwrap();
    let other = repo
        .create(student("pablo@example.com", "pablo", None))
        .await
        .unwrap();

    let patch = UserPatch {
        email: Some(Email::new("maria@example.com").unwrap()),
        ..UserPatch::default()
    };
    let err = repo.update(other.id(), patch).await.unwrap_err();

    assert_eq!(
        err,
        DomainError::conflict(UniqueField::Email, "maria@example.com")
    );

    // The failed update must not have touched the row
    let fetched = repo.find_by_id(other.id()).await.unwrap().unwrap();
    assert_eq!(fetched.email().as_str(), "pablo@example.com");
}

async fn update_clears_country<R: UserRepository>(repo: R) {
    let created = repo
        .create(student("maria@example.com", "maria", Some("ES")))
        .await
        .unwrap();

    let patch = UserPatch {
        country: Some(None),
        ..UserPatch::default()
    };
    let updated = repo.update(created.id(), patch).await.unwrap().unwrap();
    assert!(updated.country().is_none());

    let fetched = repo.find_by_id(created.id()).await.unwrap().unwrap();
    assert!(fetched.country().is_none());
}

async fn update_records_last_login<R: UserRepository>(repo: R) {
    let created = repo
        .create(student("maria@example.com", "maria", None))
        .await
        .unwrap();

    let patch = UserPatch {
        last_login_at: Some(Some(Utc::now())),
        ..UserPatch::default()
    };
    let updated = repo.update(created.id(), patch).await.unwrap().unwrap();
    assert!(updated.last_login_at().is_some());

    let fetched = repo.find_by_id(created.id()).await.unwrap().unwrap();
    assert_eq!(fetched.last_login_at(), updated.last_login_at());
}

async fn delete_is_idempotent<R: UserRepository>(repo: R) {
    let created = repo
        .create(student("maria@example.com", "maria", None))
        .await
        .unwrap();

    repo.delete(created.id()).await.unwrap();
    assert!(repo.find_by_id(created.id()).await.unwrap().is_none());

    // Absent id: the post-condition already holds
    repo.delete(created.id()).await.unwrap();
    repo.delete(&UserId::generate()).await.unwrap();
}

async fn counts_users<R: UserRepository>(repo: R) {
    assert_eq!(repo.count_users().await.unwrap(), 0);

    repo.create(student("maria@example.com", "maria", None))
        .await
        .unwrap();
    let second = repo
        .create(student("pablo@example.com", "pablo", None))
        .await
        .unwrap();
    assert_eq!(repo.count_users().await.unwrap(), 2);

    repo.delete(second.id()).await.unwrap();
    assert_eq!(repo.count_users().await.unwrap(), 1);
}

async fn lists_by_role<R: UserRepository>(repo: R) {
    repo.create(account("admin@example.com", "admin", Role::Admin, None))
        .await
        .unwrap();
    repo.create(student("maria@example.com", "maria", None))
        .await
        .unwrap();
    repo.create(student("pablo@example.com", "pablo", None))
        .await
        .unwrap();

    let students = repo.find_users_by_role(Role::Student).await.unwrap();
    let mut names = usernames(&students);
    names.sort_unstable();
    assert_eq!(names, ["maria", "pablo"]);

    assert!(repo
        .find_users_by_role(Role::ContentCreator)
        .await
        .unwrap()
        .is_empty());
}

async fn lists_by_country<R: UserRepository>(repo: R) {
    repo.create(student("maria@example.com", "maria", Some("ES")))
        .await
        .unwrap();
    repo.create(student("pablo@example.com", "pablo", Some("ES")))
        .await
        .unwrap();
    repo.create(student("haruki@example.com", "haruki", Some("JP")))
        .await
        .unwrap();
    repo.create(student("nomad@example.com", "nomad", None))
        .await
        .unwrap();

    let spain = CountryCode::new("ES").unwrap();
    let from_spain = repo.find_users_by_country(&spain).await.unwrap();
    let mut names = usernames(&from_spain);
    names.sort_unstable();
    assert_eq!(names, ["maria", "pablo"]);

    let germany = CountryCode::new("DE").unwrap();
    assert!(repo.find_users_by_country(&germany).await.unwrap().is_empty());
}

async fn lists_oldest_first<R: UserRepository>(repo: R) {
    repo.create(student("alpha@example.com", "alpha", Some("ES")))
        .await
        .unwrap();
    pause().await;
    repo.create(student("bravo@example.com", "bravo", Some("ES")))
        .await
        .unwrap();
    pause().await;
    repo.create(student("charlie@example.com", "charlie", Some("ES")))
        .await
        .unwrap();

    let by_role = repo.find_users_by_role(Role::Student).await.unwrap();
    assert_eq!(usernames(&by_role), ["alpha", "bravo", "charlie"]);

    let spain = CountryCode::new("ES").unwrap();
    let by_country = repo.find_users_by_country(&spain).await.unwrap();
    assert_eq!(usernames(&by_country), ["alpha", "bravo", "charlie"]);

    let by_continent = repo
        .find_users_by_continent(Continent::Europe)
        .await
        .unwrap();
    assert_eq!(usernames(&by_continent), ["alpha", "bravo", "charlie"]);
}

async fn continent_filter_follows_primary_policy<R: UserRepository>(repo: R) {
    repo.create(student("ruslan@example.com", "ruslan", Some("RU")))
        .await
        .unwrap();
    repo.create(student("elena@example.com", "elena", Some("ES")))
        .await
        .unwrap();
    repo.create(student("costas@example.com", "costas", Some("CY")))
        .await
        .unwrap();

    // RU is transcontinental but primarily Asia; CY primarily Europe
    let asia = repo
        .find_users_by_continent(Continent::Asia)
        .await
        .unwrap();
    assert_eq!(usernames(&asia), ["ruslan"]);

    let europe = repo
        .find_users_by_continent(Continent::Europe)
        .await
        .unwrap();
    let mut names = usernames(&europe);
    names.sort_unstable();
    assert_eq!(names, ["costas", "elena"]);

    assert!(repo
        .find_users_by_continent(Continent::Africa)
        .await
        .unwrap()
        .is_empty());
}

async fn continent_stats_follow_primary_policy<R: UserRepository>(repo: R) {
    repo.create(student("ruslan@example.com", "ruslan", Some("RU")))
        .await
        .unwrap();
    repo.create(student("aray@example.com", "aray", Some("KZ")))
        .await
        .unwrap();
    repo.create(student("elena@example.com", "elena", Some("ES")))
        .await
        .unwrap();
    repo.create(student("nomad@example.com", "nomad", None))
        .await
        .unwrap();

    let by_continent = repo.user_stats_by_continent().await.unwrap();
    assert_eq!(by_continent.get(&Continent::Asia), Some(&2));
    assert_eq!(by_continent.get(&Continent::Europe), Some(&1));
    assert_eq!(by_continent.values().sum::<u64>(), 3);

    let by_country = repo.user_stats_by_country().await.unwrap();
    assert_eq!(
        by_country.get(&CountryCode::new("RU").unwrap()),
        Some(&1)
    );
    assert_eq!(
        by_country.get(&CountryCode::new("KZ").unwrap()),
        Some(&1)
    );
    assert_eq!(
        by_country.get(&CountryCode::new("ES").unwrap()),
        Some(&1)
    );
    assert_eq!(by_country.len(), 3);
}
