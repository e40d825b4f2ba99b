//! Tests for authentication and account administration.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use rstest::{fixture, rstest};

use super::*;
use crate::domain::ports::{
    MockAccountRepository, MockPasswordHasher, PasswordHashError, StoredCredentials,
};
use crate::domain::{DisplayName, EmailAddress, ErrorCode};
use crate::test_support::{PlainTextHasher, SteppingClock};

type Service = AccountService<MockAccountRepository, MockPasswordHasher>;

#[fixture]
fn clock() -> Arc<SteppingClock> {
    Arc::new(SteppingClock::at_opening())
}

fn service(repo: MockAccountRepository, hasher: MockPasswordHasher, clock: Arc<SteppingClock>) -> Service {
    AccountService::new(Arc::new(repo), Arc::new(hasher), clock)
}

fn account(role: Role, clock: &SteppingClock) -> Account {
    Account::new(
        AccountId::random(),
        DisplayName::new("Sam Cook").expect("valid name"),
        EmailAddress::new("sam@example.com").expect("valid email"),
        role,
        clock.utc(),
    )
}

fn credentials(password: &str) -> LoginCredentials {
    LoginCredentials::try_from_parts("sam@example.com", password).expect("valid credentials")
}

fn registration(role: Option<Role>) -> Registration {
    Registration::try_from_parts("Jo Prep", "jo@example.com", "s3cret-pass", role)
        .expect("valid registration")
}

fn stored_hash() -> PasswordHash {
    PasswordHash::new("$argon2id$stub".to_owned())
}

#[rstest]
#[tokio::test]
async fn authenticate_returns_account_for_matching_password(clock: Arc<SteppingClock>) {
    let existing = account(Role::Editor, &clock);
    let expected = existing.clone();
    let mut repo = MockAccountRepository::new();
    repo.expect_find_credentials_by_email()
        .withf(|email| email.as_ref() == "sam@example.com")
        .times(1)
        .return_once(move |_| {
            Ok(Some(StoredCredentials {
                account: existing,
                password_hash: stored_hash(),
            }))
        });
    let mut hasher = MockPasswordHasher::new();
    hasher
        .expect_verify()
        .withf(|password, _| password == "correct-horse")
        .times(1)
        .return_once(|_, _| Ok(true));

    let account = service(repo, hasher, clock)
        .authenticate(&credentials("correct-horse"))
        .await
        .expect("login succeeds");

    assert_eq!(account, expected);
}

#[rstest]
#[case::unknown_email(false)]
#[case::wrong_password(true)]
#[tokio::test]
async fn authenticate_failures_share_one_message(
    clock: Arc<SteppingClock>,
    #[case] account_exists: bool,
) {
    let existing = account(Role::Viewer, &clock);
    let mut repo = MockAccountRepository::new();
    repo.expect_find_credentials_by_email()
        .times(1)
        .return_once(move |_| {
            Ok(account_exists.then(|| StoredCredentials {
                account: existing,
                password_hash: stored_hash(),
            }))
        });
    let mut hasher = MockPasswordHasher::new();
    hasher
        .expect_hash()
        .times(usize::from(!account_exists))
        .returning(|_| Ok(stored_hash()));
    hasher
        .expect_verify()
        .times(1)
        .returning(|_, _| Ok(false));

    let err = service(repo, hasher, clock)
        .authenticate(&credentials("wrong-password"))
        .await
        .expect_err("login rejected");

    assert_eq!(err.code(), ErrorCode::Unauthorized);
    assert_eq!(err.message(), INVALID_LOGIN_MESSAGE);
}

/// Wraps the plain-text hasher and counts verifications.
#[derive(Default)]
struct CountingHasher {
    verifications: AtomicUsize,
}

impl PasswordHasher for CountingHasher {
    fn hash(&self, password: &str) -> Result<PasswordHash, PasswordHashError> {
        PlainTextHasher.hash(password)
    }

    fn verify(&self, password: &str, hash: &PasswordHash) -> Result<bool, PasswordHashError> {
        self.verifications.fetch_add(1, Ordering::SeqCst);
        PlainTextHasher.verify(password, hash)
    }
}

#[rstest]
#[case::unknown_email(false)]
#[case::wrong_password(true)]
#[tokio::test]
async fn authenticate_failures_cost_one_verification(
    clock: Arc<SteppingClock>,
    #[case] account_exists: bool,
) {
    let existing = account(Role::Viewer, &clock);
    let mut repo = MockAccountRepository::new();
    repo.expect_find_credentials_by_email()
        .times(2)
        .returning(move |_| {
            Ok(account_exists.then(|| StoredCredentials {
                account: existing.clone(),
                password_hash: PlainTextHasher
                    .hash("correct-horse")
                    .expect("plain hash"),
            }))
        });
    let hasher = Arc::new(CountingHasher::default());
    let service = AccountService::new(Arc::new(repo), Arc::clone(&hasher), clock);

    for attempt in 1..=2 {
        let err = service
            .authenticate(&credentials("wrong-password"))
            .await
            .expect_err("login rejected");
        assert_eq!(err.code(), ErrorCode::Unauthorized);
        assert_eq!(hasher.verifications.load(Ordering::SeqCst), attempt);
    }
}

#[rstest]
#[tokio::test]
async fn resolve_reads_the_current_role(clock: Arc<SteppingClock>) {
    let demoted = account(Role::Viewer, &clock);
    let id = demoted.id();
    let mut repo = MockAccountRepository::new();
    repo.expect_find_by_id()
        .withf(move |candidate| *candidate == id)
        .times(1)
        .return_once(move |_| Ok(Some(demoted)));

    let caller = service(repo, MockPasswordHasher::new(), clock)
        .resolve(id)
        .await
        .expect("resolution succeeds");

    assert_eq!(caller, Some(Caller::new(id, Role::Viewer)));
}

#[rstest]
#[tokio::test]
async fn resolve_deleted_account_yields_none(clock: Arc<SteppingClock>) {
    let mut repo = MockAccountRepository::new();
    repo.expect_find_by_id().times(1).return_once(|_| Ok(None));

    let caller = service(repo, MockPasswordHasher::new(), clock)
        .resolve(AccountId::random())
        .await
        .expect("resolution succeeds");

    assert!(caller.is_none());
}

#[rstest]
#[tokio::test]
async fn register_hashes_and_stores_account(clock: Arc<SteppingClock>) {
    let admin = account(Role::Admin, &clock).caller();
    let mut hasher = MockPasswordHasher::new();
    hasher
        .expect_hash()
        .withf(|password| password == "s3cret-pass")
        .times(1)
        .return_once(|_| Ok(stored_hash()));
    let mut repo = MockAccountRepository::new();
    repo.expect_insert()
        .withf(|account, hash| {
            account.email().as_ref() == "jo@example.com"
                && account.role() == Role::Editor
                && hash.as_str() == "$argon2id$stub"
        })
        .times(1)
        .return_once(|_, _| Ok(()));

    let created = service(repo, hasher, clock.clone())
        .register(&admin, registration(Some(Role::Editor)))
        .await
        .expect("registration succeeds");

    assert_eq!(created.name().as_ref(), "Jo Prep");
    assert_eq!(created.created_at(), clock.utc());
}

#[rstest]
#[case(Role::Editor)]
#[case(Role::Viewer)]
#[tokio::test]
async fn register_requires_admin(clock: Arc<SteppingClock>, #[case] role: Role) {
    let caller = account(role, &clock).caller();

    let err = service(MockAccountRepository::new(), MockPasswordHasher::new(), clock)
        .register(&caller, registration(None))
        .await
        .expect_err("non-admin rejected");

    assert_eq!(err.code(), ErrorCode::Forbidden);
}

#[rstest]
#[tokio::test]
async fn register_duplicate_email_conflicts(clock: Arc<SteppingClock>) {
    let admin = account(Role::Admin, &clock).caller();
    let mut hasher = MockPasswordHasher::new();
    hasher.expect_hash().return_once(|_| Ok(stored_hash()));
    let mut repo = MockAccountRepository::new();
    repo.expect_insert().return_once(|_, _| {
        Err(AccountRepositoryError::duplicate_email("jo@example.com"))
    });

    let err = service(repo, hasher, clock)
        .register(&admin, registration(None))
        .await
        .expect_err("duplicate rejected");

    assert_eq!(err.code(), ErrorCode::Conflict);
    assert_eq!(err.message(), "User already exists");
}

#[rstest]
#[tokio::test]
async fn update_role_missing_account_is_not_found(clock: Arc<SteppingClock>) {
    let admin = account(Role::Admin, &clock).caller();
    let mut repo = MockAccountRepository::new();
    repo.expect_update_role().return_once(|_, _| Ok(None));

    let err = service(repo, MockPasswordHasher::new(), clock)
        .update_role(&admin, AccountId::random(), Role::Editor)
        .await
        .expect_err("missing account");

    assert_eq!(err.code(), ErrorCode::NotFound);
    assert_eq!(err.message(), "User not found");
}

#[rstest]
#[case::removed(true, None)]
#[case::missing(false, Some(ErrorCode::NotFound))]
#[tokio::test]
async fn delete_reports_missing_accounts(
    clock: Arc<SteppingClock>,
    #[case] removed: bool,
    #[case] expected: Option<ErrorCode>,
) {
    let admin = account(Role::Admin, &clock).caller();
    let mut repo = MockAccountRepository::new();
    repo.expect_delete().return_once(move |_| Ok(removed));

    let result = service(repo, MockPasswordHasher::new(), clock)
        .delete(&admin, AccountId::random())
        .await;

    assert_eq!(result.err().map(|err| err.code()), expected);
}

#[rstest]
#[tokio::test]
async fn bootstrap_admin_skips_when_admin_exists(clock: Arc<SteppingClock>) {
    let mut repo = MockAccountRepository::new();
    repo.expect_any_with_role()
        .withf(|role| *role == Role::Admin)
        .return_once(|_| Ok(true));
    repo.expect_insert().never();

    let created = service(repo, MockPasswordHasher::new(), clock)
        .bootstrap_admin(registration(None))
        .await
        .expect("bootstrap check succeeds");

    assert!(created.is_none());
}

#[rstest]
#[tokio::test]
async fn bootstrap_admin_forces_admin_role(clock: Arc<SteppingClock>) {
    let mut repo = MockAccountRepository::new();
    repo.expect_any_with_role().return_once(|_| Ok(false));
    repo.expect_insert()
        .withf(|account, _| account.role() == Role::Admin)
        .times(1)
        .return_once(|_, _| Ok(()));
    let mut hasher = MockPasswordHasher::new();
    hasher.expect_hash().return_once(|_| Ok(stored_hash()));

    let created = service(repo, hasher, clock)
        .bootstrap_admin(registration(Some(Role::Viewer)))
        .await
        .expect("bootstrap succeeds");

    assert_eq!(created.map(|account| account.role()), Some(Role::Admin));
}

#[rstest]
#[tokio::test]
async fn connection_failures_surface_as_unavailable(clock: Arc<SteppingClock>) {
    let admin = account(Role::Admin, &clock).caller();
    let mut repo = MockAccountRepository::new();
    repo.expect_list()
        .return_once(|| Err(AccountRepositoryError::connection("refused")));

    let err = service(repo, MockPasswordHasher::new(), clock)
        .list(&admin)
        .await
        .expect_err("storage offline");

    assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
}
