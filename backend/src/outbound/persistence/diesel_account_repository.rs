//! PostgreSQL-backed `AccountRepository` using Diesel.

use async_trait::async_trait;
use diesel::dsl::exists;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::warn;

use crate::domain::ports::{AccountRepository, AccountRepositoryError, StoredCredentials};
use crate::domain::{Account, AccountId, DisplayName, EmailAddress, PasswordHash, Role};

use super::error_mapping::{DieselFailure, classify_diesel_error};
use super::models::{AccountRow, NewAccountRow};
use super::pool::{DbPool, PoolError};
use super::schema::accounts;

const EMAIL_CONSTRAINT: &str = "accounts_email_key";

/// Diesel-backed account storage.
#[derive(Clone)]
pub struct DieselAccountRepository {
    pool: DbPool,
}

impl DieselAccountRepository {
    /// Create a repository over `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> AccountRepositoryError {
    AccountRepositoryError::connection(error.into_message())
}

fn map_diesel_error(error: diesel::result::Error, email: Option<&EmailAddress>) -> AccountRepositoryError {
    match classify_diesel_error(error) {
        DieselFailure::Connection(message) => AccountRepositoryError::connection(message),
        DieselFailure::UniqueViolation { constraint }
            if constraint.as_deref().is_none_or(|name| name == EMAIL_CONSTRAINT) =>
        {
            let email = email.map(ToString::to_string).unwrap_or_default();
            AccountRepositoryError::duplicate_email(email)
        }
        DieselFailure::UniqueViolation { .. } => {
            AccountRepositoryError::query("unique constraint violated")
        }
        DieselFailure::Query(message) => AccountRepositoryError::query(message),
    }
}

fn map_read_error(error: diesel::result::Error) -> AccountRepositoryError {
    map_diesel_error(error, None)
}

fn row_to_credentials(row: AccountRow) -> Result<StoredCredentials, AccountRepositoryError> {
    let corrupt = |field: &str, err: &dyn std::fmt::Display| {
        warn!(account_id = %row.id, field, error = %err, "stored account row unreadable");
        AccountRepositoryError::query(format!("invalid stored {field}: {err}"))
    };
    let name = DisplayName::new(&row.name).map_err(|err| corrupt("name", &err))?;
    let email = EmailAddress::new(&row.email).map_err(|err| corrupt("email", &err))?;
    let role: Role = row.role.parse().map_err(|err| corrupt("role", &err))?;
    let account = Account::new(
        AccountId::from_uuid(row.id),
        name,
        email,
        role,
        row.created_at,
    );
    Ok(StoredCredentials {
        account,
        password_hash: PasswordHash::new(row.password_hash),
    })
}

fn row_to_account(row: AccountRow) -> Result<Account, AccountRepositoryError> {
    row_to_credentials(row).map(|stored| stored.account)
}

#[async_trait]
impl AccountRepository for DieselAccountRepository {
    async fn insert(
        &self,
        account: &Account,
        password_hash: &PasswordHash,
    ) -> Result<(), AccountRepositoryError> {
        let row = NewAccountRow {
            id: *account.id().as_uuid(),
            name: account.name().as_ref(),
            email: account.email().as_ref(),
            password_hash: password_hash.as_str(),
            role: account.role().as_str(),
            created_at: account.created_at(),
        };
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(accounts::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| map_diesel_error(err, Some(account.email())))
    }

    async fn find_by_id(&self, id: AccountId) -> Result<Option<Account>, AccountRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<AccountRow> = accounts::table
            .filter(accounts::id.eq(id.as_uuid()))
            .select(AccountRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_read_error)?;
        row.map(row_to_account).transpose()
    }

    async fn find_credentials_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<StoredCredentials>, AccountRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<AccountRow> = accounts::table
            .filter(accounts::email.eq(email.as_ref()))
            .select(AccountRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_read_error)?;
        row.map(row_to_credentials).transpose()
    }

    async fn list(&self) -> Result<Vec<Account>, AccountRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<AccountRow> = accounts::table
            .order((accounts::created_at.asc(), accounts::id.asc()))
            .select(AccountRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_read_error)?;
        rows.into_iter().map(row_to_account).collect()
    }

    async fn any_with_role(&self, role: Role) -> Result<bool, AccountRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::select(exists(
            accounts::table.filter(accounts::role.eq(role.as_str())),
        ))
        .get_result::<bool>(&mut conn)
        .await
        .map_err(map_read_error)
    }

    async fn update_role(
        &self,
        id: AccountId,
        role: Role,
    ) -> Result<Option<Account>, AccountRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<AccountRow> =
            diesel::update(accounts::table.filter(accounts::id.eq(id.as_uuid())))
                .set(accounts::role.eq(role.as_str()))
                .returning(AccountRow::as_returning())
                .get_result(&mut conn)
                .await
                .optional()
                .map_err(map_read_error)?;
        row.map(row_to_account).transpose()
    }

    async fn delete(&self, id: AccountId) -> Result<bool, AccountRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let affected = diesel::delete(accounts::table.filter(accounts::id.eq(id.as_uuid())))
            .execute(&mut conn)
            .await
            .map_err(map_read_error)?;
        Ok(affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use rstest::rstest;
    use uuid::Uuid;

    use super::*;

    fn row(role: &str, email: &str) -> AccountRow {
        AccountRow {
            id: Uuid::new_v4(),
            name: "Sam Cook".to_owned(),
            email: email.to_owned(),
            password_hash: "$argon2id$stub".to_owned(),
            role: role.to_owned(),
            created_at: Utc::now(),
        }
    }

    #[rstest]
    fn row_converts_to_credentials() {
        let stored = row_to_credentials(row("editor", "sam@example.com")).expect("valid row");

        assert_eq!(stored.account.role(), Role::Editor);
        assert_eq!(stored.account.email().as_ref(), "sam@example.com");
        assert_eq!(stored.password_hash.as_str(), "$argon2id$stub");
    }

    #[rstest]
    #[case("owner", "sam@example.com", "role")]
    #[case("viewer", "not-an-email", "email")]
    fn corrupt_rows_are_query_errors(
        #[case] role: &str,
        #[case] email: &str,
        #[case] field: &str,
    ) {
        let err = row_to_account(row(role, email)).expect_err("corrupt row");

        match err {
            AccountRepositoryError::Query { message } => assert!(message.contains(field)),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
