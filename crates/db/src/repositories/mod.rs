//! Repository traits and their implementations.
//!
//! Services talk to storage only through the traits declared here, so the
//! same service code runs against PostgreSQL ([`PgAccountRepo`] and friends)
//! or the in-process [`MemoryStore`].
//!
//! Write methods return `Option`/`bool` for "nothing was written" and reserve
//! `Err` for genuine faults.

use std::sync::Arc;

use async_trait::async_trait;
use fintrack_core::money::{AccountType, BalanceAdjustment};
use fintrack_core::pagination::{Page, PageRequest};
use fintrack_core::types::Timestamp;

use crate::error::RepoResult;
use crate::models::account::{Account, AccountChanges, AccountFilter, NewAccount};
use crate::models::goal::{Goal, GoalFilter, NewGoal};
use crate::models::image::{Image, ImageFilter, NewImage};
use crate::models::transaction::{NewTransaction, Transaction, TransactionFilter};
use crate::models::user::{NewUser, User};
use crate::DbPool;

mod filter;

pub mod account_repo;
pub mod goal_repo;
pub mod image_repo;
pub mod memory;
pub mod transaction_repo;
pub mod user_repo;

pub use account_repo::PgAccountRepo;
pub use goal_repo::PgGoalRepo;
pub use image_repo::PgImageRepo;
pub use memory::MemoryStore;
pub use transaction_repo::PgTransactionRepo;
pub use user_repo::PgUserRepo;

// ---------------------------------------------------------------------------
// Traits
// ---------------------------------------------------------------------------

#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Insert an account. `None` when the row was not written.
    async fn create(&self, input: &NewAccount) -> RepoResult<Option<Account>>;

    async fn find_by_id(&self, id: &str) -> RepoResult<Option<Account>>;

    /// Whether `user_id` already owns an account with this name and type.
    async fn exists(&self, user_id: &str, name: &str, kind: AccountType) -> RepoResult<bool>;

    /// Persist the mutable fields of an already-merged account.
    async fn update(&self, id: &str, changes: &AccountChanges) -> RepoResult<Option<Account>>;

    async fn delete(&self, id: &str) -> RepoResult<bool>;

    async fn list(&self, filter: &AccountFilter, page: &PageRequest) -> RepoResult<Page<Account>>;
}

#[async_trait]
pub trait GoalRepository: Send + Sync {
    async fn create(&self, input: &NewGoal) -> RepoResult<Option<Goal>>;

    async fn find_by_id(&self, id: &str) -> RepoResult<Option<Goal>>;

    async fn update(&self, goal: &Goal) -> RepoResult<Option<Goal>>;

    async fn delete(&self, id: &str) -> RepoResult<bool>;

    async fn list(&self, filter: &GoalFilter, page: &PageRequest) -> RepoResult<Page<Goal>>;
}

/// Transactions are never written on their own: every write carries the
/// balance adjustments it implies and both land in one unit of work. If any
/// adjusted account is missing, nothing is written.
#[async_trait]
pub trait TransactionRepository: Send + Sync {
    async fn create(
        &self,
        input: &NewTransaction,
        adjustment: &BalanceAdjustment,
    ) -> RepoResult<Option<Transaction>>;

    async fn find_by_id(&self, id: &str) -> RepoResult<Option<Transaction>>;

    /// Persist the mutable fields of an already-merged transaction.
    /// `transaction.updated_by` is stamped on every adjusted account too.
    async fn update(
        &self,
        transaction: &Transaction,
        adjustments: &[BalanceAdjustment],
    ) -> RepoResult<Option<Transaction>>;

    async fn delete(
        &self,
        id: &str,
        adjustment: &BalanceAdjustment,
        deleted_by: &str,
    ) -> RepoResult<bool>;

    async fn list(
        &self,
        filter: &TransactionFilter,
        page: &PageRequest,
    ) -> RepoResult<Page<Transaction>>;
}

#[async_trait]
pub trait ImageRepository: Send + Sync {
    async fn create(&self, input: &NewImage) -> RepoResult<Option<Image>>;

    async fn find_by_id(&self, id: &str) -> RepoResult<Option<Image>>;

    async fn find_by_file_name(&self, file_name: &str) -> RepoResult<Option<Image>>;

    async fn delete(&self, id: &str) -> RepoResult<bool>;

    async fn list(&self, filter: &ImageFilter, page: &PageRequest) -> RepoResult<Page<Image>>;
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, input: &NewUser) -> RepoResult<Option<User>>;

    async fn find_by_id(&self, id: &str) -> RepoResult<Option<User>>;

    async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>>;

    async fn find_by_user_name(&self, user_name: &str) -> RepoResult<Option<User>>;

    /// Replace the stored refresh token hash and its expiry.
    async fn set_refresh_token(
        &self,
        id: &str,
        token_hash: &str,
        expires_at: Timestamp,
    ) -> RepoResult<bool>;

    /// Rotate the security stamp and drop the stored refresh token, which
    /// invalidates every token issued to the user so far.
    async fn revoke_tokens(&self, id: &str, new_stamp: &str) -> RepoResult<bool>;
}

// ---------------------------------------------------------------------------
// Bundle
// ---------------------------------------------------------------------------

/// Every repository the services need, behind trait objects.
#[derive(Clone)]
pub struct Repositories {
    pub accounts: Arc<dyn AccountRepository>,
    pub goals: Arc<dyn GoalRepository>,
    pub transactions: Arc<dyn TransactionRepository>,
    pub images: Arc<dyn ImageRepository>,
    pub users: Arc<dyn UserRepository>,
}

impl Repositories {
    /// PostgreSQL-backed repositories sharing one pool.
    pub fn postgres(pool: DbPool) -> Self {
        Self {
            accounts: Arc::new(PgAccountRepo::new(pool.clone())),
            goals: Arc::new(PgGoalRepo::new(pool.clone())),
            transactions: Arc::new(PgTransactionRepo::new(pool.clone())),
            images: Arc::new(PgImageRepo::new(pool.clone())),
            users: Arc::new(PgUserRepo::new(pool)),
        }
    }

    /// Repositories backed by a single shared [`MemoryStore`].
    pub fn in_memory(store: Arc<MemoryStore>) -> Self {
        Self {
            accounts: store.clone(),
            goals: store.clone(),
            transactions: store.clone(),
            images: store.clone(),
            users: store,
        }
    }
}
