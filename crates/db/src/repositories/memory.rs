//! In-process implementation of every repository trait.
//!
//! All tables live behind one [`RwLock`], so a transaction write and the
//! balance adjustments it carries are applied under a single write guard,
//! the same all-or-nothing contract the PostgreSQL repositories get from a
//! database transaction. Used for local runs without `DATABASE_URL` and by
//! the test suites.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use fintrack_core::money::{AccountType, BalanceAdjustment};
use fintrack_core::pagination::{Page, PageRequest, SortDirection};
use fintrack_core::types::{new_id, Timestamp};
use sqlx::types::Json;
use tokio::sync::RwLock;

use super::{
    AccountRepository, GoalRepository, ImageRepository, TransactionRepository, UserRepository,
};
use crate::error::RepoResult;
use crate::models::account::{Account, AccountChanges, AccountFilter, NewAccount};
use crate::models::goal::{Goal, GoalFilter, NewGoal};
use crate::models::image::{Image, ImageFilter, NewImage};
use crate::models::transaction::{NewTransaction, Transaction, TransactionFilter};
use crate::models::user::{NewUser, User};

#[derive(Debug, Default)]
struct Tables {
    accounts: Vec<Account>,
    goals: Vec<Goal>,
    transactions: Vec<Transaction>,
    images: Vec<Image>,
    users: Vec<User>,
}

/// Shared in-memory store. Rows keep insertion order, which breaks ties
/// between equal `created_at` values.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
    reject_writes: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// While set, every write reports that nothing was written, the way a
    /// database that silently affects zero rows would.
    pub fn reject_writes(&self, reject: bool) {
        self.reject_writes.store(reject, Ordering::SeqCst);
    }

    fn writes_rejected(&self) -> bool {
        self.reject_writes.load(Ordering::SeqCst)
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn contains_ci(haystack: &str, needle: &Option<String>) -> bool {
    match needle {
        Some(n) => haystack.to_lowercase().contains(&n.to_lowercase()),
        None => true,
    }
}

fn equals(value: &str, expected: &Option<String>) -> bool {
    expected.as_deref().map_or(true, |e| e == value)
}

fn within(at: Timestamp, from: &Option<Timestamp>, to: &Option<Timestamp>) -> bool {
    from.map_or(true, |f| at >= f) && to.map_or(true, |t| at <= t)
}

/// Order by `created_at` (stable, so insertion order breaks ties) and cut
/// out the requested page.
fn paginate<T>(mut rows: Vec<T>, created_at: impl Fn(&T) -> Timestamp, page: &PageRequest) -> Page<T> {
    rows.sort_by_key(|row| created_at(row));
    if page.sort == SortDirection::Desc {
        rows.reverse();
    }
    let total_count = rows.len() as i64;
    let items = rows
        .into_iter()
        .skip(page.offset() as usize)
        .take(page.limit() as usize)
        .collect();
    Page { items, total_count }
}

fn apply_adjustments(
    accounts: &mut [Account],
    adjustments: &[BalanceAdjustment],
    actor: &str,
    at: Timestamp,
) -> bool {
    let all_present = adjustments
        .iter()
        .all(|adj| accounts.iter().any(|a| a.id == adj.account_id));
    if !all_present {
        return false;
    }
    for adj in adjustments {
        if let Some(account) = accounts.iter_mut().find(|a| a.id == adj.account_id) {
            account.balance += adj.delta;
            account.updated_by = Some(actor.to_string());
            account.updated_at = Some(at);
        }
    }
    true
}

// ---------------------------------------------------------------------------
// Accounts
// ---------------------------------------------------------------------------

#[async_trait]
impl AccountRepository for MemoryStore {
    async fn create(&self, input: &NewAccount) -> RepoResult<Option<Account>> {
        if self.writes_rejected() {
            return Ok(None);
        }
        let mut tables = self.tables.write().await;
        let duplicate = tables.accounts.iter().any(|a| {
            a.user_id == input.user_id && a.name == input.name && a.account_type == input.account_type
        });
        if duplicate {
            return Ok(None);
        }
        let account = Account {
            id: new_id(),
            user_id: input.user_id.clone(),
            name: input.name.clone(),
            balance: input.balance,
            account_type: input.account_type,
            created_by: input.created_by.clone(),
            created_at: Utc::now(),
            updated_by: None,
            updated_at: None,
        };
        tables.accounts.push(account.clone());
        Ok(Some(account))
    }

    async fn find_by_id(&self, id: &str) -> RepoResult<Option<Account>> {
        let tables = self.tables.read().await;
        Ok(tables.accounts.iter().find(|a| a.id == id).cloned())
    }

    async fn exists(&self, user_id: &str, name: &str, kind: AccountType) -> RepoResult<bool> {
        let tables = self.tables.read().await;
        Ok(tables
            .accounts
            .iter()
            .any(|a| a.user_id == user_id && a.name == name && a.account_type == kind))
    }

    async fn update(&self, id: &str, changes: &AccountChanges) -> RepoResult<Option<Account>> {
        if self.writes_rejected() {
            return Ok(None);
        }
        let mut tables = self.tables.write().await;
        let Some(row) = tables.accounts.iter_mut().find(|a| a.id == id) else {
            return Ok(None);
        };
        row.name = changes.name.clone();
        row.account_type = changes.account_type;
        if let Some(balance) = changes.balance {
            row.balance = balance;
        }
        row.updated_by = Some(changes.updated_by.clone());
        row.updated_at = Some(changes.updated_at);
        Ok(Some(row.clone()))
    }

    async fn delete(&self, id: &str) -> RepoResult<bool> {
        if self.writes_rejected() {
            return Ok(false);
        }
        let mut tables = self.tables.write().await;
        let before = tables.accounts.len();
        tables.accounts.retain(|a| a.id != id);
        if tables.accounts.len() == before {
            return Ok(false);
        }
        tables.transactions.retain(|t| t.account_id != id);
        Ok(true)
    }

    async fn list(&self, filter: &AccountFilter, page: &PageRequest) -> RepoResult<Page<Account>> {
        let tables = self.tables.read().await;
        let rows: Vec<Account> = tables
            .accounts
            .iter()
            .filter(|a| {
                contains_ci(&a.name, &filter.name)
                    && filter.account_type.map_or(true, |t| a.account_type == t)
                    && equals(&a.created_by, &filter.created_by)
                    && within(a.created_at, &filter.from_date, &filter.to_date)
            })
            .cloned()
            .collect();
        Ok(paginate(rows, |a| a.created_at, page))
    }
}

// ---------------------------------------------------------------------------
// Goals
// ---------------------------------------------------------------------------

#[async_trait]
impl GoalRepository for MemoryStore {
    async fn create(&self, input: &NewGoal) -> RepoResult<Option<Goal>> {
        if self.writes_rejected() {
            return Ok(None);
        }
        let goal = Goal {
            id: new_id(),
            user_id: input.user_id.clone(),
            name: input.name.clone(),
            target_amount: input.target_amount,
            target_date: input.target_date,
            current_amount: input.current_amount,
            created_by: input.created_by.clone(),
            created_at: Utc::now(),
            updated_by: None,
            updated_at: None,
        };
        self.tables.write().await.goals.push(goal.clone());
        Ok(Some(goal))
    }

    async fn find_by_id(&self, id: &str) -> RepoResult<Option<Goal>> {
        let tables = self.tables.read().await;
        Ok(tables.goals.iter().find(|g| g.id == id).cloned())
    }

    async fn update(&self, goal: &Goal) -> RepoResult<Option<Goal>> {
        if self.writes_rejected() {
            return Ok(None);
        }
        let mut tables = self.tables.write().await;
        let Some(row) = tables.goals.iter_mut().find(|g| g.id == goal.id) else {
            return Ok(None);
        };
        row.name = goal.name.clone();
        row.target_amount = goal.target_amount;
        row.target_date = goal.target_date;
        row.current_amount = goal.current_amount;
        row.updated_by = goal.updated_by.clone();
        row.updated_at = goal.updated_at;
        Ok(Some(row.clone()))
    }

    async fn delete(&self, id: &str) -> RepoResult<bool> {
        if self.writes_rejected() {
            return Ok(false);
        }
        let mut tables = self.tables.write().await;
        let before = tables.goals.len();
        tables.goals.retain(|g| g.id != id);
        Ok(tables.goals.len() < before)
    }

    async fn list(&self, filter: &GoalFilter, page: &PageRequest) -> RepoResult<Page<Goal>> {
        let tables = self.tables.read().await;
        let rows: Vec<Goal> = tables
            .goals
            .iter()
            .filter(|g| {
                let day = g.target_date.date_naive();
                equals(&g.user_id, &filter.user_id)
                    && contains_ci(&g.name, &filter.name)
                    && filter.target_date.map_or(true, |d| day == d)
                    && filter.from_target_date.map_or(true, |d| day >= d)
                    && filter.to_target_date.map_or(true, |d| day <= d)
                    && within(g.created_at, &filter.from_date, &filter.to_date)
            })
            .cloned()
            .collect();
        Ok(paginate(rows, |g| g.created_at, page))
    }
}

// ---------------------------------------------------------------------------
// Transactions
// ---------------------------------------------------------------------------

#[async_trait]
impl TransactionRepository for MemoryStore {
    async fn create(
        &self,
        input: &NewTransaction,
        adjustment: &BalanceAdjustment,
    ) -> RepoResult<Option<Transaction>> {
        if self.writes_rejected() {
            return Ok(None);
        }
        let now = Utc::now();
        let mut tables = self.tables.write().await;
        let adjustments = std::slice::from_ref(adjustment);
        if !apply_adjustments(&mut tables.accounts, adjustments, &input.created_by, now) {
            return Ok(None);
        }
        let transaction = Transaction {
            id: new_id(),
            account_id: input.account_id.clone(),
            description: input.description.clone(),
            amount: input.amount,
            transaction_date: input.transaction_date,
            transaction_type: input.transaction_type,
            created_by: input.created_by.clone(),
            created_at: now,
            updated_by: None,
            updated_at: None,
        };
        tables.transactions.push(transaction.clone());
        Ok(Some(transaction))
    }

    async fn find_by_id(&self, id: &str) -> RepoResult<Option<Transaction>> {
        let tables = self.tables.read().await;
        Ok(tables.transactions.iter().find(|t| t.id == id).cloned())
    }

    async fn update(
        &self,
        transaction: &Transaction,
        adjustments: &[BalanceAdjustment],
    ) -> RepoResult<Option<Transaction>> {
        if self.writes_rejected() {
            return Ok(None);
        }
        let actor = transaction.updated_by.as_deref().unwrap_or(&transaction.created_by);
        let at = transaction.updated_at.unwrap_or_else(Utc::now);
        let mut tables = self.tables.write().await;
        if !tables.transactions.iter().any(|t| t.id == transaction.id) {
            return Ok(None);
        }
        if !apply_adjustments(&mut tables.accounts, adjustments, actor, at) {
            return Ok(None);
        }
        let Some(row) = tables.transactions.iter_mut().find(|t| t.id == transaction.id) else {
            return Ok(None);
        };
        row.account_id = transaction.account_id.clone();
        row.description = transaction.description.clone();
        row.amount = transaction.amount;
        row.transaction_date = transaction.transaction_date;
        row.transaction_type = transaction.transaction_type;
        row.updated_by = transaction.updated_by.clone();
        row.updated_at = transaction.updated_at;
        Ok(Some(row.clone()))
    }

    async fn delete(
        &self,
        id: &str,
        adjustment: &BalanceAdjustment,
        deleted_by: &str,
    ) -> RepoResult<bool> {
        if self.writes_rejected() {
            return Ok(false);
        }
        let mut tables = self.tables.write().await;
        if !tables.transactions.iter().any(|t| t.id == id) {
            return Ok(false);
        }
        let adjustments = std::slice::from_ref(adjustment);
        if !apply_adjustments(&mut tables.accounts, adjustments, deleted_by, Utc::now()) {
            return Ok(false);
        }
        tables.transactions.retain(|t| t.id != id);
        Ok(true)
    }

    async fn list(
        &self,
        filter: &TransactionFilter,
        page: &PageRequest,
    ) -> RepoResult<Page<Transaction>> {
        let tables = self.tables.read().await;
        let rows: Vec<Transaction> = tables
            .transactions
            .iter()
            .filter(|t| {
                equals(&t.account_id, &filter.account_id)
                    && equals(&t.description, &filter.description)
                    && filter.transaction_type.map_or(true, |k| t.transaction_type == k)
                    && filter.amount.map_or(true, |a| t.amount == a)
                    && within(
                        t.transaction_date,
                        &filter.from_transaction_date,
                        &filter.to_transaction_date,
                    )
                    && within(t.created_at, &filter.from_date, &filter.to_date)
            })
            .cloned()
            .collect();
        Ok(paginate(rows, |t| t.created_at, page))
    }
}

// ---------------------------------------------------------------------------
// Images
// ---------------------------------------------------------------------------

#[async_trait]
impl ImageRepository for MemoryStore {
    async fn create(&self, input: &NewImage) -> RepoResult<Option<Image>> {
        if self.writes_rejected() {
            return Ok(None);
        }
        let mut tables = self.tables.write().await;
        if tables.images.iter().any(|i| i.file_name == input.file_name) {
            return Ok(None);
        }
        let image = Image {
            id: new_id(),
            user_id: input.user_id.clone(),
            image_url: input.image_url.clone(),
            file_path: input.file_path.clone(),
            file_name: input.file_name.clone(),
            original_file_name: input.original_file_name.clone(),
            file_extension: input.file_extension.clone(),
            size: input.size,
            readable_size: input.readable_size.clone(),
            created_by: input.created_by.clone(),
            created_at: Utc::now(),
            updated_by: None,
            updated_at: None,
        };
        tables.images.push(image.clone());
        Ok(Some(image))
    }

    async fn find_by_id(&self, id: &str) -> RepoResult<Option<Image>> {
        let tables = self.tables.read().await;
        Ok(tables.images.iter().find(|i| i.id == id).cloned())
    }

    async fn find_by_file_name(&self, file_name: &str) -> RepoResult<Option<Image>> {
        let tables = self.tables.read().await;
        Ok(tables.images.iter().find(|i| i.file_name == file_name).cloned())
    }

    async fn delete(&self, id: &str) -> RepoResult<bool> {
        if self.writes_rejected() {
            return Ok(false);
        }
        let mut tables = self.tables.write().await;
        let before = tables.images.len();
        tables.images.retain(|i| i.id != id);
        Ok(tables.images.len() < before)
    }

    async fn list(&self, filter: &ImageFilter, page: &PageRequest) -> RepoResult<Page<Image>> {
        let tables = self.tables.read().await;
        let rows: Vec<Image> = tables
            .images
            .iter()
            .filter(|i| {
                contains_ci(&i.original_file_name, &filter.original_file_name)
                    && equals(&i.file_extension, &filter.file_extension)
                    && contains_ci(&i.readable_size, &filter.readable_size)
                    && equals(&i.created_by, &filter.created_by)
                    && within(i.created_at, &filter.from_date, &filter.to_date)
            })
            .cloned()
            .collect();
        Ok(paginate(rows, |i| i.created_at, page))
    }
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[async_trait]
impl UserRepository for MemoryStore {
    async fn create(&self, input: &NewUser) -> RepoResult<Option<User>> {
        if self.writes_rejected() {
            return Ok(None);
        }
        let mut tables = self.tables.write().await;
        let taken = tables.users.iter().any(|u| {
            u.email.eq_ignore_ascii_case(&input.email)
                || u.user_name.eq_ignore_ascii_case(&input.user_name)
        });
        if taken {
            return Ok(None);
        }
        let user = User {
            id: new_id(),
            user_name: input.user_name.clone(),
            email: input.email.clone(),
            password_hash: input.password_hash.clone(),
            first_name: input.first_name.clone(),
            last_name: input.last_name.clone(),
            roles: input.roles.clone(),
            claims: Json(Default::default()),
            security_stamp: input.security_stamp.clone(),
            refresh_token_hash: None,
            refresh_token_expires_at: None,
            created_at: Utc::now(),
            updated_at: None,
        };
        tables.users.push(user.clone());
        Ok(Some(user))
    }

    async fn find_by_id(&self, id: &str) -> RepoResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .iter()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn find_by_user_name(&self, user_name: &str) -> RepoResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .iter()
            .find(|u| u.user_name.eq_ignore_ascii_case(user_name))
            .cloned())
    }

    async fn set_refresh_token(
        &self,
        id: &str,
        token_hash: &str,
        expires_at: Timestamp,
    ) -> RepoResult<bool> {
        if self.writes_rejected() {
            return Ok(false);
        }
        let mut tables = self.tables.write().await;
        let Some(user) = tables.users.iter_mut().find(|u| u.id == id) else {
            return Ok(false);
        };
        user.refresh_token_hash = Some(token_hash.to_string());
        user.refresh_token_expires_at = Some(expires_at);
        user.updated_at = Some(Utc::now());
        Ok(true)
    }

    async fn revoke_tokens(&self, id: &str, new_stamp: &str) -> RepoResult<bool> {
        if self.writes_rejected() {
            return Ok(false);
        }
        let mut tables = self.tables.write().await;
        let Some(user) = tables.users.iter_mut().find(|u| u.id == id) else {
            return Ok(false);
        };
        user.security_stamp = new_stamp.to_string();
        user.refresh_token_hash = None;
        user.refresh_token_expires_at = None;
        user.updated_at = Some(Utc::now());
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use fintrack_core::money::TransactionType;
    use rust_decimal_macros::dec;

    use super::*;

    fn new_account(name: &str) -> NewAccount {
        NewAccount {
            user_id: "user-1".into(),
            name: name.into(),
            balance: dec!(100.00),
            account_type: AccountType::Savings,
            created_by: "owner@example.com".into(),
        }
    }

    fn new_transaction(account_id: &str, kind: TransactionType, amount: rust_decimal::Decimal) -> NewTransaction {
        NewTransaction {
            account_id: account_id.into(),
            description: "Groceries".into(),
            amount,
            transaction_date: Utc::now(),
            transaction_type: kind,
            created_by: "owner@example.com".into(),
        }
    }

    #[tokio::test]
    async fn duplicate_account_triple_is_not_written() {
        let store = MemoryStore::new();
        assert!(AccountRepository::create(&store, &new_account("Main")).await.unwrap().is_some());
        assert!(AccountRepository::create(&store, &new_account("Main")).await.unwrap().is_none());

        let page = AccountRepository::list(&store, &AccountFilter::default(), &PageRequest::default())
            .await
            .unwrap();
        assert_eq!(page.total_count, 1);
    }

    #[tokio::test]
    async fn posting_moves_balance_with_transaction() {
        let store = MemoryStore::new();
        let account = AccountRepository::create(&store, &new_account("Main"))
            .await
            .unwrap()
            .unwrap();

        let input = new_transaction(&account.id, TransactionType::Expense, dec!(30.25));
        let adjustment = BalanceAdjustment::posting(&account.id, TransactionType::Expense, dec!(30.25));
        TransactionRepository::create(&store, &input, &adjustment)
            .await
            .unwrap()
            .expect("posting should be written");

        let reloaded = AccountRepository::find_by_id(&store, &account.id).await.unwrap().unwrap();
        assert_eq!(reloaded.balance, dec!(69.75));
        assert_eq!(reloaded.updated_by.as_deref(), Some("owner@example.com"));
    }

    /// An account edit read before a posting must not undo that posting.
    #[tokio::test]
    async fn rename_keeps_balance_posted_since_read() {
        let store = MemoryStore::new();
        let account = AccountRepository::create(&store, &new_account("Main"))
            .await
            .unwrap()
            .unwrap();

        let input = new_transaction(&account.id, TransactionType::Income, dec!(50));
        let adjustment = BalanceAdjustment::posting(&account.id, TransactionType::Income, dec!(50));
        TransactionRepository::create(&store, &input, &adjustment).await.unwrap().unwrap();

        let changes = AccountChanges {
            name: "Everyday".into(),
            account_type: account.account_type,
            balance: None,
            updated_by: "owner@example.com".into(),
            updated_at: Utc::now(),
        };
        let updated = AccountRepository::update(&store, &account.id, &changes)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.name, "Everyday");
        assert_eq!(updated.balance, dec!(150.00));

        let changes = AccountChanges { balance: Some(dec!(7)), ..changes };
        let updated = AccountRepository::update(&store, &account.id, &changes)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.balance, dec!(7));
    }

    #[tokio::test]
    async fn posting_to_missing_account_writes_nothing() {
        let store = MemoryStore::new();
        let input = new_transaction("missing", TransactionType::Income, dec!(5));
        let adjustment = BalanceAdjustment::posting("missing", TransactionType::Income, dec!(5));

        let result = TransactionRepository::create(&store, &input, &adjustment).await;
        assert_matches!(result, Ok(None));

        let page = TransactionRepository::list(&store, &TransactionFilter::default(), &PageRequest::default())
            .await
            .unwrap();
        assert_eq!(page.total_count, 0);
    }

    #[tokio::test]
    async fn list_pages_in_insertion_order() {
        let store = MemoryStore::new();
        for i in 1..=25 {
            AccountRepository::create(&store, &new_account(&format!("Account {i:02}")))
                .await
                .unwrap();
        }

        let page = AccountRepository::list(
            &store,
            &AccountFilter::default(),
            &PageRequest::new(Some(2), Some(10), None),
        )
        .await
        .unwrap();

        assert_eq!(page.total_count, 25);
        let names: Vec<_> = page.items.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names.first(), Some(&"Account 11"));
        assert_eq!(names.last(), Some(&"Account 20"));
    }

    #[tokio::test]
    async fn rejected_writes_report_nothing_written() {
        let store = MemoryStore::new();
        store.reject_writes(true);
        assert!(AccountRepository::create(&store, &new_account("Main")).await.unwrap().is_none());
        store.reject_writes(false);
        assert!(AccountRepository::create(&store, &new_account("Main")).await.unwrap().is_some());
    }
}
