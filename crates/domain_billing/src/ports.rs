//! Billing domain ports
//!
//! The billing service depends on two abstract stores:
//!
//! - **`LedgerStore`**: the append/update/delete-capable store of bill
//!   records.
//! - **`BalanceStore`**: read/write access to customer accounts and their
//!   running balances.
//!
//! Adapters implement these against whatever persistence technology is
//! chosen (PostgreSQL in `infra_db`, in-memory mocks for tests). Every
//! operation is scoped by an explicit `BusinessId`; tenant isolation is
//! mandatory at the store boundary.
//!
//! Balance writes are concurrency-safe by contract: `set_balance` is
//! conditional on the account version and fails with `PortError::Conflict`
//! when a concurrent writer got there first, and `adjust_balance` applies a
//! delta atomically server-side in one round trip. An unconditional
//! client-side read-modify-write is not expressible through this
//! interface.

use async_trait::async_trait;
use core_kernel::{BillId, BusinessId, DomainPort, Money, PortError};

use crate::bill::BillRecord;
use crate::customer::{CustomerAccount, CustomerKey};

/// The store of bill records
///
/// `bills_for_customer` returns bills most recent first (by bill date,
/// then creation time); callers rely on this for latest-balance queries.
#[async_trait]
pub trait LedgerStore: DomainPort {
    /// Persists a new bill; the record's id is the caller's
    async fn create_bill(
        &self,
        business: BusinessId,
        bill: BillRecord,
    ) -> Result<BillRecord, PortError>;

    /// Rewrites an existing bill
    async fn update_bill(
        &self,
        business: BusinessId,
        bill: BillRecord,
    ) -> Result<BillRecord, PortError>;

    /// Removes a bill
    async fn delete_bill(&self, business: BusinessId, id: BillId) -> Result<(), PortError>;

    /// Fetches a bill, or `PortError::NotFound`
    async fn get_bill(&self, business: BusinessId, id: BillId) -> Result<BillRecord, PortError>;

    /// All bills for one customer, most recent first
    async fn bills_for_customer(
        &self,
        business: BusinessId,
        phone: &str,
    ) -> Result<Vec<BillRecord>, PortError>;

    /// Removes every bill for one customer; returns how many went
    async fn delete_bills_for_customer(
        &self,
        business: BusinessId,
        phone: &str,
    ) -> Result<u64, PortError>;
}

/// The store of customer accounts and balances
#[async_trait]
pub trait BalanceStore: DomainPort {
    /// Fetches an account by phone, or `PortError::NotFound`
    async fn get_account(
        &self,
        business: BusinessId,
        phone: &str,
    ) -> Result<CustomerAccount, PortError>;

    /// Fetches the account for `key`, creating it with a zero balance if
    /// missing. Idempotent on phone: an existing account is returned
    /// untouched.
    async fn get_or_create_account(
        &self,
        business: BusinessId,
        key: &CustomerKey,
    ) -> Result<CustomerAccount, PortError>;

    /// Conditionally overwrites the balance
    ///
    /// Succeeds only if the stored version still equals
    /// `expected_version`; bumps the version on success. A lost race
    /// surfaces as `PortError::Conflict`.
    async fn set_balance(
        &self,
        business: BusinessId,
        phone: &str,
        balance: Money,
        expected_version: i64,
    ) -> Result<CustomerAccount, PortError>;

    /// Applies a delta to the balance atomically server-side
    ///
    /// One round trip, no version check needed: the store performs the
    /// read-modify-write. Used for reversals where the delta, not the
    /// absolute value, is authoritative.
    async fn adjust_balance(
        &self,
        business: BusinessId,
        phone: &str,
        delta: Money,
    ) -> Result<CustomerAccount, PortError>;

    /// Removes an account
    async fn delete_account(&self, business: BusinessId, phone: &str) -> Result<(), PortError>;

    /// All accounts for a business, ordered by name
    async fn list_accounts(&self, business: BusinessId)
        -> Result<Vec<CustomerAccount>, PortError>;
}

/// In-memory mock stores for testing
///
/// Both mocks support optional fault injection (fail the next matching
/// call with a given error) so protocol tests can exercise the failure
/// windows without a real store.
#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use chrono::Utc;
    use std::collections::HashMap;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::sync::{Mutex, RwLock};

    type Key = (BusinessId, String);

    /// In-memory mock implementation of `LedgerStore`
    #[derive(Debug, Default)]
    pub struct MockLedgerStore {
        bills: Arc<RwLock<HashMap<BillId, BillRecord>>>,
        fail_next_create: Mutex<Option<PortError>>,
    }

    impl MockLedgerStore {
        pub fn new() -> Self {
            Self::default()
        }

        /// Makes the next `create_bill` fail with `error`
        pub async fn fail_next_create(&self, error: PortError) {
            *self.fail_next_create.lock().await = Some(error);
        }

        /// Number of bills currently stored
        pub async fn bill_count(&self) -> usize {
            self.bills.read().await.len()
        }
    }

    impl DomainPort for MockLedgerStore {}

    #[async_trait]
    impl LedgerStore for MockLedgerStore {
        async fn create_bill(
            &self,
            business: BusinessId,
            bill: BillRecord,
        ) -> Result<BillRecord, PortError> {
            if let Some(error) = self.fail_next_create.lock().await.take() {
                return Err(error);
            }
            debug_assert_eq!(bill.business, business);
            self.bills.write().await.insert(bill.id, bill.clone());
            Ok(bill)
        }

        async fn update_bill(
            &self,
            business: BusinessId,
            bill: BillRecord,
        ) -> Result<BillRecord, PortError> {
            let mut bills = self.bills.write().await;
            if !bills
                .get(&bill.id)
                .is_some_and(|existing| existing.business == business)
            {
                return Err(PortError::not_found("Bill", bill.id));
            }
            bills.insert(bill.id, bill.clone());
            Ok(bill)
        }

        async fn delete_bill(&self, business: BusinessId, id: BillId) -> Result<(), PortError> {
            let mut bills = self.bills.write().await;
            match bills.get(&id) {
                Some(existing) if existing.business == business => {
                    bills.remove(&id);
                    Ok(())
                }
                _ => Err(PortError::not_found("Bill", id)),
            }
        }

        async fn get_bill(
            &self,
            business: BusinessId,
            id: BillId,
        ) -> Result<BillRecord, PortError> {
            self.bills
                .read()
                .await
                .get(&id)
                .filter(|bill| bill.business == business)
                .cloned()
                .ok_or_else(|| PortError::not_found("Bill", id))
        }

        async fn bills_for_customer(
            &self,
            business: BusinessId,
            phone: &str,
        ) -> Result<Vec<BillRecord>, PortError> {
            let mut bills: Vec<_> = self
                .bills
                .read()
                .await
                .values()
                .filter(|bill| bill.business == business && bill.customer_phone == phone)
                .cloned()
                .collect();
            bills.sort_by(|a, b| {
                b.bill_date
                    .cmp(&a.bill_date)
                    .then(b.created_at.cmp(&a.created_at))
            });
            Ok(bills)
        }

        async fn delete_bills_for_customer(
            &self,
            business: BusinessId,
            phone: &str,
        ) -> Result<u64, PortError> {
            let mut bills = self.bills.write().await;
            let before = bills.len();
            bills.retain(|_, bill| !(bill.business == business && bill.customer_phone == phone));
            Ok((before - bills.len()) as u64)
        }
    }

    /// In-memory mock implementation of `BalanceStore`
    #[derive(Debug, Default)]
    pub struct MockBalanceStore {
        accounts: Arc<RwLock<HashMap<Key, CustomerAccount>>>,
        fail_next_set: Mutex<Option<PortError>>,
        latency: Mutex<Option<Duration>>,
    }

    impl MockBalanceStore {
        pub fn new() -> Self {
            Self::default()
        }

        /// Pre-populates an account, returning its stored state
        pub async fn with_account(&self, account: CustomerAccount) -> CustomerAccount {
            self.accounts
                .write()
                .await
                .insert((account.business, account.phone.clone()), account.clone());
            account
        }

        /// Makes the next `set_balance` fail with `error`
        pub async fn fail_next_set_balance(&self, error: PortError) {
            *self.fail_next_set.lock().await = Some(error);
        }

        /// Adds an artificial delay to every operation
        pub async fn with_latency(&self, latency: Duration) {
            *self.latency.lock().await = Some(latency);
        }

        async fn simulate_latency(&self) {
            let latency = *self.latency.lock().await;
            if let Some(latency) = latency {
                tokio::time::sleep(latency).await;
            }
        }
    }

    impl DomainPort for MockBalanceStore {}

    #[async_trait]
    impl BalanceStore for MockBalanceStore {
        async fn get_account(
            &self,
            business: BusinessId,
            phone: &str,
        ) -> Result<CustomerAccount, PortError> {
            self.simulate_latency().await;
            self.accounts
                .read()
                .await
                .get(&(business, phone.to_string()))
                .cloned()
                .ok_or_else(|| PortError::not_found("Customer", phone))
        }

        async fn get_or_create_account(
            &self,
            business: BusinessId,
            key: &CustomerKey,
        ) -> Result<CustomerAccount, PortError> {
            self.simulate_latency().await;
            let mut accounts = self.accounts.write().await;
            let entry = accounts
                .entry((business, key.phone.clone()))
                .or_insert_with(|| CustomerAccount::new(business, &key.name, &key.phone));
            Ok(entry.clone())
        }

        async fn set_balance(
            &self,
            business: BusinessId,
            phone: &str,
            balance: Money,
            expected_version: i64,
        ) -> Result<CustomerAccount, PortError> {
            self.simulate_latency().await;
            if let Some(error) = self.fail_next_set.lock().await.take() {
                return Err(error);
            }
            let mut accounts = self.accounts.write().await;
            let account = accounts
                .get_mut(&(business, phone.to_string()))
                .ok_or_else(|| PortError::not_found("Customer", phone))?;

            if account.version != expected_version {
                return Err(PortError::conflict(format!(
                    "balance version is {} but caller expected {}",
                    account.version, expected_version
                )));
            }

            account.balance = balance;
            account.version += 1;
            account.updated_at = Utc::now();
            Ok(account.clone())
        }

        async fn adjust_balance(
            &self,
            business: BusinessId,
            phone: &str,
            delta: Money,
        ) -> Result<CustomerAccount, PortError> {
            self.simulate_latency().await;
            let mut accounts = self.accounts.write().await;
            let account = accounts
                .get_mut(&(business, phone.to_string()))
                .ok_or_else(|| PortError::not_found("Customer", phone))?;

            account.balance += delta;
            account.version += 1;
            account.updated_at = Utc::now();
            Ok(account.clone())
        }

        async fn delete_account(
            &self,
            business: BusinessId,
            phone: &str,
        ) -> Result<(), PortError> {
            self.simulate_latency().await;
            self.accounts
                .write()
                .await
                .remove(&(business, phone.to_string()))
                .map(|_| ())
                .ok_or_else(|| PortError::not_found("Customer", phone))
        }

        async fn list_accounts(
            &self,
            business: BusinessId,
        ) -> Result<Vec<CustomerAccount>, PortError> {
            self.simulate_latency().await;
            let mut accounts: Vec<_> = self
                .accounts
                .read()
                .await
                .values()
                .filter(|account| account.business == business)
                .cloned()
                .collect();
            accounts.sort_by(|a, b| a.name.cmp(&b.name));
            Ok(accounts)
        }
    }
}
