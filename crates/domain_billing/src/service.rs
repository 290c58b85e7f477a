//! Balance synchronization protocol
//!
//! `BillingService` keeps `CustomerAccount.balance` consistent with the
//! bill ledger across create, update and delete, given a remote store with
//! no client-side transactions. The sequencing rule for every mutation:
//!
//! 1. re-read authoritative customer state and recompute monetary fields
//!    from it (never from a value cached earlier in the session),
//! 2. write the ledger entry,
//! 3. propagate the resulting balance to the customer account with a
//!    version-checked conditional write, retrying lost races against fresh
//!    state,
//! 4. re-read the customer account to resynchronize any cached view.
//!
//! A failure between steps 2 and 3 leaves the ledger and the account in
//! disagreement; it surfaces as [`BillingError::Consistency`] with enough
//! identity to reconcile, and the bill stays persisted.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use core_kernel::{BillId, BusinessId, Money, PortError};
use tracing::{debug, error, info, instrument, warn};

use crate::bill::{BillLineItem, BillRecord, PaymentDetails};
use crate::customer::{CustomerAccount, CustomerKey};
use crate::error::BillingError;
use crate::ports::{BalanceStore, LedgerStore};
use crate::totals::{compute_totals, TotalsInput};

/// Tuning knobs for the protocol
#[derive(Debug, Clone)]
pub struct BillingConfig {
    /// Deadline applied to every individual store operation; timeout is a
    /// retryable failure, never an implicit success
    pub op_timeout: Duration,
    /// How many lost balance races to absorb before giving up
    pub max_balance_retries: u32,
}

impl Default for BillingConfig {
    fn default() -> Self {
        Self {
            op_timeout: Duration::from_secs(30),
            max_balance_retries: 3,
        }
    }
}

/// Request to create a bill
#[derive(Debug, Clone)]
pub struct CreateBillRequest {
    pub customer: CustomerKey,
    pub bill_date: NaiveDate,
    pub items: Vec<BillLineItem>,
    pub delivery_charge: Money,
    pub cleaning_charge: Money,
    pub paid_amount: Money,
    pub payment: PaymentDetails,
}

impl CreateBillRequest {
    /// Minimal request: items and charges default to zero, paid in cash
    pub fn new(customer: CustomerKey, bill_date: NaiveDate) -> Self {
        Self {
            customer,
            bill_date,
            items: Vec::new(),
            delivery_charge: Money::zero(),
            cleaning_charge: Money::zero(),
            paid_amount: Money::zero(),
            payment: PaymentDetails::cash(),
        }
    }

    fn validate(&self) -> Result<(), BillingError> {
        self.customer.validate()?;
        self.payment.validate()
    }

    fn items_total(&self) -> Money {
        self.items.iter().map(|item| item.amount).sum()
    }
}

/// Request to edit an existing bill
///
/// The owning customer cannot change through an edit; the bill keeps its
/// customer reference.
#[derive(Debug, Clone)]
pub struct UpdateBillRequest {
    pub bill_date: NaiveDate,
    pub items: Vec<BillLineItem>,
    pub delivery_charge: Money,
    pub cleaning_charge: Money,
    pub paid_amount: Money,
    pub payment: PaymentDetails,
}

impl UpdateBillRequest {
    fn validate(&self) -> Result<(), BillingError> {
        self.payment.validate()
    }

    fn items_total(&self) -> Money {
        self.items.iter().map(|item| item.amount).sum()
    }
}

/// The billing application service
///
/// Owns the synchronization protocol over two injected store ports. All
/// state lives in the stores; the service itself is cheap to clone and
/// share.
#[derive(Clone)]
pub struct BillingService {
    ledger: Arc<dyn LedgerStore>,
    balances: Arc<dyn BalanceStore>,
    config: BillingConfig,
}

impl BillingService {
    /// Creates a service over the given stores with default tuning
    pub fn new(ledger: Arc<dyn LedgerStore>, balances: Arc<dyn BalanceStore>) -> Self {
        Self {
            ledger,
            balances,
            config: BillingConfig::default(),
        }
    }

    /// Overrides the protocol tuning
    pub fn with_config(mut self, config: BillingConfig) -> Self {
        self.config = config;
        self
    }

    /// Creates a bill and folds its balance into the customer account
    ///
    /// The previous balance is read from the authoritative store
    /// immediately before computing, never reused from an earlier fetch.
    /// A missing customer account is created with a zero balance.
    ///
    /// # Errors
    ///
    /// - [`BillingError::Validation`] before any store call
    /// - [`BillingError::Store`] if the bill write fails (no customer
    ///   update is attempted)
    /// - [`BillingError::Consistency`] if the bill persisted but the
    ///   balance could not be propagated
    #[instrument(skip(self, request), fields(business = %business, customer = %request.customer))]
    pub async fn create_bill(
        &self,
        business: BusinessId,
        request: CreateBillRequest,
    ) -> Result<BillRecord, BillingError> {
        request.validate()?;
        if request.items.is_empty() {
            debug!("creating bill with no items; balance-only transaction");
        }

        let account = self
            .with_deadline(
                "get_or_create_account",
                self.balances.get_or_create_account(business, &request.customer),
            )
            .await?;

        let totals = compute_totals(TotalsInput {
            previous_balance: account.balance,
            items_total: request.items_total(),
            delivery_charge: request.delivery_charge,
            cleaning_charge: request.cleaning_charge,
            paid_amount: request.paid_amount,
        });

        let mut bill = BillRecord::draft(
            business,
            &account.name,
            &account.phone,
            request.bill_date,
        );
        bill.items = request.items;
        bill.delivery_charge = request.delivery_charge;
        bill.cleaning_charge = request.cleaning_charge;
        bill.paid_amount = request.paid_amount;
        bill.payment = request.payment;
        bill.apply_totals(&totals);
        bill.mark_persisted()?;

        // Step 2: the ledger write. Failure here aborts the whole
        // operation with no partial state.
        let mut persisted = self
            .with_deadline("create_bill", self.ledger.create_bill(business, bill))
            .await?;

        info!(
            bill_id = %persisted.id,
            total = %persisted.total_amount,
            balance = %persisted.balance_amount,
            "bill persisted"
        );

        // Step 3: balance propagation. A create has no prior contribution
        // folded into the stored balance.
        self.propagate_balance(
            business,
            &mut persisted,
            account.version,
            totals.new_balance,
            Money::zero(),
        )
        .await?;

        // Step 4: resynchronize.
        self.refresh_customer(business, &persisted.customer_phone)
            .await?;

        Ok(persisted)
    }

    /// Edits a bill, recomputing totals against authoritative state
    ///
    /// The previous balance is re-derived from the current account balance
    /// minus the old bill's own contribution, then the customer balance is
    /// overwritten with the freshly computed result. (The stored balance
    /// already folds in the old version of this bill, so the old
    /// contribution has to come out before recomputing; overwriting avoids
    /// compounding error if the stored balance was already wrong.)
    #[instrument(skip(self, request), fields(business = %business, bill_id = %bill_id))]
    pub async fn update_bill(
        &self,
        business: BusinessId,
        bill_id: BillId,
        request: UpdateBillRequest,
    ) -> Result<BillRecord, BillingError> {
        request.validate()?;

        let mut existing = self.load_bill(business, bill_id).await?;
        let account = self
            .with_deadline(
                "get_account",
                self.balances.get_account(business, &existing.customer_phone),
            )
            .await
            .map_err(|e| {
                if e.is_not_found() {
                    BillingError::CustomerNotFound(existing.customer_phone.clone())
                } else {
                    BillingError::Store(e)
                }
            })?;

        let old_contribution = existing.own_contribution();
        let previous_balance = (account.balance - old_contribution).clamp_non_negative();
        debug!(
            old_balance_amount = %existing.balance_amount,
            previous_balance = %previous_balance,
            "re-derived previous balance for edit"
        );

        existing.bill_date = request.bill_date;
        existing.items = request.items;
        existing.delivery_charge = request.delivery_charge;
        existing.cleaning_charge = request.cleaning_charge;
        existing.paid_amount = request.paid_amount;
        existing.payment = request.payment;

        let totals = compute_totals(TotalsInput {
            previous_balance,
            items_total: existing.items_total(),
            delivery_charge: existing.delivery_charge,
            cleaning_charge: existing.cleaning_charge,
            paid_amount: existing.paid_amount,
        });
        existing.apply_totals(&totals);
        existing.mark_updated()?;

        let mut updated = self
            .with_deadline("update_bill", self.ledger.update_bill(business, existing))
            .await?;

        self.propagate_balance(
            business,
            &mut updated,
            account.version,
            totals.new_balance,
            old_contribution,
        )
        .await?;

        self.refresh_customer(business, &updated.customer_phone)
            .await?;

        Ok(updated)
    }

    /// Deletes a bill and reverses its balance contribution
    ///
    /// The reversal is a single atomic server-side adjustment. A missing
    /// customer account is not fatal: the bill still goes, the adjustment
    /// is skipped and logged.
    #[instrument(skip(self), fields(business = %business, bill_id = %bill_id))]
    pub async fn delete_bill(
        &self,
        business: BusinessId,
        bill_id: BillId,
    ) -> Result<BillRecord, BillingError> {
        let mut existing = self.load_bill(business, bill_id).await?;

        self.with_deadline("delete_bill", self.ledger.delete_bill(business, bill_id))
            .await?;
        existing.mark_deleted()?;

        let reversal = -existing.balance_amount;
        match self
            .with_deadline(
                "adjust_balance",
                self.balances
                    .adjust_balance(business, &existing.customer_phone, reversal),
            )
            .await
        {
            Ok(account) => {
                info!(
                    customer = %account.phone,
                    balance = %account.balance,
                    "reversed deleted bill's balance contribution"
                );
                self.refresh_customer(business, &existing.customer_phone)
                    .await?;
            }
            Err(e) if e.is_not_found() => {
                warn!(
                    customer = %existing.customer_phone,
                    "customer account missing; balance adjustment skipped"
                );
            }
            Err(e) => {
                error!(
                    bill_id = %bill_id,
                    customer = %existing.customer_phone,
                    attempted = %reversal,
                    error = %e,
                    "bill deleted but balance reversal failed; ledger and account diverged"
                );
                return Err(BillingError::Consistency {
                    bill_id,
                    customer: existing.customer_phone.clone(),
                    attempted_balance: reversal,
                    source: e,
                });
            }
        }

        Ok(existing)
    }

    /// Re-reads a customer's account from the authoritative store
    ///
    /// Callers overwrite any cached copy with the result; invoked by the
    /// service itself after every balance-affecting mutation to bound
    /// staleness.
    pub async fn refresh_customer(
        &self,
        business: BusinessId,
        phone: &str,
    ) -> Result<CustomerAccount, BillingError> {
        let account = self
            .with_deadline("get_account", self.balances.get_account(business, phone))
            .await
            .map_err(|e| {
                if e.is_not_found() {
                    BillingError::CustomerNotFound(phone.to_string())
                } else {
                    BillingError::Store(e)
                }
            })?;
        debug!(customer = %account.phone, balance = %account.balance, "refreshed customer");
        Ok(account)
    }

    /// Fetches or creates a customer account, idempotent on phone
    pub async fn get_or_create_customer(
        &self,
        business: BusinessId,
        key: &CustomerKey,
    ) -> Result<CustomerAccount, BillingError> {
        key.validate()?;
        let account = self
            .with_deadline(
                "get_or_create_account",
                self.balances.get_or_create_account(business, key),
            )
            .await?;
        Ok(account)
    }

    /// Removes a customer and every bill they own
    pub async fn delete_customer(
        &self,
        business: BusinessId,
        phone: &str,
    ) -> Result<(), BillingError> {
        let removed = self
            .with_deadline(
                "delete_bills_for_customer",
                self.ledger.delete_bills_for_customer(business, phone),
            )
            .await?;
        self.with_deadline(
            "delete_account",
            self.balances.delete_account(business, phone),
        )
        .await
        .map_err(|e| {
            if e.is_not_found() {
                BillingError::CustomerNotFound(phone.to_string())
            } else {
                BillingError::Store(e)
            }
        })?;
        info!(customer = %phone, bills_removed = removed, "customer deleted");
        Ok(())
    }

    /// The `balance_amount` of the customer's most recent bill, zero if
    /// they have none
    pub async fn latest_balance_by_phone(
        &self,
        business: BusinessId,
        phone: &str,
    ) -> Result<Money, BillingError> {
        let bills = self
            .with_deadline(
                "bills_for_customer",
                self.ledger.bills_for_customer(business, phone),
            )
            .await?;
        Ok(bills
            .first()
            .map(|bill| bill.balance_amount)
            .unwrap_or_default())
    }

    /// All customer accounts for a business, ordered by name
    pub async fn list_customers(
        &self,
        business: BusinessId,
    ) -> Result<Vec<CustomerAccount>, BillingError> {
        let accounts = self
            .with_deadline("list_accounts", self.balances.list_accounts(business))
            .await?;
        Ok(accounts)
    }

    /// Loads a bill, mapping a missing record to `BillNotFound`
    async fn load_bill(
        &self,
        business: BusinessId,
        bill_id: BillId,
    ) -> Result<BillRecord, BillingError> {
        self.with_deadline("get_bill", self.ledger.get_bill(business, bill_id))
            .await
            .map_err(|e| {
                if e.is_not_found() {
                    BillingError::BillNotFound(bill_id)
                } else {
                    BillingError::Store(e)
                }
            })
    }

    /// Writes the computed balance to the customer account
    ///
    /// The write is conditional on the account version read at the start of
    /// the operation. Losing the race means the balance we computed from is
    /// stale: re-read the account, recompute this bill's totals against the
    /// fresh balance (minus `contribution_offset`, the old contribution of
    /// this bill already folded into the stored balance), rewrite the bill,
    /// and try again with the fresh version, up to the configured retry
    /// budget.
    ///
    /// The bill is already in the ledger when this runs, so every
    /// non-retryable failure here is a [`BillingError::Consistency`].
    async fn propagate_balance(
        &self,
        business: BusinessId,
        bill: &mut BillRecord,
        mut expected_version: i64,
        mut new_balance: Money,
        contribution_offset: Money,
    ) -> Result<CustomerAccount, BillingError> {
        let mut attempt = 0u32;
        loop {
            let result = self
                .with_deadline(
                    "set_balance",
                    self.balances.set_balance(
                        business,
                        &bill.customer_phone,
                        new_balance,
                        expected_version,
                    ),
                )
                .await;

            let conflict = match result {
                Ok(account) => return Ok(account),
                Err(e) if e.is_conflict() && attempt < self.config.max_balance_retries => e,
                Err(e) => return Err(self.consistency(bill, new_balance, e)),
            };

            attempt += 1;
            warn!(
                bill_id = %bill.id,
                attempt,
                error = %conflict,
                "lost balance race; recomputing against fresh state"
            );

            let fresh = self
                .with_deadline(
                    "get_account",
                    self.balances.get_account(business, &bill.customer_phone),
                )
                .await
                .map_err(|e| self.consistency(bill, new_balance, e))?;

            let previous_balance = (fresh.balance - contribution_offset).clamp_non_negative();
            let totals = compute_totals(TotalsInput {
                previous_balance,
                items_total: bill.items_total(),
                delivery_charge: bill.delivery_charge,
                cleaning_charge: bill.cleaning_charge,
                paid_amount: bill.paid_amount,
            });
            bill.apply_totals(&totals);
            bill.mark_updated()?;

            *bill = self
                .with_deadline(
                    "update_bill",
                    self.ledger.update_bill(business, bill.clone()),
                )
                .await
                .map_err(|e| self.consistency(bill, totals.new_balance, e))?;

            new_balance = totals.new_balance;
            expected_version = fresh.version;
        }
    }

    /// Builds the consistency error for a failed post-write balance step
    fn consistency(
        &self,
        bill: &BillRecord,
        attempted_balance: Money,
        source: PortError,
    ) -> BillingError {
        error!(
            bill_id = %bill.id,
            customer = %bill.customer_phone,
            attempted_balance = %attempted_balance,
            error = %source,
            "bill persisted but balance propagation failed; ledger and account diverged"
        );
        BillingError::Consistency {
            bill_id: bill.id,
            customer: bill.customer_phone.clone(),
            attempted_balance,
            source,
        }
    }

    /// Runs a store operation under the configured deadline
    ///
    /// Timeout surfaces as a retryable `PortError::Timeout` for the caller
    /// to classify; it is never treated as success.
    async fn with_deadline<T, F>(&self, operation: &'static str, fut: F) -> Result<T, PortError>
    where
        F: Future<Output = Result<T, PortError>>,
    {
        match tokio::time::timeout(self.config.op_timeout, fut).await {
            Ok(result) => result,
            Err(_) => Err(PortError::timeout(
                operation,
                self.config.op_timeout.as_millis() as u64,
            )),
        }
    }
}
