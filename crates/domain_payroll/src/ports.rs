//! Payroll domain port

use async_trait::async_trait;
use core_kernel::{BusinessId, DomainPort, PortError};

use crate::salary::SalaryPayment;

/// The store of salary payment records
#[async_trait]
pub trait PayrollStore: DomainPort {
    /// Appends a salary payment
    async fn add_payment(
        &self,
        business: BusinessId,
        payment: SalaryPayment,
    ) -> Result<SalaryPayment, PortError>;

    /// All payments for a business, most recent first
    async fn list_payments(
        &self,
        business: BusinessId,
    ) -> Result<Vec<SalaryPayment>, PortError>;
}

/// In-memory mock store for testing
#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use std::sync::Arc;
    use tokio::sync::RwLock;

    /// In-memory mock implementation of `PayrollStore`
    #[derive(Debug, Default)]
    pub struct MockPayrollStore {
        payments: Arc<RwLock<Vec<SalaryPayment>>>,
    }

    impl MockPayrollStore {
        pub fn new() -> Self {
            Self::default()
        }
    }

    impl DomainPort for MockPayrollStore {}

    #[async_trait]
    impl PayrollStore for MockPayrollStore {
        async fn add_payment(
            &self,
            business: BusinessId,
            payment: SalaryPayment,
        ) -> Result<SalaryPayment, PortError> {
            debug_assert_eq!(payment.business, business);
            self.payments.write().await.push(payment.clone());
            Ok(payment)
        }

        async fn list_payments(
            &self,
            business: BusinessId,
        ) -> Result<Vec<SalaryPayment>, PortError> {
            let mut payments: Vec<_> = self
                .payments
                .read()
                .await
                .iter()
                .filter(|p| p.business == business)
                .cloned()
                .collect();
            payments.sort_by(|a, b| b.salary_date.cmp(&a.salary_date));
            Ok(payments)
        }
    }
}
