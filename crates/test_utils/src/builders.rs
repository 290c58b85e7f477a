//! Test data builders
//!
//! Builder patterns for constructing test data with sensible defaults.
//! Tests set only the fields they care about.

use chrono::NaiveDate;
use core_kernel::{BusinessId, Money};
use domain_billing::{
    BillLineItem, CreateBillRequest, CustomerKey, PaymentDetails, UpdateBillRequest,
};

use crate::fixtures::{DateFixtures, IdentityFixtures, MoneyFixtures};

/// Builder for [`CreateBillRequest`]
pub struct CreateBillRequestBuilder {
    customer: CustomerKey,
    bill_date: NaiveDate,
    items: Vec<BillLineItem>,
    delivery_charge: Money,
    cleaning_charge: Money,
    paid_amount: Money,
    payment: PaymentDetails,
}

impl Default for CreateBillRequestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CreateBillRequestBuilder {
    /// The standard test bill: ₹1500 of items, ₹50 delivery, ₹20
    /// cleaning, ₹1000 paid in cash
    pub fn new() -> Self {
        Self {
            customer: IdentityFixtures::regular_customer(),
            bill_date: DateFixtures::bill_date(),
            items: vec![BillLineItem::new(1, "Onion", "12.5", "120")],
            delivery_charge: MoneyFixtures::delivery_charge(),
            cleaning_charge: MoneyFixtures::cleaning_charge(),
            paid_amount: MoneyFixtures::paid_amount(),
            payment: PaymentDetails::cash(),
        }
    }

    /// An empty balance-only bill: no items, no charges, nothing paid
    pub fn balance_only() -> Self {
        Self {
            items: Vec::new(),
            delivery_charge: Money::zero(),
            cleaning_charge: Money::zero(),
            paid_amount: Money::zero(),
            ..Self::new()
        }
    }

    pub fn with_customer(mut self, customer: CustomerKey) -> Self {
        self.customer = customer;
        self
    }

    pub fn with_bill_date(mut self, date: NaiveDate) -> Self {
        self.bill_date = date;
        self
    }

    pub fn with_items(mut self, items: Vec<BillLineItem>) -> Self {
        self.items = items;
        self
    }

    pub fn with_charges(mut self, delivery: Money, cleaning: Money) -> Self {
        self.delivery_charge = delivery;
        self.cleaning_charge = cleaning;
        self
    }

    pub fn with_paid_amount(mut self, paid: Money) -> Self {
        self.paid_amount = paid;
        self
    }

    pub fn with_payment(mut self, payment: PaymentDetails) -> Self {
        self.payment = payment;
        self
    }

    pub fn build(self) -> CreateBillRequest {
        CreateBillRequest {
            customer: self.customer,
            bill_date: self.bill_date,
            items: self.items,
            delivery_charge: self.delivery_charge,
            cleaning_charge: self.cleaning_charge,
            paid_amount: self.paid_amount,
            payment: self.payment,
        }
    }

    /// Builds the matching edit request (same monetary fields)
    pub fn build_update(self) -> UpdateBillRequest {
        UpdateBillRequest {
            bill_date: self.bill_date,
            items: self.items,
            delivery_charge: self.delivery_charge,
            cleaning_charge: self.cleaning_charge,
            paid_amount: self.paid_amount,
            payment: self.payment,
        }
    }
}

/// Shorthand for a one-line bill worth the given rupee amount
pub fn single_item(rupees: &str) -> Vec<BillLineItem> {
    vec![BillLineItem::new(1, "Item", "1", rupees)]
}

/// A business id for isolating one test's data
pub fn test_business() -> BusinessId {
    BusinessId::new_v7()
}
