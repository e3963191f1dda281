//! Monthly usage and fee accumulation (月結帳務)
//!
//! Pure computation over the mail log: scans and scheduled deliveries
//! are attributed to the calendar month the item arrived in, whether
//! or not it has since been archived. Overage applies past the tier's
//! free allowance; the carried unpaid balance is added on top and only
//! ever cleared by an explicit settle action on the registry.

use chrono::{DateTime, Datelike, Utc};
use serde::Serialize;
use shared::models::{CustodyState, Customer, MailItem};

/// Usage and fees for one customer in one calendar month
#[derive(Debug, Clone, Serialize)]
pub struct MonthlyUsage {
    pub customer_id: String,
    pub year: i32,
    pub month: u32,
    /// Items scanned this month
    pub scan_count: u32,
    /// Items scheduled for delivery this month
    pub delivery_count: u32,
    /// Fee for scans past the free allowance
    pub scan_overage: i64,
    /// Fee for deliveries past the free allowance
    pub delivery_overage: i64,
    /// Overage total for this month only
    pub current_month_fee: i64,
    /// Carried unpaid balance from earlier periods
    pub unpaid_balance: i64,
    /// current_month_fee + unpaid_balance
    pub total_due: i64,
}

fn in_month(received_at: i64, year: i32, month: u32) -> bool {
    match DateTime::<Utc>::from_timestamp_millis(received_at) {
        Some(dt) => dt.year() == year && dt.month() == month,
        None => false,
    }
}

fn overage(count: u32, allowance: u32, fee: i64) -> i64 {
    i64::from(count.saturating_sub(allowance)) * fee
}

/// Compute one customer's usage for a calendar month (UTC)
pub fn compute_monthly_usage(
    customer: &Customer,
    year: i32,
    month: u32,
    items: &[MailItem],
) -> MonthlyUsage {
    let mut scan_count = 0u32;
    let mut delivery_count = 0u32;

    for item in items {
        if item.matched_customer_id.as_deref() != Some(customer.customer_id.as_str()) {
            continue;
        }
        if !in_month(item.received_at, year, month) {
            continue;
        }
        // Archival never removes an item from its month's usage
        match item.custody_state {
            CustodyState::Scanned => scan_count += 1,
            CustodyState::ScheduledForDelivery => delivery_count += 1,
            _ => {}
        }
    }

    let scan_overage = overage(scan_count, customer.free_scans_per_month, customer.scan_overage_fee);
    let delivery_overage = overage(
        delivery_count,
        customer.free_deliveries_per_month,
        customer.delivery_overage_fee,
    );
    let current_month_fee = scan_overage + delivery_overage;

    MonthlyUsage {
        customer_id: customer.customer_id.clone(),
        year,
        month,
        scan_count,
        delivery_count,
        scan_overage,
        delivery_overage,
        current_month_fee,
        unpaid_balance: customer.unpaid_balance,
        total_due: current_month_fee + customer.unpaid_balance,
    }
}
