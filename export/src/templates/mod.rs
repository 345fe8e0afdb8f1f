//! FILENAME: export/src/templates/mod.rs
//! PURPOSE: Built-in per-collection document layouts.

mod appointments;
mod branches;
mod generic;
mod inventory;
mod transection;
mod users;

pub use appointments::AppointmentsTemplate;
pub use branches::BranchesTemplate;
pub use generic::GenericTemplate;
pub use inventory::InventoryTemplate;
pub use transection::TransectionTemplate;
pub use users::UsersTemplate;

use crate::document::table;
use crate::summary::PeriodTotals;

/// Money rendering used across templates.
pub(crate) fn format_amount(amount: f64) -> String {
    format!("{:.2}", amount)
}

/// Income/expense/net table shared by the ledger-aware layouts.
pub(crate) fn period_table(totals: &[PeriodTotals]) -> String {
    let rows: Vec<Vec<String>> = totals
        .iter()
        .map(|t| {
            vec![
                t.key.clone(),
                format_amount(t.income),
                format_amount(t.expense),
                format_amount(t.net()),
                t.count.to_string(),
            ]
        })
        .collect();
    table(&["Period", "Income", "Expense", "Net", "Count"], &rows)
}
