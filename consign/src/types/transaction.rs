use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::resource::Resource;
use crate::types::TransactionKind;
use crate::utils::{format_money, format_opt, format_timestamp, truncate};
use crate::view::Column;

/// A ledger entry on an account balance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: u64,
    pub account_id: u64,
    pub kind: TransactionKind,
    /// Signed: credits positive, debits negative.
    pub amount: Decimal,
    pub balance_after: Decimal,
    #[serde(default)]
    pub reference: Option<String>,
    pub created_at: DateTime<Utc>,
}

const COLUMNS: &[Column] = &[
    Column::new("id", "ID", 8).sortable(),
    Column::new("accountId", "Account", 8),
    Column::new("kind", "Kind", 10),
    Column::new("amount", "Amount", 12).sortable(),
    Column::new("balanceAfter", "Balance", 12),
    Column::new("reference", "Reference", 18),
    Column::new("createdAt", "Created", 16).sortable(),
];

impl Resource for Transaction {
    const NAME: &'static str = "transactions";
    const PATH: &'static str = "/admin/transactions";
    const FILTERS: &'static [&'static str] = &["accountId", "kind"];

    fn id(&self) -> u64 {
        self.id
    }

    fn columns() -> &'static [Column] {
        COLUMNS
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.account_id.to_string(),
            self.kind.to_string(),
            format_money(self.amount),
            format_money(self.balance_after),
            truncate(&format_opt(self.reference.as_deref()), 18),
            format_timestamp(&self.created_at),
        ]
    }

    fn detail(&self) -> Vec<(&'static str, String)> {
        vec![
            ("ID", self.id.to_string()),
            ("Account", self.account_id.to_string()),
            ("Kind", self.kind.to_string()),
            ("Amount", format_money(self.amount)),
            ("Balance after", format_money(self.balance_after)),
            ("Reference", format_opt(self.reference.as_deref())),
            ("Created", format_timestamp(&self.created_at)),
        ]
    }
}
