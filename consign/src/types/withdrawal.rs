use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::resource::Resource;
use crate::types::WithdrawalStatus;
use crate::utils::{format_money, format_opt, format_timestamp, truncate};
use crate::view::Column;

/// A request to pay an account balance out to an external destination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Withdrawal {
    pub id: u64,
    pub account_id: u64,
    pub amount: Decimal,
    #[serde(default)]
    pub fee: Decimal,
    pub status: WithdrawalStatus,
    /// Masked bank account or wallet identifier.
    pub destination: String,
    pub requested_at: DateTime<Utc>,
    /// Reviewer note, set on rejection.
    #[serde(default)]
    pub note: Option<String>,
}

impl Withdrawal {
    pub fn net_amount(&self) -> Decimal {
        self.amount - self.fee
    }
}

const COLUMNS: &[Column] = &[
    Column::new("id", "ID", 8).sortable(),
    Column::new("accountId", "Account", 8),
    Column::new("amount", "Amount", 12).sortable(),
    Column::new("fee", "Fee", 8),
    Column::new("status", "Status", 9),
    Column::new("destination", "Destination", 18),
    Column::new("requestedAt", "Requested", 16).sortable(),
];

impl Resource for Withdrawal {
    const NAME: &'static str = "withdrawals";
    const PATH: &'static str = "/admin/withdrawals";
    const FILTERS: &'static [&'static str] = &["status", "accountId"];

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
            format_money(self.amount),
            format_money(self.fee),
            self.status.to_string(),
            truncate(&self.destination, 18),
            format_timestamp(&self.requested_at),
        ]
    }

    fn detail(&self) -> Vec<(&'static str, String)> {
        vec![
            ("ID", self.id.to_string()),
            ("Account", self.account_id.to_string()),
            ("Amount", format_money(self.amount)),
            ("Fee", format_money(self.fee)),
            ("Net", format_money(self.net_amount())),
            ("Status", self.status.to_string()),
            ("Destination", self.destination.clone()),
            ("Requested", format_timestamp(&self.requested_at)),
            ("Note", format_opt(self.note.as_deref())),
        ]
    }
}
