use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::resource::Resource;
use crate::types::RefundStatus;
use crate::utils::{format_money, format_timestamp, truncate};
use crate::view::Column;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Refund {
    pub id: u64,
    pub order_id: u64,
    pub account_id: u64,
    pub amount: Decimal,
    #[serde(default)]
    pub reason: String,
    pub status: RefundStatus,
    pub requested_at: DateTime<Utc>,
}

const COLUMNS: &[Column] = &[
    Column::new("id", "ID", 8).sortable(),
    Column::new("orderId", "Order", 8),
    Column::new("accountId", "Account", 8),
    Column::new("amount", "Amount", 12).sortable(),
    Column::new("reason", "Reason", 24),
    Column::new("status", "Status", 10),
    Column::new("requestedAt", "Requested", 16).sortable(),
];

impl Resource for Refund {
    const NAME: &'static str = "refunds";
    const PATH: &'static str = "/admin/refunds";
    const FILTERS: &'static [&'static str] = &["status", "orderId"];

    fn id(&self) -> u64 {
        self.id
    }

    fn columns() -> &'static [Column] {
        COLUMNS
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.order_id.to_string(),
            self.account_id.to_string(),
            format_money(self.amount),
            truncate(&self.reason, 24),
            self.status.to_string(),
            format_timestamp(&self.requested_at),
        ]
    }

    fn detail(&self) -> Vec<(&'static str, String)> {
        vec![
            ("ID", self.id.to_string()),
            ("Order", self.order_id.to_string()),
            ("Account", self.account_id.to_string()),
            ("Amount", format_money(self.amount)),
            ("Reason", self.reason.clone()),
            ("Status", self.status.to_string()),
            ("Requested", format_timestamp(&self.requested_at)),
        ]
    }
}
