use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::resource::Resource;
use crate::types::ConsignmentStatus;
use crate::utils::{format_money, format_percent, format_timestamp, truncate};
use crate::view::Column;

/// An item handed to a shop to sell on the consignor's behalf.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Consignment {
    pub id: u64,
    pub item_name: String,
    pub consignor_id: u64,
    pub shop_id: u64,
    pub status: ConsignmentStatus,
    pub asking_price: Decimal,
    /// Shop commission as a fraction of the sale price (`0.2` = 20%).
    pub commission_rate: Decimal,
    pub received_at: DateTime<Utc>,
}

impl Consignment {
    /// What the consignor receives if the item sells at the asking price.
    pub fn consignor_payout(&self) -> Decimal {
        self.asking_price - self.asking_price * self.commission_rate
    }
}

const COLUMNS: &[Column] = &[
    Column::new("id", "ID", 8).sortable(),
    Column::new("itemName", "Item", 26).sortable(),
    Column::new("consignorId", "Consignor", 9),
    Column::new("shopId", "Shop", 8),
    Column::new("status", "Status", 10),
    Column::new("askingPrice", "Asking", 12).sortable(),
    Column::new("commissionRate", "Comm.", 6),
    Column::new("receivedAt", "Received", 16).sortable(),
];

impl Resource for Consignment {
    const NAME: &'static str = "consignments";
    const PATH: &'static str = "/admin/consignments";
    const FILTERS: &'static [&'static str] = &["keyword", "status", "shopId"];

    fn id(&self) -> u64 {
        self.id
    }

    fn columns() -> &'static [Column] {
        COLUMNS
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            truncate(&self.item_name, 26),
            self.consignor_id.to_string(),
            self.shop_id.to_string(),
            self.status.to_string(),
            format_money(self.asking_price),
            format_percent(self.commission_rate),
            format_timestamp(&self.received_at),
        ]
    }

    fn detail(&self) -> Vec<(&'static str, String)> {
        vec![
            ("ID", self.id.to_string()),
            ("Item", self.item_name.clone()),
            ("Consignor", self.consignor_id.to_string()),
            ("Shop", self.shop_id.to_string()),
            ("Status", self.status.to_string()),
            ("Asking price", format_money(self.asking_price)),
            ("Commission", format_percent(self.commission_rate)),
            ("Consignor payout", format_money(self.consignor_payout())),
            ("Received", format_timestamp(&self.received_at)),
        ]
    }
}
