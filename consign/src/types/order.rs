use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::resource::Resource;
use crate::types::OrderStatus;
use crate::utils::{format_money, format_timestamp};
use crate::view::Column;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: u64,
    pub buyer_id: u64,
    pub shop_id: u64,
    pub status: OrderStatus,
    pub total: Decimal,
    pub item_count: u32,
    pub placed_at: DateTime<Utc>,
}

const COLUMNS: &[Column] = &[
    Column::new("id", "ID", 8).sortable(),
    Column::new("buyerId", "Buyer", 8),
    Column::new("shopId", "Shop", 8),
    Column::new("status", "Status", 10),
    Column::new("total", "Total", 12).sortable(),
    Column::new("itemCount", "Items", 5),
    Column::new("placedAt", "Placed", 16).sortable(),
];

impl Resource for Order {
    const NAME: &'static str = "orders";
    const PATH: &'static str = "/admin/orders";
    const FILTERS: &'static [&'static str] = &["keyword", "status", "shopId", "buyerId"];

    fn id(&self) -> u64 {
        self.id
    }

    fn columns() -> &'static [Column] {
        COLUMNS
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.buyer_id.to_string(),
            self.shop_id.to_string(),
            self.status.to_string(),
            format_money(self.total),
            self.item_count.to_string(),
            format_timestamp(&self.placed_at),
        ]
    }

    fn detail(&self) -> Vec<(&'static str, String)> {
        vec![
            ("ID", self.id.to_string()),
            ("Buyer", self.buyer_id.to_string()),
            ("Shop", self.shop_id.to_string()),
            ("Status", self.status.to_string()),
            ("Total", format_money(self.total)),
            ("Items", self.item_count.to_string()),
            ("Placed", format_timestamp(&self.placed_at)),
        ]
    }
}
