use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::resource::Resource;
use crate::types::AuctionStatus;
use crate::utils::{format_money, format_money_opt, format_timestamp, truncate};
use crate::view::Column;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Auction {
    pub id: u64,
    pub title: String,
    pub shop_id: u64,
    pub status: AuctionStatus,
    pub starting_price: Decimal,
    /// `None` until the first bid lands.
    #[serde(default)]
    pub current_bid: Option<Decimal>,
    #[serde(default)]
    pub bid_count: u32,
    pub ends_at: DateTime<Utc>,
}

const COLUMNS: &[Column] = &[
    Column::new("id", "ID", 8).sortable(),
    Column::new("title", "Title", 28).sortable(),
    Column::new("shopId", "Shop", 8),
    Column::new("status", "Status", 10),
    Column::new("startingPrice", "Start", 12).sortable(),
    Column::new("currentBid", "Bid", 12).sortable(),
    Column::new("bidCount", "Bids", 5),
    Column::new("endsAt", "Ends", 16).sortable(),
];

impl Resource for Auction {
    const NAME: &'static str = "auctions";
    const PATH: &'static str = "/admin/auctions";
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
            truncate(&self.title, 28),
            self.shop_id.to_string(),
            self.status.to_string(),
            format_money(self.starting_price),
            format_money_opt(self.current_bid),
            self.bid_count.to_string(),
            format_timestamp(&self.ends_at),
        ]
    }

    fn detail(&self) -> Vec<(&'static str, String)> {
        vec![
            ("ID", self.id.to_string()),
            ("Title", self.title.clone()),
            ("Shop", self.shop_id.to_string()),
            ("Status", self.status.to_string()),
            ("Starting price", format_money(self.starting_price)),
            ("Current bid", format_money_opt(self.current_bid)),
            ("Bids", self.bid_count.to_string()),
            ("Ends", format_timestamp(&self.ends_at)),
        ]
    }
}
