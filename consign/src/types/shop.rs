use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::resource::Resource;
use crate::types::ShopStatus;
use crate::utils::{format_timestamp, truncate, EMPTY_CELL};
use crate::view::Column;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shop {
    pub id: u64,
    pub name: String,
    pub owner_id: u64,
    pub status: ShopStatus,
    /// Average review score; absent until the first review.
    #[serde(default)]
    pub rating: Option<Decimal>,
    pub created_at: DateTime<Utc>,
}

impl Shop {
    fn rating_cell(&self) -> String {
        self.rating
            .map(|r| format!("{:.1}", r.round_dp(1)))
            .unwrap_or_else(|| EMPTY_CELL.to_string())
    }
}

const COLUMNS: &[Column] = &[
    Column::new("id", "ID", 8).sortable(),
    Column::new("name", "Shop", 24).sortable(),
    Column::new("ownerId", "Owner", 8),
    Column::new("status", "Status", 14),
    Column::new("rating", "Rating", 6).sortable(),
    Column::new("createdAt", "Created", 16).sortable(),
];

impl Resource for Shop {
    const NAME: &'static str = "shops";
    const PATH: &'static str = "/admin/shops";
    const FILTERS: &'static [&'static str] = &["keyword", "status"];

    fn id(&self) -> u64 {
        self.id
    }

    fn columns() -> &'static [Column] {
        COLUMNS
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            truncate(&self.name, 24),
            self.owner_id.to_string(),
            self.status.to_string(),
            self.rating_cell(),
            format_timestamp(&self.created_at),
        ]
    }

    fn detail(&self) -> Vec<(&'static str, String)> {
        vec![
            ("ID", self.id.to_string()),
            ("Shop", self.name.clone()),
            ("Owner", self.owner_id.to_string()),
            ("Status", self.status.to_string()),
            ("Rating", self.rating_cell()),
            ("Created", format_timestamp(&self.created_at)),
        ]
    }
}
