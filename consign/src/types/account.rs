use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::resource::Resource;
use crate::types::{AccountRole, AccountStatus};
use crate::utils::{format_timestamp, truncate};
use crate::view::Column;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: u64,
    pub email: String,
    pub display_name: String,
    pub role: AccountRole,
    pub status: AccountStatus,
    pub created_at: DateTime<Utc>,
}

const COLUMNS: &[Column] = &[
    Column::new("id", "ID", 8).sortable(),
    Column::new("email", "Email", 28).sortable(),
    Column::new("displayName", "Name", 20),
    Column::new("role", "Role", 8),
    Column::new("status", "Status", 20),
    Column::new("createdAt", "Created", 16).sortable(),
];

impl Resource for Account {
    const NAME: &'static str = "accounts";
    const PATH: &'static str = "/admin/accounts";
    const FILTERS: &'static [&'static str] = &["keyword", "status", "role"];

    fn id(&self) -> u64 {
        self.id
    }

    fn columns() -> &'static [Column] {
        COLUMNS
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            truncate(&self.email, 28),
            truncate(&self.display_name, 20),
            self.role.to_string(),
            self.status.to_string(),
            format_timestamp(&self.created_at),
        ]
    }

    fn detail(&self) -> Vec<(&'static str, String)> {
        vec![
            ("ID", self.id.to_string()),
            ("Email", self.email.clone()),
            ("Name", self.display_name.clone()),
            ("Role", self.role.to_string()),
            ("Status", self.status.to_string()),
            ("Created", format_timestamp(&self.created_at)),
        ]
    }
}
