use std::sync::Arc;

use crate::config::ConsignConfig;
use crate::error::Result;
use crate::fetch::{Collection, Pager, PagerConfig};
use crate::resource::Resource;
use crate::rest::ConsignHttpClient;
use crate::types::ShopStatus;

/// Entry point for the marketplace admin API.
///
/// Holds the single HTTP client every table and action shares.
#[derive(Debug, Clone)]
pub struct Consign {
    pub config: ConsignConfig,
    http: Arc<ConsignHttpClient>,
}

impl Consign {
    pub fn new(config: ConsignConfig) -> Result<Self> {
        let http = Arc::new(ConsignHttpClient::new(&config)?);
        Ok(Self { config, http })
    }

    /// Load config from the environment and connect.
    pub fn from_env() -> Result<Self> {
        Self::new(ConsignConfig::from_env()?)
    }

    pub fn http(&self) -> &ConsignHttpClient {
        &self.http
    }

    /// Source for one collection.
    pub fn collection<R: Resource>(&self) -> Collection<R> {
        Collection::new(Arc::clone(&self.http))
    }

    /// Idle pager over one collection using the configured page size and
    /// debounce.
    pub fn pager<R: Resource>(&self) -> Result<Pager<Collection<R>>> {
        Pager::new(
            Arc::new(self.collection::<R>()),
            PagerConfig {
                page_size: self.config.default_page_size,
                debounce: self.config.debounce,
            },
        )
    }

    /// Fetch a single record by id.
    pub async fn get<R: Resource>(&self, id: u64) -> Result<R> {
        self.http.get_record::<R>(id).await
    }

    // --- Row actions ---

    pub async fn approve_withdrawal(&self, id: u64) -> Result<()> {
        self.http.approve_withdrawal(id).await
    }

    pub async fn reject_withdrawal(&self, id: u64, reason: &str) -> Result<()> {
        self.http.reject_withdrawal(id, reason).await
    }

    pub async fn approve_refund(&self, id: u64) -> Result<()> {
        self.http.approve_refund(id).await
    }

    pub async fn reject_refund(&self, id: u64, reason: &str) -> Result<()> {
        self.http.reject_refund(id, reason).await
    }

    pub async fn suspend_shop(&self, id: u64) -> Result<()> {
        self.http.set_shop_status(id, ShopStatus::Suspended).await
    }

    pub async fn reactivate_shop(&self, id: u64) -> Result<()> {
        self.http.set_shop_status(id, ShopStatus::Active).await
    }

    pub async fn cancel_auction(&self, id: u64, reason: &str) -> Result<()> {
        self.http.cancel_auction(id, reason).await
    }
}
