use reqwest::Method;
use serde::Serialize;
use serde_json::Value;

use crate::error::{ConsignError, Result};
use crate::query::PageRequest;
use crate::resource::Resource;
use crate::rest::ConsignHttpClient;
use crate::types::*;

#[derive(Serialize)]
struct ReasonBody<'a> {
    reason: &'a str,
}

#[derive(Serialize)]
struct StatusBody {
    status: ShopStatus,
}

impl ConsignHttpClient {
    // --- Collections ---

    /// GET {R::PATH}?pageNumber=&pageSize=&sortKey=&sortDescending=&... -
    /// One page of a collection, normalized.
    pub async fn fetch_page<R: Resource>(&self, request: &PageRequest) -> Result<PageResult<R>> {
        let raw: Value = self.get(R::PATH, &request.to_query_pairs()).await?;
        normalize_page(raw, request.page_size)
    }

    /// Same request as [`fetch_page`](Self::fetch_page), with each record
    /// kept exactly as the server sent it.
    pub async fn fetch_raw_page<R: Resource>(
        &self,
        request: &PageRequest,
    ) -> Result<PageResult<Value>> {
        let raw: Value = self.get(R::PATH, &request.to_query_pairs()).await?;
        normalize_page(raw, request.page_size)
    }

    /// GET {R::PATH}/{id} - A single record for the detail view.
    pub async fn get_record<R: Resource>(&self, id: u64) -> Result<R> {
        let record = self.get_raw_record::<R>(id).await?;
        serde_json::from_value(record)
            .map_err(|e| ConsignError::Mapping(format!("{} {id}: {e}", R::NAME)))
    }

    /// GET {R::PATH}/{id} - A single record, envelope removed, otherwise
    /// untouched.
    pub async fn get_raw_record<R: Resource>(&self, id: u64) -> Result<Value> {
        let raw: Value = self.get(&format!("{}/{id}", R::PATH), &[]).await?;
        unwrap_record(raw)
    }

    /// GET /admin/accounts - Marketplace accounts.
    pub async fn list_accounts(&self, request: &PageRequest) -> Result<PageResult<Account>> {
        self.fetch_page(request).await
    }

    /// GET /admin/shops - Seller shops.
    pub async fn list_shops(&self, request: &PageRequest) -> Result<PageResult<Shop>> {
        self.fetch_page(request).await
    }

    /// GET /admin/auctions - Scheduled, live and finished auctions.
    pub async fn list_auctions(&self, request: &PageRequest) -> Result<PageResult<Auction>> {
        self.fetch_page(request).await
    }

    /// GET /admin/consignments - Items held on consignment.
    pub async fn list_consignments(
        &self,
        request: &PageRequest,
    ) -> Result<PageResult<Consignment>> {
        self.fetch_page(request).await
    }

    /// GET /admin/orders - Buyer orders.
    pub async fn list_orders(&self, request: &PageRequest) -> Result<PageResult<Order>> {
        self.fetch_page(request).await
    }

    /// GET /admin/transactions - Account ledger entries.
    pub async fn list_transactions(
        &self,
        request: &PageRequest,
    ) -> Result<PageResult<Transaction>> {
        self.fetch_page(request).await
    }

    /// GET /admin/withdrawals - Payout requests.
    pub async fn list_withdrawals(&self, request: &PageRequest) -> Result<PageResult<Withdrawal>> {
        self.fetch_page(request).await
    }

    /// GET /admin/refunds - Refund requests.
    pub async fn list_refunds(&self, request: &PageRequest) -> Result<PageResult<Refund>> {
        self.fetch_page(request).await
    }

    // --- Row actions ---

    /// POST /admin/withdrawals/{id}/approve
    pub async fn approve_withdrawal(&self, id: u64) -> Result<()> {
        self.send::<()>(Method::POST, &format!("/admin/withdrawals/{id}/approve"), None)
            .await
    }

    /// POST /admin/withdrawals/{id}/reject
    pub async fn reject_withdrawal(&self, id: u64, reason: &str) -> Result<()> {
        let reason = require_reason(reason)?;
        self.send(
            Method::POST,
            &format!("/admin/withdrawals/{id}/reject"),
            Some(&ReasonBody { reason }),
        )
        .await
    }

    /// POST /admin/refunds/{id}/approve
    pub async fn approve_refund(&self, id: u64) -> Result<()> {
        self.send::<()>(Method::POST, &format!("/admin/refunds/{id}/approve"), None)
            .await
    }

    /// POST /admin/refunds/{id}/reject
    pub async fn reject_refund(&self, id: u64, reason: &str) -> Result<()> {
        let reason = require_reason(reason)?;
        self.send(
            Method::POST,
            &format!("/admin/refunds/{id}/reject"),
            Some(&ReasonBody { reason }),
        )
        .await
    }

    /// PUT /admin/shops/{id}/status - Suspend or reactivate a shop.
    pub async fn set_shop_status(&self, id: u64, status: ShopStatus) -> Result<()> {
        if !matches!(status, ShopStatus::Active | ShopStatus::Suspended) {
            return Err(ConsignError::Validation(format!(
                "shop status can only be set to active or suspended, not {status}"
            )));
        }
        self.send(
            Method::PUT,
            &format!("/admin/shops/{id}/status"),
            Some(&StatusBody { status }),
        )
        .await
    }

    /// POST /admin/auctions/{id}/cancel
    pub async fn cancel_auction(&self, id: u64, reason: &str) -> Result<()> {
        let reason = require_reason(reason)?;
        self.send(
            Method::POST,
            &format!("/admin/auctions/{id}/cancel"),
            Some(&ReasonBody { reason }),
        )
        .await
    }
}

fn require_reason(reason: &str) -> Result<&str> {
    let reason = reason.trim();
    if reason.is_empty() {
        return Err(ConsignError::Validation("a reason is required".into()));
    }
    Ok(reason)
}

/// Peel up to two `data` envelopes off a single-record response.
fn unwrap_record(raw: Value) -> Result<Value> {
    let mut current = raw;
    for _ in 0..2 {
        current = match current {
            Value::Object(mut map) if !map.contains_key("id") => match map.remove("data") {
                Some(inner @ Value::Object(_)) => inner,
                _ => {
                    return Err(ConsignError::Mapping(
                        "record has neither `id` nor a `data` object".into(),
                    ))
                }
            },
            other => return Ok(other),
        };
    }
    Ok(current)
}
