//! Deserialization of realistic admin API records.
//!
//! Each fixture is what the collection endpoint returns for one row; the
//! tests check field mapping and the cells each table renders from it.

use consign::types::*;
use consign::Resource;
use rust_decimal_macros::dec;

// ---------------------------------------------------------------------------
// Account / Shop
// ---------------------------------------------------------------------------

#[test]
fn test_account_fixture() {
    let json = r#"{
        "id": 101,
        "email": "mara@example.com",
        "displayName": "Mara Lindqvist",
        "role": "SELLER",
        "status": "PENDING_VERIFICATION",
        "createdAt": "2025-11-04T16:20:00Z"
    }"#;

    let account: Account = serde_json::from_str(json).unwrap();
    assert_eq!(account.role, AccountRole::Seller);
    assert_eq!(account.status, AccountStatus::PendingVerification);
    assert_eq!(account.cells().len(), Account::columns().len());
    assert!(account.cells().contains(&"2025-11-04 16:20".to_string()));
}

#[test]
fn test_shop_without_rating() {
    let json = r#"{
        "id": 12,
        "name": "Second Chapter Books",
        "ownerId": 101,
        "status": "ACTIVE",
        "createdAt": "2025-12-01T08:00:00Z"
    }"#;

    let shop: Shop = serde_json::from_str(json).unwrap();
    assert_eq!(shop.rating, None);
    let cells = shop.cells();
    assert_eq!(cells.len(), Shop::columns().len());
    assert_eq!(cells[4], "-");
}

// ---------------------------------------------------------------------------
// Auction / Consignment
// ---------------------------------------------------------------------------

#[test]
fn test_live_auction() {
    let json = r#"{
        "id": 3001,
        "title": "Mid-century teak sideboard",
        "shopId": 12,
        "status": "LIVE",
        "startingPrice": "150.00",
        "currentBid": "1240.50",
        "bidCount": 17,
        "endsAt": "2026-04-10T20:00:00Z"
    }"#;

    let auction: Auction = serde_json::from_str(json).unwrap();
    assert_eq!(auction.status, AuctionStatus::Live);
    assert_eq!(auction.current_bid, Some(dec!(1240.50)));
    assert_eq!(auction.bid_count, 17);
    assert!(auction.cells().contains(&"1,240.50".to_string()));
}

#[test]
fn test_auction_without_bids() {
    let json = r#"{
        "id": 3002,
        "title": "Brass desk lamp",
        "shopId": 12,
        "status": "SCHEDULED",
        "startingPrice": "40",
        "endsAt": "2026-04-12T20:00:00Z"
    }"#;

    let auction: Auction = serde_json::from_str(json).unwrap();
    assert_eq!(auction.current_bid, None);
    assert_eq!(auction.bid_count, 0);
}

#[test]
fn test_consignment_payout() {
    let json = r#"{
        "id": 77,
        "itemName": "Leather weekender bag",
        "consignorId": 205,
        "shopId": 12,
        "status": "LISTED",
        "askingPrice": "320.00",
        "commissionRate": "0.25",
        "receivedAt": "2026-01-15T11:45:00Z"
    }"#;

    let consignment: Consignment = serde_json::from_str(json).unwrap();
    assert_eq!(consignment.status, ConsignmentStatus::Listed);
    assert_eq!(consignment.consignor_payout(), dec!(240.00));
}

// ---------------------------------------------------------------------------
// Order / Transaction
// ---------------------------------------------------------------------------

#[test]
fn test_order_fixture() {
    let json = r#"{
        "id": 5550,
        "buyerId": 310,
        "shopId": 12,
        "status": "SHIPPED",
        "total": "89.90",
        "itemCount": 2,
        "placedAt": "2026-02-20T13:05:00Z"
    }"#;

    let order: Order = serde_json::from_str(json).unwrap();
    assert_eq!(order.status, OrderStatus::Shipped);
    assert_eq!(order.total, dec!(89.90));
    assert_eq!(order.id(), 5550);
}

#[test]
fn test_debit_transaction() {
    let json = r#"{
        "id": 90001,
        "accountId": 205,
        "kind": "PAYOUT",
        "amount": "-240.00",
        "balanceAfter": "15.75",
        "reference": "WD-4411",
        "createdAt": "2026-02-21T09:00:00Z"
    }"#;

    let tx: Transaction = serde_json::from_str(json).unwrap();
    assert_eq!(tx.kind, TransactionKind::Payout);
    assert!(tx.amount.is_sign_negative());
    assert!(tx.cells().contains(&"-240.00".to_string()));
}

#[test]
fn test_unknown_transaction_kind_still_parses() {
    let json = r#"{
        "id": 90002,
        "accountId": 205,
        "kind": "LOYALTY_BONUS",
        "amount": "5.00",
        "balanceAfter": "20.75",
        "createdAt": "2026-02-22T09:00:00Z"
    }"#;

    let tx: Transaction = serde_json::from_str(json).unwrap();
    assert_eq!(tx.kind, TransactionKind::Unknown);
    assert_eq!(tx.reference, None);
}

// ---------------------------------------------------------------------------
// Withdrawal / Refund
// ---------------------------------------------------------------------------

#[test]
fn test_withdrawal_detail() {
    let json = r#"{
        "id": 4411,
        "accountId": 205,
        "amount": "240.00",
        "fee": "1.20",
        "status": "PENDING",
        "destination": "SE** **** 0091",
        "requestedAt": "2026-02-21T08:30:00Z"
    }"#;

    let withdrawal: Withdrawal = serde_json::from_str(json).unwrap();
    assert!(withdrawal.status.is_actionable());
    assert_eq!(withdrawal.net_amount(), dec!(238.80));

    let detail = withdrawal.detail();
    let net = detail.iter().find(|(label, _)| *label == "Net").unwrap();
    assert_eq!(net.1, "238.80");
}

#[test]
fn test_settled_refund_not_actionable() {
    let json = r#"{
        "id": 61,
        "orderId": 5550,
        "accountId": 310,
        "amount": "44.95",
        "reason": "arrived damaged",
        "status": "REFUNDED",
        "requestedAt": "2026-02-25T10:10:00Z"
    }"#;

    let refund: Refund = serde_json::from_str(json).unwrap();
    assert_eq!(refund.status, RefundStatus::Refunded);
    assert!(!refund.status.is_actionable());
}

#[test]
fn test_page_of_refunds_normalizes() {
    let raw = serde_json::json!({
        "data": {
            "items": [{
                "id": 62,
                "orderId": 5551,
                "accountId": 311,
                "amount": "10.00",
                "status": "REQUESTED",
                "requestedAt": "2026-02-26T10:10:00Z"
            }],
            "totalCount": 31
        }
    });

    let page: PageResult<Refund> = normalize_page(raw, 10).unwrap();
    assert_eq!(page.total_pages, 4);
    assert_eq!(page.items[0].reason, "");
}
