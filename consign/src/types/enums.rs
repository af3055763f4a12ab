use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountRole {
    Admin,
    Seller,
    Buyer,
    #[serde(other)]
    Unknown,
}

impl fmt::Display for AccountRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AccountRole::Admin => "admin",
            AccountRole::Seller => "seller",
            AccountRole::Buyer => "buyer",
            AccountRole::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountStatus {
    Active,
    PendingVerification,
    Suspended,
    Closed,
    #[serde(other)]
    Unknown,
}

impl fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AccountStatus::Active => "active",
            AccountStatus::PendingVerification => "pending verification",
            AccountStatus::Suspended => "suspended",
            AccountStatus::Closed => "closed",
            AccountStatus::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShopStatus {
    PendingReview,
    Active,
    Suspended,
    Closed,
    #[serde(other)]
    Unknown,
}

impl fmt::Display for ShopStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ShopStatus::PendingReview => "pending review",
            ShopStatus::Active => "active",
            ShopStatus::Suspended => "suspended",
            ShopStatus::Closed => "closed",
            ShopStatus::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuctionStatus {
    Scheduled,
    Live,
    Ended,
    Cancelled,
    #[serde(other)]
    Unknown,
}

impl fmt::Display for AuctionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AuctionStatus::Scheduled => "scheduled",
            AuctionStatus::Live => "live",
            AuctionStatus::Ended => "ended",
            AuctionStatus::Cancelled => "cancelled",
            AuctionStatus::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConsignmentStatus {
    Received,
    Listed,
    Sold,
    Returned,
    Withdrawn,
    #[serde(other)]
    Unknown,
}

impl fmt::Display for ConsignmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ConsignmentStatus::Received => "received",
            ConsignmentStatus::Listed => "listed",
            ConsignmentStatus::Sold => "sold",
            ConsignmentStatus::Returned => "returned",
            ConsignmentStatus::Withdrawn => "withdrawn",
            ConsignmentStatus::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Pending,
    Paid,
    Shipped,
    Delivered,
    Cancelled,
    Refunded,
    #[serde(other)]
    Unknown,
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Paid => "paid",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
            OrderStatus::Refunded => "refunded",
            OrderStatus::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionKind {
    Sale,
    Purchase,
    Commission,
    Payout,
    Refund,
    Adjustment,
    #[serde(other)]
    Unknown,
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TransactionKind::Sale => "sale",
            TransactionKind::Purchase => "purchase",
            TransactionKind::Commission => "commission",
            TransactionKind::Payout => "payout",
            TransactionKind::Refund => "refund",
            TransactionKind::Adjustment => "adjustment",
            TransactionKind::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WithdrawalStatus {
    Pending,
    Approved,
    Rejected,
    Paid,
    #[serde(other)]
    Unknown,
}

impl WithdrawalStatus {
    /// Only pending withdrawals accept approve/reject.
    pub fn is_actionable(self) -> bool {
        self == WithdrawalStatus::Pending
    }
}

impl fmt::Display for WithdrawalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            WithdrawalStatus::Pending => "pending",
            WithdrawalStatus::Approved => "approved",
            WithdrawalStatus::Rejected => "rejected",
            WithdrawalStatus::Paid => "paid",
            WithdrawalStatus::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RefundStatus {
    Requested,
    Approved,
    Rejected,
    Refunded,
    #[serde(other)]
    Unknown,
}

impl RefundStatus {
    /// Only requested refunds accept approve/reject.
    pub fn is_actionable(self) -> bool {
        self == RefundStatus::Requested
    }
}

impl fmt::Display for RefundStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RefundStatus::Requested => "requested",
            RefundStatus::Approved => "approved",
            RefundStatus::Rejected => "rejected",
            RefundStatus::Refunded => "refunded",
            RefundStatus::Unknown => "unknown",
        };
        f.write_str(s)
    }
}
