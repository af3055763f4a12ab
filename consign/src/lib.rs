pub mod client;
pub mod config;
pub mod error;
pub mod fetch;
pub mod query;
pub mod resource;
pub mod rest;
pub mod types;
pub mod utils;
pub mod view;

// ---- Top-level re-exports for ergonomic usage ----

// Client
pub use client::Consign;
pub use config::ConsignConfig;
pub use error::{ConsignError, FailureKind, Result};

// REST client
pub use rest::ConsignHttpClient;

// Query holder
pub use query::{FilterValue, PageIndex, PageNumber, PageQuery, PageRequest, QueryState};

// Fetch orchestration
pub use fetch::{
    Collection, CollectionSource, FetchState, Pager, PagerConfig, PagerEvent, RequestId,
};

// Render contract
pub use view::{
    header_click, Column, Pagination, SortIndicator, TableIntent, TableProps, ViewState,
};

// Collections
pub use resource::Resource;
pub use types::{
    Account, Auction, Consignment, Order, PageResult, Refund, Shop, Transaction, Withdrawal,
};

// Status enums
pub use types::{
    AccountRole, AccountStatus, AuctionStatus, ConsignmentStatus, OrderStatus, RefundStatus,
    ShopStatus, TransactionKind, WithdrawalStatus,
};
