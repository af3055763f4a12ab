pub mod account;
pub mod auction;
pub mod consignment;
pub mod enums;
pub mod order;
pub mod page;
pub mod refund;
pub mod shop;
pub mod transaction;
pub mod withdrawal;

pub use account::Account;
pub use auction::Auction;
pub use consignment::Consignment;
pub use enums::*;
pub use order::Order;
pub use page::{normalize_page, total_pages_for, PageResult};
pub use refund::Refund;
pub use shop::Shop;
pub use transaction::Transaction;
pub use withdrawal::Withdrawal;
