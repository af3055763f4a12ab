//! Row actions: state-changing calls against a single record.
//!
//! A failed action never reloads the table; the caller reports the error
//! and leaves the current page as it was.

use consign::{
    Account, Auction, AuctionStatus, Consign, Consignment, Order, Refund, Resource, Shop,
    ShopStatus, Transaction, Withdrawal,
};

use crate::notify::{Notifier, NotifyKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    ApproveWithdrawal,
    RejectWithdrawal,
    ApproveRefund,
    RejectRefund,
    SuspendShop,
    ReactivateShop,
    CancelAuction,
}

impl Action {
    pub fn needs_reason(self) -> bool {
        matches!(
            self,
            Action::RejectWithdrawal | Action::RejectRefund | Action::CancelAuction
        )
    }

    /// Past-tense description for notifications.
    pub fn done(self) -> &'static str {
        match self {
            Action::ApproveWithdrawal => "approved withdrawal",
            Action::RejectWithdrawal => "rejected withdrawal",
            Action::ApproveRefund => "approved refund",
            Action::RejectRefund => "rejected refund",
            Action::SuspendShop => "suspended shop",
            Action::ReactivateShop => "reactivated shop",
            Action::CancelAuction => "cancelled auction",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Action::ApproveWithdrawal => "approve withdrawal",
            Action::RejectWithdrawal => "reject withdrawal",
            Action::ApproveRefund => "approve refund",
            Action::RejectRefund => "reject refund",
            Action::SuspendShop => "suspend shop",
            Action::ReactivateShop => "reactivate shop",
            Action::CancelAuction => "cancel auction",
        }
    }

    pub async fn perform(self, consign: &Consign, id: u64, reason: &str) -> consign::Result<()> {
        match self {
            Action::ApproveWithdrawal => consign.approve_withdrawal(id).await,
            Action::RejectWithdrawal => consign.reject_withdrawal(id, reason).await,
            Action::ApproveRefund => consign.approve_refund(id).await,
            Action::RejectRefund => consign.reject_refund(id, reason).await,
            Action::SuspendShop => consign.suspend_shop(id).await,
            Action::ReactivateShop => consign.reactivate_shop(id).await,
            Action::CancelAuction => consign.cancel_auction(id, reason).await,
        }
    }
}

/// Run an action and report the outcome. Returns whether it succeeded.
pub async fn run_action(
    consign: &Consign,
    action: Action,
    id: u64,
    reason: &str,
    notifier: &mut impl Notifier,
) -> bool {
    let result = action.perform(consign, id, reason).await;
    report(action, id, &result, notifier)
}

/// Notify the outcome of a finished action. Returns whether it succeeded.
pub fn report(
    action: Action,
    id: u64,
    result: &consign::Result<()>,
    notifier: &mut impl Notifier,
) -> bool {
    match result {
        Ok(()) => {
            notifier.notify(NotifyKind::Success, &format!("{} {id}", action.done()));
            true
        }
        Err(e) => {
            notifier.notify(
                NotifyKind::Error,
                &format!("could not {} {id}: {}", action.label(), e.reason()),
            );
            false
        }
    }
}

// ---------------------------------------------------------------------------
// Per-collection bindings
// ---------------------------------------------------------------------------

/// Row actions a collection offers in the table, with their keys.
pub trait Actionable: Resource {
    const ACTIONS: &'static [(char, Action)] = &[];

    /// Whether the record's current status accepts `action`.
    fn allows(&self, _action: Action) -> bool {
        false
    }
}

impl Actionable for Account {}
impl Actionable for Consignment {}
impl Actionable for Order {}
impl Actionable for Transaction {}

impl Actionable for Withdrawal {
    const ACTIONS: &'static [(char, Action)] =
        &[('a', Action::ApproveWithdrawal), ('x', Action::RejectWithdrawal)];

    fn allows(&self, action: Action) -> bool {
        matches!(action, Action::ApproveWithdrawal | Action::RejectWithdrawal)
            && self.status.is_actionable()
    }
}

impl Actionable for Refund {
    const ACTIONS: &'static [(char, Action)] =
        &[('a', Action::ApproveRefund), ('x', Action::RejectRefund)];

    fn allows(&self, action: Action) -> bool {
        matches!(action, Action::ApproveRefund | Action::RejectRefund) && self.status.is_actionable()
    }
}

impl Actionable for Shop {
    const ACTIONS: &'static [(char, Action)] =
        &[('u', Action::SuspendShop), ('v', Action::ReactivateShop)];

    fn allows(&self, action: Action) -> bool {
        match action {
            Action::SuspendShop => self.status == ShopStatus::Active,
            Action::ReactivateShop => self.status == ShopStatus::Suspended,
            _ => false,
        }
    }
}

impl Actionable for Auction {
    const ACTIONS: &'static [(char, Action)] = &[('x', Action::CancelAuction)];

    fn allows(&self, action: Action) -> bool {
        action == Action::CancelAuction
            && matches!(self.status, AuctionStatus::Scheduled | AuctionStatus::Live)
    }
}

/// The action bound to `key` for this collection, if any.
pub fn action_for_key<R: Actionable>(key: char) -> Option<Action> {
    R::ACTIONS
        .iter()
        .find(|(bound, _)| *bound == key)
        .map(|(_, action)| *action)
}
