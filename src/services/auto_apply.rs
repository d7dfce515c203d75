use crate::models::activity::{ActivityItem, ItemStatus, UserAction};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutoApplyAction {
    /// Approve without waiting for the user; retirement follows the normal
    /// settle delay.
    AutoApprove,
    ManualReview,
}

/// Decide whether a freshly completed item skips manual review. Only the
/// combination of both flags bypasses the user, and only for an item that
/// just completed and has not been reviewed yet.
pub fn decide(auto_move: bool, auto_rename: bool, item: &ActivityItem) -> AutoApplyAction {
    if auto_move
        && auto_rename
        && item.status == ItemStatus::Completed
        && item.user_action == UserAction::Pending
    {
        AutoApplyAction::AutoApprove
    } else {
        AutoApplyAction::ManualReview
    }
}
