//! Order lifecycle vocabulary: coarse statuses, processing sub-statuses and
//! the transition rules between them.

use strum::{Display, EnumIter, EnumString};

/// Coarse lifecycle label for an order.
///
/// The string forms are the wire and database representation, so the strum
/// serializations here are load-bearing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
pub enum OrderStatus {
    #[strum(serialize = "Pending")]
    Pending,
    #[strum(serialize = "Processing")]
    Processing,
    #[strum(serialize = "For Delivery")]
    ForDelivery,
    #[strum(serialize = "Completed")]
    Completed,
    #[strum(serialize = "Rejected")]
    Rejected,
}

impl OrderStatus {
    /// Whether appending `next` after `self` is a legal transition.
    ///
    /// Re-asserting the current status is always legal: the status log is
    /// append-only and deliberately non-idempotent, so a repeated call must
    /// land a fresh history row rather than be rejected.
    pub fn can_transition_to(self, next: OrderStatus) -> bool {
        use OrderStatus::*;
        if self == next {
            return true;
        }
        matches!(
            (self, next),
            (Pending, Processing)
                | (Pending, Rejected)
                | (Processing, ForDelivery)
                | (ForDelivery, Completed)
        )
    }

    /// Terminal statuses accept no further transitions except self-appends.
    pub fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Completed | OrderStatus::Rejected)
    }
}

/// Finer-grained processing milestone within the `Processing` status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
pub enum ProcessingStep {
    #[strum(serialize = "Washed")]
    Washed,
    #[strum(serialize = "Steam Pressed/Ironed")]
    SteamPressed,
    #[strum(serialize = "Folded")]
    Folded,
    #[strum(serialize = "Out for Delivery")]
    OutForDelivery,
}

impl ProcessingStep {
    /// The step that must already be the latest recorded step before this
    /// one may be appended. `Washed` opens the trail.
    pub fn predecessor(self) -> Option<ProcessingStep> {
        use ProcessingStep::*;
        match self {
            Washed => None,
            SteamPressed => Some(Washed),
            Folded => Some(SteamPressed),
            OutForDelivery => Some(Folded),
        }
    }

    /// Whether this step may be appended when `latest` is the most recent
    /// recorded step. Re-recording the latest step is allowed.
    pub fn may_follow(self, latest: Option<ProcessingStep>) -> bool {
        if latest == Some(self) {
            return true;
        }
        self.predecessor() == latest
    }
}
