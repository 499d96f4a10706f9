//! In-flight transaction.

use shared_types::{DataConfirm, NetworkAddress, ZclIncomingMessage};

/// An application data exchange awaiting its confirmation and response.
///
/// Lives only for the duration of one `send`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transaction {
    pub id: u8,
    pub target: NetworkAddress,
}

impl Transaction {
    pub fn new(id: u8, target: NetworkAddress) -> Self {
        Self { id, target }
    }

    /// Delivery confirmations are keyed by transaction id only.
    pub fn is_confirmed_by(&self, confirm: &DataConfirm) -> bool {
        confirm.transaction_id == self.id
    }

    /// Responses must carry our transaction id and come from the target.
    pub fn is_answered_by(&self, message: &ZclIncomingMessage) -> bool {
        message.transaction_id() == self.id && message.src_address == self.target
    }
}
