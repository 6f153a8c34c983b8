//! Offline message services.

mod delivery;
mod store;

pub use delivery::{ArchiveOutcome, DELAY_NAMESPACE, DeliveryResult, OfflineDeliveryService};
pub use store::OfflineMessageStore;

#[cfg(test)]
pub(crate) use store::{
    COUNT_OFFLINE_MESSAGES, DELETE_OFFLINE_MESSAGES, FETCH_OFFLINE_MESSAGES,
    INSERT_OFFLINE_MESSAGE,
};
