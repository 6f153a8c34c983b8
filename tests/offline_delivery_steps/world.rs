//! Shared world state for offline delivery BDD scenarios.

use std::sync::Arc;

use mockable::DefaultClock;
use pigeonhole::config::StoreSettings;
use pigeonhole::offline::{
    adapters::memory::InMemoryOfflineStorage,
    services::{ArchiveOutcome, DeliveryResult, OfflineDeliveryService},
};
use pigeonhole::stanza::Message;
use rstest::fixture;

/// Service type used by the BDD world.
pub type TestDeliveryService = OfflineDeliveryService<InMemoryOfflineStorage, DefaultClock>;

/// Scenario world for offline delivery behaviour tests.
pub struct OfflineDeliveryWorld {
    pub storage: Arc<InMemoryOfflineStorage>,
    pub service: TestDeliveryService,
    pub last_archive: Option<DeliveryResult<ArchiveOutcome>>,
    pub last_drain: Option<DeliveryResult<Vec<Message>>>,
}

impl OfflineDeliveryWorld {
    /// Creates a world with an empty queue of the default capacity.
    #[must_use]
    pub fn new() -> Self {
        let storage = Arc::new(InMemoryOfflineStorage::new());
        let service = build_service(&storage, StoreSettings::default().offline_queue_size);
        Self {
            storage,
            service,
            last_archive: None,
            last_drain: None,
        }
    }

    /// Replaces the service with one enforcing `limit` over the same storage.
    pub fn limit_queue(&mut self, limit: usize) {
        self.service = build_service(&self.storage, limit);
    }
}

impl Default for OfflineDeliveryWorld {
    fn default() -> Self {
        Self::new()
    }
}

fn build_service(storage: &Arc<InMemoryOfflineStorage>, limit: usize) -> TestDeliveryService {
    OfflineDeliveryService::new(Arc::clone(storage), Arc::new(DefaultClock), limit)
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> OfflineDeliveryWorld {
    OfflineDeliveryWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
