//! Given steps for offline delivery BDD scenarios.

use super::world::OfflineDeliveryWorld;
use eyre::WrapErr;
use rstest_bdd_macros::given;

#[given("an offline queue holding at most {limit:usize} messages per recipient")]
fn queue_with_limit(world: &mut OfflineDeliveryWorld, limit: usize) {
    world.limit_queue(limit);
}

#[given("an offline queue with the default capacity")]
fn queue_with_default_capacity(world: &mut OfflineDeliveryWorld) {
    let _ = world;
}

#[given(r#"the stored payload "{payload}" for "{recipient}""#)]
fn stored_payload(
    world: &mut OfflineDeliveryWorld,
    payload: String,
    recipient: String,
) -> Result<(), eyre::Report> {
    world
        .storage
        .insert_raw(recipient, payload)
        .wrap_err("seed stored payload")
}
