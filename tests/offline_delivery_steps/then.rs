//! Then steps for offline delivery BDD scenarios.

use super::world::{OfflineDeliveryWorld, run_async};
use pigeonhole::offline::{
    error::{DeliveryError, OfflineStoreError},
    services::{ArchiveOutcome, DELAY_NAMESPACE},
};
use pigeonhole::stanza::Message;
use rstest_bdd_macros::then;

fn drained(world: &OfflineDeliveryWorld) -> Result<&[Message], eyre::Report> {
    match world.last_drain.as_ref() {
        Some(Ok(messages)) => Ok(messages),
        Some(Err(err)) => Err(eyre::eyre!("drain failed: {err}")),
        None => Err(eyre::eyre!("missing drain result in scenario world")),
    }
}

fn split_expected(list: &str) -> Vec<String> {
    list.split(',').map(|item| item.trim().to_owned()).collect()
}

#[then(r#""{recipient}" has {count:usize} queued messages"#)]
fn queued_count(
    world: &OfflineDeliveryWorld,
    recipient: String,
    count: usize,
) -> Result<(), eyre::Report> {
    let queued = run_async(world.service.queued(&recipient))
        .map_err(|err| eyre::eyre!("count failed: {err}"))?;
    if queued != count {
        return Err(eyre::eyre!(
            "expected {count} queued messages for {recipient}, found {queued}"
        ));
    }
    Ok(())
}

#[then(r#"the drained bodies are "{bodies}""#)]
fn drained_bodies(world: &OfflineDeliveryWorld, bodies: String) -> Result<(), eyre::Report> {
    let actual: Vec<String> = drained(world)?
        .iter()
        .map(|message| message.body().unwrap_or_default())
        .collect();
    let expected = split_expected(&bodies);
    if actual != expected {
        return Err(eyre::eyre!("expected bodies {expected:?}, got {actual:?}"));
    }
    Ok(())
}

#[then(r#"the drained message ids are "{ids}""#)]
fn drained_ids(world: &OfflineDeliveryWorld, ids: String) -> Result<(), eyre::Report> {
    let actual: Vec<String> = drained(world)?
        .iter()
        .map(|message| message.id().unwrap_or_default().to_owned())
        .collect();
    let expected = split_expected(&ids);
    if actual != expected {
        return Err(eyre::eyre!("expected ids {expected:?}, got {actual:?}"));
    }
    Ok(())
}

#[then("every drained message carries a delay stamp")]
fn drained_messages_are_stamped(world: &OfflineDeliveryWorld) -> Result<(), eyre::Report> {
    for message in drained(world)? {
        let stamped = message
            .element()
            .child("delay")
            .is_some_and(|delay| {
                delay.attribute("xmlns") == Some(DELAY_NAMESPACE)
                    && delay.attribute("stamp").is_some()
            });
        if !stamped {
            return Err(eyre::eyre!("message without delay stamp: {message}"));
        }
    }
    Ok(())
}

#[then("the last archive fails because the queue is full")]
fn archive_failed_queue_full(world: &OfflineDeliveryWorld) -> Result<(), eyre::Report> {
    let result = world
        .last_archive
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing archive result"))?;
    if !matches!(result, Err(DeliveryError::QueueFull { .. })) {
        return Err(eyre::eyre!("expected QueueFull error, got {result:?}"));
    }
    Ok(())
}

#[then("the last archive was skipped")]
fn archive_skipped(world: &OfflineDeliveryWorld) -> Result<(), eyre::Report> {
    let result = world
        .last_archive
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing archive result"))?;
    if result != &Ok(ArchiveOutcome::NotArchivable) {
        return Err(eyre::eyre!("expected NotArchivable, got {result:?}"));
    }
    Ok(())
}

#[then("the drain fails because payload {index:usize} is malformed")]
fn drain_failed_malformed(world: &OfflineDeliveryWorld, index: usize) -> Result<(), eyre::Report> {
    let result = world
        .last_drain
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing drain result"))?;
    match result {
        Err(DeliveryError::Storage(OfflineStoreError::Deserialization {
            index: failed, ..
        })) if *failed == index => Ok(()),
        other => Err(eyre::eyre!(
            "expected deserialization failure at {index}, got {other:?}"
        )),
    }
}
