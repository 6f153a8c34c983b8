//! Archive and drain over the `PostgreSQL` store.

use std::sync::Arc;

use crate::postgres::helpers::{PgTestContext, pg};
use mockable::DefaultClock;
use pigeonhole::offline::error::DeliveryError;
use pigeonhole::offline::services::{ArchiveOutcome, OfflineDeliveryService};
use pigeonhole::stanza::{Jid, Message};
use rstest::rstest;

fn chat(body: &str) -> Message {
    let to: Jid = "ortuman@jackal.im".parse().expect("valid JID");
    Message::builder()
        .to(to)
        .message_type("chat")
        .body(body)
        .build()
}

#[rstest]
fn archive_then_drain_releases_stamped_messages(pg: Option<PgTestContext>) {
    let Some(context) = pg else { return };
    let service =
        OfflineDeliveryService::new(Arc::new(context.store.clone()), Arc::new(DefaultClock), 10);

    for body in ["one", "two"] {
        let outcome = context
            .block_on(service.archive(&chat(body), "ortuman"))
            .expect("archive should succeed");
        assert_eq!(outcome, ArchiveOutcome::Archived);
    }

    let drained = context
        .block_on(service.drain("ortuman"))
        .expect("drain should succeed");

    let bodies: Vec<Option<String>> = drained.iter().map(Message::body).collect();
    assert_eq!(bodies, vec![Some("one".to_owned()), Some("two".to_owned())]);
    assert!(
        drained
            .iter()
            .all(|message| message.element().child("delay").is_some())
    );
    assert_eq!(context.block_on(service.queued("ortuman")), Ok(0));
}

#[rstest]
fn archive_enforces_queue_size(pg: Option<PgTestContext>) {
    let Some(context) = pg else { return };
    let service =
        OfflineDeliveryService::new(Arc::new(context.store.clone()), Arc::new(DefaultClock), 1);

    context
        .block_on(service.archive(&chat("first"), "ortuman"))
        .expect("archive should succeed");
    let result = context.block_on(service.archive(&chat("second"), "ortuman"));

    assert!(matches!(
        result,
        Err(DeliveryError::QueueFull { limit: 1, .. })
    ));
}
