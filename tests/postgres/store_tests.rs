//! Offline store operations against the real schema.

use crate::postgres::helpers::{PgTestContext, pg};
use pigeonhole::offline::error::OfflineStoreError;
use pigeonhole::offline::ports::OfflineStorage;
use pigeonhole::stanza::{Jid, Message, StanzaError};
use rstest::rstest;

fn chat(id: &str, body: &str) -> Message {
    let to: Jid = "ortuman@jackal.im/balcony".parse().expect("valid JID");
    Message::builder()
        .id(id)
        .to(to)
        .message_type("chat")
        .body(body)
        .build()
}

#[rstest]
fn insert_count_fetch_delete_cycle(pg: Option<PgTestContext>) {
    let Some(context) = pg else { return };
    let message = chat("m1", "see you soon");

    context
        .block_on(context.store.insert_offline_message(&message, "ortuman"))
        .expect("insert should succeed");
    assert_eq!(
        context.block_on(context.store.count_offline_messages("ortuman")),
        Ok(1)
    );
    assert_eq!(
        context.block_on(context.store.fetch_offline_messages("ortuman")),
        Ok(vec![message])
    );

    context
        .block_on(context.store.delete_offline_messages("ortuman"))
        .expect("delete should succeed");
    assert_eq!(
        context.block_on(context.store.count_offline_messages("ortuman")),
        Ok(0)
    );
}

#[rstest]
fn fetch_returns_insertion_order(pg: Option<PgTestContext>) {
    let Some(context) = pg else { return };
    let messages: Vec<Message> = (1..=5)
        .map(|n| chat(&format!("m{n}"), &format!("body {n}")))
        .collect();
    for message in &messages {
        context
            .block_on(context.store.insert_offline_message(message, "ortuman"))
            .expect("insert should succeed");
    }

    let fetched = context
        .block_on(context.store.fetch_offline_messages("ortuman"))
        .expect("fetch should succeed");

    assert_eq!(fetched, messages);
}

#[rstest]
fn unknown_recipient_has_empty_queue(pg: Option<PgTestContext>) {
    let Some(context) = pg else { return };

    assert_eq!(
        context.block_on(context.store.count_offline_messages("nobody")),
        Ok(0)
    );
    assert_eq!(
        context.block_on(context.store.fetch_offline_messages("nobody")),
        Ok(Vec::new())
    );
    assert_eq!(
        context.block_on(context.store.delete_offline_messages("nobody")),
        Ok(())
    );
}

#[rstest]
fn delete_leaves_other_recipients_alone(pg: Option<PgTestContext>) {
    let Some(context) = pg else { return };
    for recipient in ["alice", "bob"] {
        context
            .block_on(
                context
                    .store
                    .insert_offline_message(&chat("m", "hello"), recipient),
            )
            .expect("insert should succeed");
    }

    context
        .block_on(context.store.delete_offline_messages("alice"))
        .expect("delete should succeed");

    assert_eq!(
        context.block_on(context.store.count_offline_messages("bob")),
        Ok(1)
    );
}

#[rstest]
fn stored_payload_decodes_and_truncated_payload_fails(pg: Option<PgTestContext>) {
    let Some(context) = pg else { return };
    context
        .insert_raw("ortuman", "<message id='abc'><body>Hi!</body></message>")
        .expect("seed");

    let fetched = context
        .block_on(context.store.fetch_offline_messages("ortuman"))
        .expect("stored payload should decode");
    assert_eq!(fetched.first().and_then(Message::id), Some("abc"));
    assert_eq!(
        fetched.first().and_then(Message::body),
        Some("Hi!".to_owned())
    );

    context
        .insert_raw("ortuman", "<message id='abc'><body>Hi!")
        .expect("seed");
    assert_eq!(
        context.block_on(context.store.fetch_offline_messages("ortuman")),
        Err(OfflineStoreError::Deserialization {
            recipient: "ortuman".to_owned(),
            index: 1,
            source: StanzaError::UnterminatedElement("body".to_owned()),
        })
    );
    assert_eq!(
        context.block_on(context.store.count_offline_messages("ortuman")),
        Ok(2)
    );
}
