//! Raw statement and row decoding tests for the `PostgreSQL` backend.

use crate::postgres::helpers::{
    CREATE_OFFLINE_MESSAGES_SQL, DROP_OFFLINE_MESSAGES_SQL, PgTestContext, pg,
};
use diesel::connection::SimpleConnection;
use pigeonhole::config::StoreSettings;
use pigeonhole::offline::adapters::postgres::PgSqlBackend;
use pigeonhole::offline::ports::{BackendError, SqlBackend, SqlRow, SqlValue};
use rstest::rstest;

#[rstest]
fn query_decodes_text_integer_and_null_columns(pg: Option<PgTestContext>) {
    let Some(context) = pg else { return };

    let rows = context
        .block_on(context.backend.query(
            "SELECT $1::text AS word, 7::int4 AS small, 9000000000::int8 AS big, \
             NULL::text AS nothing",
            &[SqlValue::from("hello")],
        ))
        .expect("query should succeed");

    let expected = SqlRow::new()
        .with_column("word", "hello")
        .with_column("small", 7_i64)
        .with_column("big", 9_000_000_000_i64)
        .with_column("nothing", SqlValue::Null);
    assert_eq!(rows, vec![expected]);
}

#[rstest]
fn execute_reports_affected_rows(pg: Option<PgTestContext>) {
    let Some(context) = pg else { return };
    context.insert_raw("ortuman", "<message/>").expect("seed");
    context.insert_raw("ortuman", "<message/>").expect("seed");

    let affected = context
        .block_on(context.backend.execute(
            "DELETE FROM offline_messages WHERE username = $1",
            &[SqlValue::from("ortuman")],
        ))
        .expect("delete should succeed");

    assert_eq!(affected, 2);
}

#[rstest]
fn unsupported_column_type_is_a_query_error(pg: Option<PgTestContext>) {
    let Some(context) = pg else { return };

    let result = context.block_on(context.backend.query("SELECT NOW() AS stamp", &[]));

    assert!(matches!(result, Err(BackendError::Query(_))));
}

#[rstest]
fn malformed_statement_is_an_execution_error(pg: Option<PgTestContext>) {
    let Some(context) = pg else { return };

    let result = context.block_on(context.backend.execute("DELETE FROM", &[]));

    assert!(matches!(result, Err(BackendError::Execution(_))));
}

#[rstest]
fn migration_reverts_and_reapplies(pg: Option<PgTestContext>) {
    let Some(context) = pg else { return };
    let mut conn = context.backend.pool().get().expect("pooled connection");

    conn.batch_execute(DROP_OFFLINE_MESSAGES_SQL)
        .expect("down migration");
    let missing = context.block_on(
        context
            .backend
            .query("SELECT COUNT(*) FROM offline_messages", &[]),
    );
    assert!(matches!(missing, Err(BackendError::Query(_))));

    conn.batch_execute(CREATE_OFFLINE_MESSAGES_SQL)
        .expect("up migration");
    let rows = context
        .block_on(
            context
                .backend
                .query("SELECT COUNT(*) FROM offline_messages", &[]),
        )
        .expect("table should exist again");
    assert_eq!(rows, vec![SqlRow::new().with_column("count", 0_i64)]);
}

#[test]
fn unreachable_server_is_a_connection_error() {
    let settings = StoreSettings {
        database_url: "postgres://pigeonhole@127.0.0.1:1/unreachable".to_owned(),
        max_connections: 1,
        connection_timeout_secs: 1,
        offline_queue_size: 10,
    };

    let result = PgSqlBackend::connect(&settings);

    assert!(matches!(result, Err(BackendError::Connection(_))));
}
