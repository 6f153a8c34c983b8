//! Unit tests for the offline module.
//!
//! Store tests drive [`crate::offline::services::OfflineMessageStore`]
//! against a mocked backend that asserts statement shape and bound
//! parameters; delivery tests run the policy layer over the in-memory
//! adapter.
