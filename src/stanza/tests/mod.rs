//! Unit tests for the stanza module.
