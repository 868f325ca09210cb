//! Integration tests for the session catalog.

#[path = "../support/mod.rs"]
mod support;

#[cfg(feature = "emitter")]
mod events;
mod scenarios;
