//! Shared helpers for the integration tests: universe fixtures and an in-memory unit sink.
//! Included by each test file with `mod common;`.
#![allow(dead_code)]

pub mod fixtures;
pub mod mock;
