//! One-shot HTTP stub backend for client integration tests.

pub mod stub;
