//! Core library components.
//!
//! This module contains the reusable business logic for process
//! orchestration, archive re-signing, and the encrypted profile store.

pub mod constants;
pub mod crypto;
pub mod keystore;
pub mod listing;
pub mod pipeline;
pub mod progress;
pub mod runner;
pub mod session;
pub mod store;
pub mod tools;
