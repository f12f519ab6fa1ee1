//! Core of the botlist bot: inbound event model, identity resolution,
//! callback action codec and handler guards.
//!
//! This crate is framework-agnostic. Telegram lives behind ports (traits)
//! implemented in the adapter crate.

pub mod action;
pub mod config;
pub mod domain;
pub mod errors;
pub mod event;
pub mod formatting;
pub mod group;
pub mod guards;
pub mod identity;
pub mod logging;
pub mod messaging;

#[cfg(test)]
mod testing;

pub use errors::{Error, Result};
