//! Core domain + application logic for the keytrack bot.
//!
//! This crate is framework-agnostic. Telegram lives behind the messaging port
//! implemented in `keytrack-telegram`.

pub mod audit;
pub mod catalog;
pub mod config;
pub mod domain;
pub mod errors;
pub mod faults;
pub mod keygen;
pub mod logging;
pub mod messaging;
pub mod redemption;
pub mod shop;
pub mod tracks;

pub use errors::{Error, Result};
