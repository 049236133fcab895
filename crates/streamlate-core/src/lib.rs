//! # streamlate-core
//!
//! Core types, traits, configuration, and error handling for the
//! Streamlate chat translation bot.

pub mod config;
pub mod error;
pub mod keywords;
pub mod message;
pub mod profile;
pub mod traits;
