// src/lib.rs

//! Port announcer library
//!
//! Watches the PortMaster catalog and announces newly added ports to a chat
//! webhook, one per scheduled run, remembering what was already announced.

pub mod config;
pub mod error;
#[cfg(feature = "lambda")]
pub mod lambda;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod storage;
pub mod utils;
