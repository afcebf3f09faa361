//! services/client/src/lib.rs
//!
//! The TradeVision client: the HTTP pipeline, the domain API modules, the
//! session store and the page controllers built on top of them.

pub mod adapters;
pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod http;
pub mod pages;
pub mod session;

#[cfg(test)]
pub(crate) mod testing;
