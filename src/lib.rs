//! linkhop - a small URL shortener
//!
//! A short code resolves to a `307 Temporary Redirect`; every successful
//! resolution bumps the link's click counter on a best-effort basis.
//!
//! # Architecture
//! - `storage`: `LinkStore` trait with SeaORM and in-memory backends
//! - `services`: resolution path (resolver, recorder, dispatcher) and link management
//! - `api`: HTTP handlers and middleware
//! - `config`: Configuration management
//! - `runtime`: Application lifecycle and execution modes
//! - `system`: Logging setup

pub mod api;
pub mod cli;
pub mod config;
pub mod errors;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod system;
pub mod utils;
