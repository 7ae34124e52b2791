//! SentryCam library.
//!
//! Exposes the domain core, the adapters and the drivers so the binary and
//! the host-side integration tests share one implementation.

#![deny(unused_must_use)]

pub mod app;
pub mod config;
pub mod error;
pub mod fsm;
pub mod retry;
pub mod window;

pub mod adapters;
pub mod drivers;
pub mod sensors;
