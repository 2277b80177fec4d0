// ClassDesk - api/mod.rs
//
// Remote layer: the blocking REST client for the classroom server.
// Dependencies: core (records), util.
// Must NOT depend on: ui, app, platform.

pub mod client;

pub use client::{ApiClient, ApiConfig};
