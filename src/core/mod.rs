// ClassDesk - core/mod.rs
//
// Core business logic layer.
// Dependencies: util only, plus data crates (serde, chrono, csv, calamine).
// Must NOT depend on: ui, api, platform, app.

pub mod banner;
pub mod content;
pub mod export;
pub mod forms;
pub mod import;
pub mod model;
pub mod roster;
pub mod text;
