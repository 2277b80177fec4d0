// ClassDesk - platform/mod.rs
//
// Platform abstraction layer: directories, config.toml, desktop integration.
// Dependencies: util, directories crate; api only for base URL validation.
// Must NOT depend on: app, ui.

pub mod config;
pub mod fs;
