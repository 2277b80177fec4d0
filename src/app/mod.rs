// ClassDesk - app/mod.rs
//
// Application layer: state, background requests, refresh timing, session.
// Dependencies: core, api, platform, util.
// Must NOT depend on: ui.

pub mod refresh;
pub mod requests;
pub mod session;
pub mod state;
