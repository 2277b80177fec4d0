// ClassDesk - ui/mod.rs
//
// UI layer: presentation only.
// Dependencies: app (state), core (read-only models), egui.
// Must NOT depend on: platform, api. File dialogs are the only local I/O.

pub mod panels;
pub mod theme;
