// ClassDesk - ui/panels/mod.rs

pub mod about;
pub mod banner;
pub mod bulk_import;
pub mod classroom_detail;
pub mod connection;
pub mod course_content;
pub mod settings;
pub mod students;
