//! Tag bulk import.
//!
//! A sheet goes through four stages: [`reader`] turns the file into raw rows,
//! [`shape`] checks the header, [`transform`] decodes rows into typed tags and
//! [`importer`] submits one batch per group. [`report`] renders the
//! user-facing messages.

pub mod importer;
pub mod reader;
pub mod report;
pub mod shape;
pub mod transform;

pub use importer::{group_rows, GroupSummary, ImportReport, TagImporter};
pub use reader::read_tag_sheet;
pub use shape::check_tag_table;
pub use transform::{decode_row, transform_rows};
