//! Export core modules shared by the CLI wrappers.

pub mod report_core;

#[cfg(feature = "excel")]
pub mod excel_core;
