// Plan document I/O

pub mod csv;
pub mod document;
pub mod seed;

/// Plan document format version
/// Increment when the schema changes in a way that old versions can't read
pub const PLAN_FORMAT_VERSION: u32 = 1;
