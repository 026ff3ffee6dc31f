//! Schema registry: field-rule tables and display metadata for form records.

mod incident;
mod options;
mod registry;
mod rules;

pub use incident::*;
pub use options::*;
pub use registry::*;
pub use rules::*;
