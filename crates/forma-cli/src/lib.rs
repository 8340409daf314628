//! Library half of the `forma` command-line tool.

pub mod definition;
pub mod logging;

pub use definition::{DefinitionError, FieldDefinition, FormDefinition, LoadedForm, load_values};
