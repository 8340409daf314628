pub mod error;
pub mod path;
pub mod value;

pub use error::{ModelError, Result};
pub use path::{FieldPath, MAX_INDEX, Segment};
pub use value::{Value, get_at_path, is_truthy, same_value, set_at_path};
