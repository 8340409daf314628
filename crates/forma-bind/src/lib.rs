//! Binding layer for the forma field store.
//!
//! Owns the live state of each field ([`FieldState`]), registers it with a
//! [`forma_core::FormService`] through [`FormItem`], and turns that state
//! back into props for whatever renders the field.

pub mod error;
pub mod item;
pub mod props;
pub mod rules;
pub mod state;

pub use error::{BindError, Result};
pub use item::{FieldOptions, FormItem};
pub use props::{DEFAULT_VALUE_PROP, ErrorPropsFn, FieldProps, default_error_props, wire_first};
pub use rules::{REQUIRED_MESSAGE, Rule, RuleSpec, run_rules};
pub use state::{FieldState, ValidateFn};
