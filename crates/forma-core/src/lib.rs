//! Field store and submit/reset/validate/subscribe protocol for forms.
//!
//! A [`FormService`] owns one form's [`FieldStore`] and [`SubscriptionBus`].
//! Fields register by path and hand the store a [`FieldBinding`]; the service
//! never holds field state of its own, it only calls those capabilities.

pub mod bus;
pub mod config;
pub mod error;
pub mod event;
pub mod service;
pub mod store;

pub use bus::{Observer, SubscriptionBus};
pub use config::{FormConfig, InitialValuePolicy};
pub use error::{BoxError, FormError, Result};
pub use event::{FormEvent, HostEvent};
pub use service::{FormService, FormServiceBuilder, SubmitCallback, SubmitOutcome};
pub use store::{FieldBinding, FieldRecord, FieldStore, ItemRef};

pub use forma_model::{FieldPath, Segment, Value};
