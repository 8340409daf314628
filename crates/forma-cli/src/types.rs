use forma_core::SubmitOutcome;
use forma_model::{FieldPath, Value};

#[derive(Debug)]
pub struct FieldRow {
    pub path: FieldPath,
    pub default: Option<Value>,
    pub initial: Value,
    pub value_prop_name: String,
    pub rules: usize,
}

#[derive(Debug)]
pub struct SubmitReport {
    pub form: String,
    pub applied: usize,
    pub outcome: SubmitOutcome,
    pub errors: Vec<(FieldPath, Vec<String>)>,
}

impl SubmitReport {
    pub fn is_rejected(&self) -> bool {
        !self.outcome.is_submitted()
    }
}

#[derive(Debug)]
pub struct ResetReport {
    pub form: String,
    pub applied: usize,
    pub values: Vec<(FieldPath, Value)>,
}
