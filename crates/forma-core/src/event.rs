/// The host event that triggered a submit or reset.
pub trait HostEvent {
    /// Suppress the host's default action (e.g. a page navigation).
    fn prevent_default(&mut self);
}

/// A host event that only records whether its default was prevented.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FormEvent {
    default_prevented: bool,
}

impl FormEvent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }
}

impl HostEvent for FormEvent {
    fn prevent_default(&mut self) {
        self.default_prevented = true;
    }
}
