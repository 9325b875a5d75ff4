//! Per-call message reporting.

/// Receives user-visible messages produced while importing credentials.
pub trait MessageReporter {
    fn add_error_message(&mut self, message: String);
}

/// Collects error messages for one import call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageCollection {
    errors: Vec<String>,
}

impl MessageCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn into_errors(self) -> Vec<String> {
        self.errors
    }
}

impl MessageReporter for MessageCollection {
    fn add_error_message(&mut self, message: String) {
        self.errors.push(message);
    }
}
