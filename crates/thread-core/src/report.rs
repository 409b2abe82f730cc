use crate::error::ThreadError;

/// Hook for failures on paths that must not abort the page
pub trait FailureReporter {
    fn report(&self, failure: &ThreadError);
}

/// Reports failures as `tracing` warnings
#[derive(Debug, Default, Clone, Copy)]
pub struct LogReporter;

impl FailureReporter for LogReporter {
    fn report(&self, failure: &ThreadError) {
        tracing::warn!(error = %failure, "comment thread failure");
    }
}
