use std::sync::{Mutex, MutexGuard};
use tracing::warn;

/// Run-scoped diagnostics context.
///
/// Created once per run and handed by reference to the components that may downgrade a
/// defect to a warning, a recoverable problem after which processing goes on with a default.
/// Every warning is logged through `tracing` and kept for an end-of-run summary.
#[derive(Debug, Default)]
pub struct Diagnostics {
    warnings: Mutex<Vec<String>>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn warn(&self, message: impl Into<String>) {
        let message = message.into();
        warn!("{}", message);
        self.lock().push(message);
    }

    /// The end-of-run summary: a count line followed by one line per warning, or `None` if
    /// the run was clean.
    pub fn summary(&self) -> Option<String> {
        let warnings = self.lock();
        if warnings.is_empty() {
            return None;
        }
        let mut summary = format!("{} warning(s) during this run:", warnings.len());
        for warning in warnings.iter() {
            summary.push_str("\n  - ");
            summary.push_str(warning);
        }
        Some(summary)
    }

    /// Returns a copy of the warnings recorded so far, oldest first.
    pub fn warnings(&self) -> Vec<String> {
        self.lock().clone()
    }

    pub fn warning_count(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<String>> {
        self.warnings
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_context_has_no_warnings() {
        let diagnostics = Diagnostics::new();
        assert_eq!(diagnostics.warning_count(), 0);
        assert!(diagnostics.warnings().is_empty());
    }

    #[test]
    fn warnings_are_recorded_in_order() {
        let diagnostics = Diagnostics::new();
        diagnostics.warn("first");
        diagnostics.warn(String::from("second"));
        assert_eq!(diagnostics.warnings(), vec!["first", "second"]);
        assert_eq!(diagnostics.warning_count(), 2);
    }

    #[test]
    fn summary_lists_every_warning() {
        let diagnostics = Diagnostics::new();
        assert_eq!(diagnostics.summary(), None);

        diagnostics.warn("no MolID on line 2");
        diagnostics.warn("no MolID on line 5");
        assert_eq!(
            diagnostics.summary().unwrap(),
            "2 warning(s) during this run:\n  - no MolID on line 2\n  - no MolID on line 5"
        );
    }

    #[test]
    fn context_can_be_shared_across_threads() {
        let diagnostics = Diagnostics::new();
        std::thread::scope(|s| {
            for i in 0..4 {
                let d = &diagnostics;
                s.spawn(move || d.warn(format!("thread {i}")));
            }
        });
        assert_eq!(diagnostics.warning_count(), 4);
    }
}
