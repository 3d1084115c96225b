//! User-facing narration
//!
//! Flow steps are narrated through [`ProgressDisplay`] rather than the
//! logger, so the console output stays readable at any log level and tests
//! can assert on exactly what a user would have been told.

use std::sync::{Arc, Mutex};

/// Trait for displaying progress and messages
pub trait ProgressDisplay: Send + Sync {
    /// Display information message
    fn info(&self, message: &str);

    /// Display warning message
    fn warning(&self, message: &str);

    /// Display error message
    fn error(&self, message: &str);

    /// Display progress message
    fn progress(&self, message: &str);

    /// Display success message
    fn success(&self, message: &str);

    /// Display a preformatted block (a pre-flight report, a listing)
    fn block(&self, text: &str);
}

/// Console implementation: progress on stdout, problems on stderr
pub struct ConsoleDisplay;

impl Default for ConsoleDisplay {
    fn default() -> Self {
        Self::new()
    }
}

impl ConsoleDisplay {
    pub fn new() -> Self {
        Self
    }
}

impl ProgressDisplay for ConsoleDisplay {
    fn info(&self, message: &str) {
        println!("ℹ️  {message}");
    }

    fn warning(&self, message: &str) {
        eprintln!("⚠️  {message}");
    }

    fn error(&self, message: &str) {
        eprintln!("❌ {message}");
    }

    fn progress(&self, message: &str) {
        println!("🔄 {message}");
    }

    fn success(&self, message: &str) {
        println!("✅ {message}");
    }

    fn block(&self, text: &str) {
        print!("{text}");
        if !text.ends_with('\n') {
            println!();
        }
    }
}

/// Captures narration in memory, tagged by level
#[derive(Clone, Default)]
pub struct RecordingDisplay {
    messages: Arc<Mutex<Vec<String>>>,
}

impl RecordingDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<String> {
        self.lock().clone()
    }

    /// Whether any recorded line contains `needle`
    pub fn contains(&self, needle: &str) -> bool {
        self.lock().iter().any(|m| m.contains(needle))
    }

    fn push(&self, level: &str, message: &str) {
        self.lock().push(format!("{level}: {message}"));
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<String>> {
        self.messages.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl ProgressDisplay for RecordingDisplay {
    fn info(&self, message: &str) {
        self.push("INFO", message);
    }

    fn warning(&self, message: &str) {
        self.push("WARN", message);
    }

    fn error(&self, message: &str) {
        self.push("ERROR", message);
    }

    fn progress(&self, message: &str) {
        self.push("PROGRESS", message);
    }

    fn success(&self, message: &str) {
        self.push("SUCCESS", message);
    }

    fn block(&self, text: &str) {
        self.push("BLOCK", text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_display_tags_levels() {
        let display = RecordingDisplay::new();
        display.progress("Merging release/1.0.0 into master");
        display.warning("Branch develop not found");
        display.success("Done");

        assert_eq!(
            display.messages(),
            vec![
                "PROGRESS: Merging release/1.0.0 into master",
                "WARN: Branch develop not found",
                "SUCCESS: Done",
            ]
        );
        assert!(display.contains("develop not found"));
        assert!(!display.contains("ERROR"));
    }

    #[test]
    fn test_recording_display_clones_share_messages() {
        let display = RecordingDisplay::new();
        let shared: Arc<dyn ProgressDisplay> = Arc::new(display.clone());
        shared.error("boom");
        assert_eq!(display.messages(), vec!["ERROR: boom"]);
    }
}
