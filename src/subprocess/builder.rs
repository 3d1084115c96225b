use std::path::Path;
use std::time::Duration;

use crate::subprocess::ProcessCommand;

/// Fluent construction of a [`ProcessCommand`]
pub struct ProcessCommandBuilder(ProcessCommand);

impl ProcessCommandBuilder {
    pub fn new(program: &str) -> Self {
        Self(ProcessCommand {
            program: program.to_string(),
            args: Vec::new(),
            env: Default::default(),
            working_dir: None,
            timeout: None,
        })
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.0
            .args
            .extend(args.into_iter().map(|arg| arg.as_ref().to_string()));
        self
    }

    pub fn env(mut self, key: &str, value: &str) -> Self {
        self.0.env.insert(key.to_string(), value.to_string());
        self
    }

    pub fn current_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.0.working_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Kill the process if it runs longer than `timeout`
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.0.timeout = Some(timeout);
        self
    }

    pub fn build(self) -> ProcessCommand {
        self.0
    }
}
