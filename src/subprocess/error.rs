use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum ProcessError {
    #[error("Command not found: {0}")]
    CommandNotFound(String),

    #[error("`{command}` timed out after {after:?}")]
    Timeout { command: String, after: Duration },

    #[error("I/O error running `{command}`: {source}")]
    Io {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Mock expectation not met: {0}")]
    MockExpectationNotMet(String),
}
