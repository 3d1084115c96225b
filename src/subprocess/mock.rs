use async_trait::async_trait;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use super::error::ProcessError;
use super::runner::{ExitStatus, ProcessCommand, ProcessOutput, ProcessRunner};

type ArgsMatcher = Box<dyn Fn(&[String]) -> bool + Send + Sync>;

/// Scripted process runner for unit tests.
///
/// Each call is answered by the first registered script whose program and
/// argument matcher accept it and that still has uses left. Scripts limited
/// with [`ScriptedCommand::times`] let a test queue a sequence of answers for
/// the same program.
#[derive(Clone, Default)]
pub struct MockProcessRunner {
    state: Arc<Mutex<MockState>>,
}

#[derive(Default)]
struct MockState {
    scripts: Vec<Script>,
    calls: Vec<ProcessCommand>,
}

struct Script {
    program: String,
    matcher: Option<ArgsMatcher>,
    answer: Answer,
    remaining: Option<usize>,
}

#[derive(Clone)]
enum Answer {
    Output(ProcessOutput),
    NotFound,
}

impl Script {
    fn accepts(&self, command: &ProcessCommand) -> bool {
        self.program == command.program
            && self.remaining != Some(0)
            && self
                .matcher
                .as_ref()
                .map_or(true, |matcher| matcher(&command.args))
    }
}

/// A script under construction; registered by [`ScriptedCommand::finish`]
pub struct ScriptedCommand {
    runner: MockProcessRunner,
    script: Script,
}

impl MockProcessRunner {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        // A panicking test poisons the lock; the data is still usable
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Start scripting the answer for `program`; succeeds silently by default
    pub fn expect_command(&self, program: &str) -> ScriptedCommand {
        ScriptedCommand {
            runner: self.clone(),
            script: Script {
                program: program.to_string(),
                matcher: None,
                answer: Answer::Output(ProcessOutput {
                    status: ExitStatus::Success,
                    stdout: String::new(),
                    stderr: String::new(),
                    duration: Duration::ZERO,
                }),
                remaining: None,
            },
        }
    }

    /// Every command run so far, in order
    pub fn calls(&self) -> Vec<ProcessCommand> {
        self.state().calls.clone()
    }

    /// Argument vectors of every call, in order
    pub fn called_args(&self) -> Vec<Vec<String>> {
        self.calls().into_iter().map(|cmd| cmd.args).collect()
    }
}

#[async_trait]
impl ProcessRunner for MockProcessRunner {
    async fn run(&self, command: ProcessCommand) -> Result<ProcessOutput, ProcessError> {
        let mut state = self.state();
        state.calls.push(command.clone());

        let Some(script) = state.scripts.iter_mut().find(|s| s.accepts(&command)) else {
            return Err(ProcessError::MockExpectationNotMet(format!(
                "nothing scripted for `{command}`"
            )));
        };
        if let Some(remaining) = script.remaining.as_mut() {
            *remaining -= 1;
        }

        match &script.answer {
            Answer::Output(output) => Ok(output.clone()),
            Answer::NotFound => Err(ProcessError::CommandNotFound(command.program)),
        }
    }
}

impl ScriptedCommand {
    pub fn with_args<F>(mut self, matcher: F) -> Self
    where
        F: Fn(&[String]) -> bool + Send + Sync + 'static,
    {
        self.script.matcher = Some(Box::new(matcher));
        self
    }

    fn output_mut(&mut self) -> Option<&mut ProcessOutput> {
        match &mut self.script.answer {
            Answer::Output(output) => Some(output),
            Answer::NotFound => None,
        }
    }

    pub fn returns_stdout(mut self, stdout: &str) -> Self {
        if let Some(output) = self.output_mut() {
            output.stdout = stdout.to_string();
        }
        self
    }

    pub fn returns_stderr(mut self, stderr: &str) -> Self {
        if let Some(output) = self.output_mut() {
            output.stderr = stderr.to_string();
        }
        self
    }

    pub fn returns_exit_code(mut self, code: i32) -> Self {
        if let Some(output) = self.output_mut() {
            output.status = ExitStatus::from_code(code);
        }
        self
    }

    pub fn returns_success(self) -> Self {
        self.returns_exit_code(0)
    }

    /// Simulate the program being absent from PATH
    pub fn returns_not_found(mut self) -> Self {
        self.script.answer = Answer::NotFound;
        self
    }

    /// Answer at most `n` calls
    pub fn times(mut self, n: usize) -> Self {
        self.script.remaining = Some(n);
        self
    }

    pub fn finish(self) {
        let ScriptedCommand { runner, script } = self;
        runner.state().scripts.push(script);
    }
}
