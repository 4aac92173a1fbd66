//! Running the layout engine.
//!
//! Spawning is behind the [`ProcessRunner`] trait. [`run_check`] wraps any
//! runner with the checks every render needs: a missing executable becomes
//! [`RenderError::ExecutableNotFound`] and a non-zero exit becomes
//! [`RenderError::ProcessFailed`] carrying the captured output.

use std::{
    io::{self, Write},
    path::{Path, PathBuf},
    process::{self, Stdio},
    sync::{Mutex, PoisonError},
};

use log::{debug, trace, warn};

use crate::{command::Command, error::RenderError};

/// A single engine run.
#[derive(Debug, Clone, Copy)]
pub struct Invocation<'a> {
    /// The command to run.
    pub command: &'a Command,
    /// Working directory; `None` runs in the current directory.
    pub cwd: Option<&'a Path>,
    /// Suppress echoing the engine's stderr.
    pub quiet: bool,
    /// Capture stdout and stderr instead of inheriting them.
    pub capture_output: bool,
}

/// The outcome of a finished process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    /// Exit code, `None` if the process was terminated by a signal.
    pub code: Option<i32>,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

impl ProcessOutput {
    /// A successful run with no output.
    pub fn success() -> Self {
        Self {
            code: Some(0),
            ..Self::default()
        }
    }

    /// A failed run with the given exit code and stderr.
    pub fn failure(code: i32, stderr: impl Into<Vec<u8>>) -> Self {
        Self {
            code: Some(code),
            stdout: Vec::new(),
            stderr: stderr.into(),
        }
    }

    /// Returns `true` if the process exited with code 0.
    pub fn is_success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Runs engine processes to completion.
pub trait ProcessRunner {
    /// Run the invocation and wait for it to finish.
    ///
    /// # Errors
    ///
    /// Returns the spawn error, e.g. [`io::ErrorKind::NotFound`] if the
    /// program does not exist.
    fn run(&self, invocation: &Invocation<'_>) -> io::Result<ProcessOutput>;
}

impl<R: ProcessRunner + ?Sized> ProcessRunner for &R {
    fn run(&self, invocation: &Invocation<'_>) -> io::Result<ProcessOutput> {
        (**self).run(invocation)
    }
}

/// Runs processes with [`std::process::Command`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl ProcessRunner for SystemRunner {
    fn run(&self, invocation: &Invocation<'_>) -> io::Result<ProcessOutput> {
        let command = invocation.command;
        let mut process = process::Command::new(command.program());
        process.args(command.args()).stdin(Stdio::null());

        if let Some(cwd) = invocation.cwd {
            process.current_dir(cwd);
        }

        if invocation.capture_output {
            process.stdout(Stdio::piped()).stderr(Stdio::piped());
        } else if invocation.quiet {
            process.stderr(Stdio::null());
        }

        #[cfg(windows)]
        {
            use std::os::windows::process::CommandExt;

            // Keep the engine from flashing a console window.
            const CREATE_NO_WINDOW: u32 = 0x0800_0000;
            process.creation_flags(CREATE_NO_WINDOW);
        }

        let output = process.output()?;
        Ok(ProcessOutput {
            code: output.status.code(),
            stdout: output.stdout,
            stderr: output.stderr,
        })
    }
}

/// A recorded call to [`RecordingRunner`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedInvocation {
    pub command: Command,
    pub cwd: Option<PathBuf>,
    pub quiet: bool,
    pub capture_output: bool,
}

/// A runner that records invocations instead of spawning processes.
///
/// Every call returns a clone of the configured output (success by
/// default). Used for dry runs and as a test double.
#[derive(Debug, Default)]
pub struct RecordingRunner {
    output: ProcessOutput,
    not_found: bool,
    invocations: Mutex<Vec<RecordedInvocation>>,
}

impl RecordingRunner {
    /// Create a runner whose invocations all succeed.
    pub fn new() -> Self {
        Self::with_output(ProcessOutput::success())
    }

    /// Create a runner returning `output` for every invocation.
    pub fn with_output(output: ProcessOutput) -> Self {
        Self {
            output,
            not_found: false,
            invocations: Mutex::default(),
        }
    }

    /// Create a runner that behaves as if the program did not exist.
    pub fn not_found() -> Self {
        Self {
            not_found: true,
            ..Self::new()
        }
    }

    /// Returns the invocations recorded so far.
    pub fn invocations(&self) -> Vec<RecordedInvocation> {
        self.invocations
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl ProcessRunner for RecordingRunner {
    fn run(&self, invocation: &Invocation<'_>) -> io::Result<ProcessOutput> {
        self.invocations
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(RecordedInvocation {
                command: invocation.command.clone(),
                cwd: invocation.cwd.map(Path::to_path_buf),
                quiet: invocation.quiet,
                capture_output: invocation.capture_output,
            });

        if self.not_found {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                "No such file or directory",
            ));
        }
        Ok(self.output.clone())
    }
}

/// Run `invocation` with `runner` and check the result.
///
/// Captured stderr is echoed to this process's stderr unless the
/// invocation is quiet.
///
/// # Errors
///
/// - [`RenderError::ExecutableNotFound`] if the program cannot be found
/// - [`RenderError::Io`] for any other spawn failure
/// - [`RenderError::ProcessFailed`] if the exit code is not 0
pub fn run_check(
    runner: &dyn ProcessRunner,
    invocation: &Invocation<'_>,
) -> Result<ProcessOutput, RenderError> {
    let command = invocation.command;
    debug!(
        command:% = command,
        cwd:? = invocation.cwd;
        "Running layout engine"
    );

    let output = runner.run(invocation).map_err(|err| {
        if err.kind() == io::ErrorKind::NotFound {
            RenderError::ExecutableNotFound {
                program: command.program().display().to_string(),
                source: err,
            }
        } else {
            RenderError::Io(err)
        }
    })?;

    check_output(command, invocation.quiet, output, &mut io::stderr().lock())
}

/// Echo captured stderr to `echo_to` unless `quiet`, then check the exit
/// code. A failed echo is logged and never fails the run.
fn check_output(
    command: &Command,
    quiet: bool,
    output: ProcessOutput,
    echo_to: &mut impl Write,
) -> Result<ProcessOutput, RenderError> {
    if !quiet && !output.stderr.is_empty() {
        let echoed = echo_to
            .write_all(&output.stderr)
            .and_then(|()| echo_to.flush());
        if let Err(err) = echoed {
            warn!(err:% = err; "Failed to echo layout engine stderr");
        }
    }

    if !output.is_success() {
        return Err(RenderError::ProcessFailed {
            command: command.to_string(),
            code: output.code,
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        });
    }

    trace!(stdout_len = output.stdout.len(); "Layout engine finished");
    Ok(output)
}
