//! Process execution for external commands.
//!
//! Every subprocess the tool starts goes through [run_with_timeout]: one
//! command, one working directory, captured output, bounded runtime. The
//! caller decides what a non-zero exit means; only spawn failures and an
//! expired deadline are errors here.

use std::io::Read;
use std::path::Path;
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use crate::error::{DeployError, Result};

/// Deadline applied to every external command.
pub const COMMAND_TIMEOUT: Duration = Duration::from_secs(120);

const POLL_INTERVAL: Duration = Duration::from_millis(25);

/// Captured result of a finished command.
#[derive(Debug, Clone)]
pub struct ExecOutput {
    /// Standard output, trimmed.
    pub stdout: String,
    /// Standard error, trimmed.
    pub stderr: String,
    /// Exit code, if the process exited normally.
    pub code: Option<i32>,
    /// Whether the exit status was zero.
    pub success: bool,
}

/// Runs `program` with `args` in `cwd` under the default [COMMAND_TIMEOUT].
pub fn run(program: &str, args: &[&str], cwd: &Path) -> Result<ExecOutput> {
    run_with_timeout(program, args, cwd, COMMAND_TIMEOUT)
}

/// Runs a command and waits for it to finish or for `timeout` to elapse.
///
/// Output is drained on dedicated threads so a chatty child cannot deadlock
/// on a full pipe while the parent is polling for its exit.
pub fn run_with_timeout(
    program: &str,
    args: &[&str],
    cwd: &Path,
    timeout: Duration,
) -> Result<ExecOutput> {
    if !cwd.is_dir() {
        return Err(DeployError::invalid_path(format!(
            "The working directory \"{}\" does not exist",
            cwd.display()
        )));
    }

    let command = command_line(program, args);

    let mut child = Command::new(program)
        .args(args)
        .current_dir(cwd)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| DeployError::process(&command, None, e.to_string()))?;

    let stdout = drain(child.stdout.take());
    let stderr = drain(child.stderr.take());

    let deadline = Instant::now() + timeout;
    let status = loop {
        if let Some(status) = child.try_wait()? {
            break status;
        }

        if Instant::now() >= deadline {
            let _ = child.kill();
            let _ = child.wait();
            return Err(DeployError::process(
                &command,
                None,
                format!("timed out after {} seconds", timeout.as_secs()),
            ));
        }

        thread::sleep(POLL_INTERVAL);
    };

    let stdout = stdout.join().unwrap_or_default();
    let stderr = stderr.join().unwrap_or_default();

    Ok(ExecOutput {
        stdout: stdout.trim().to_string(),
        stderr: stderr.trim().to_string(),
        code: status.code(),
        success: status.success(),
    })
}

/// Human-readable command line for error reporting.
pub fn command_line(program: &str, args: &[&str]) -> String {
    let mut line = program.to_string();
    for arg in args {
        line.push(' ');
        line.push_str(arg);
    }
    line
}

fn drain<R: Read + Send + 'static>(stream: Option<R>) -> thread::JoinHandle<String> {
    thread::spawn(move || {
        let mut buffer = String::new();
        if let Some(mut stream) = stream {
            let _ = stream.read_to_string(&mut buffer);
        }
        buffer
    })
}
