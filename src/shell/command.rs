//! External command execution.

use crate::error::{Result, SetupError};
use std::collections::HashMap;
use std::fmt;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

/// A program and its arguments.
///
/// Commands are spawned directly rather than through a shell, so
/// arguments never need quoting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Program name or path.
    pub program: String,
    /// Arguments passed to the program.
    pub args: Vec<String>,
}

impl Invocation {
    /// Create an invocation from a program and arguments.
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Prefix this invocation with another program (e.g. `sudo`).
    pub fn prefixed(self, wrapper: &str) -> Self {
        let mut args = Vec::with_capacity(self.args.len() + 1);
        args.push(self.program);
        args.extend(self.args);
        Self {
            program: wrapper.to_string(),
            args,
        }
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", display_word(&self.program))?;
        for arg in &self.args {
            write!(f, " {}", display_word(arg))?;
        }
        Ok(())
    }
}

fn display_word(word: &str) -> String {
    if !word.is_empty() && !word.contains(|c: char| c.is_whitespace() || c == '\'' || c == '"') {
        word.to_string()
    } else {
        format!("'{}'", word.replace('\'', r"'\''"))
    }
}

/// Result of executing a command.
#[derive(Debug, Clone)]
pub struct CommandResult {
    /// Exit code (None if killed by signal).
    pub exit_code: Option<i32>,

    /// Standard output (empty when inherited).
    pub stdout: String,

    /// Standard error (empty when inherited).
    pub stderr: String,

    /// Execution duration.
    pub duration: Duration,

    /// Whether the command exited with status 0.
    pub success: bool,
}

impl CommandResult {
    /// Create a success result.
    pub fn success(stdout: String, stderr: String, duration: Duration) -> Self {
        Self {
            exit_code: Some(0),
            stdout,
            stderr,
            duration,
            success: true,
        }
    }

    /// Create a failure result.
    pub fn failure(
        exit_code: Option<i32>,
        stdout: String,
        stderr: String,
        duration: Duration,
    ) -> Self {
        Self {
            exit_code,
            stdout,
            stderr,
            duration,
            success: false,
        }
    }

    /// The last `n` non-empty lines of combined output, stderr last.
    pub fn output_tail(&self, n: usize) -> Vec<&str> {
        let lines: Vec<&str> = self
            .stdout
            .lines()
            .chain(self.stderr.lines())
            .filter(|l| !l.trim().is_empty())
            .collect();
        let start = lines.len().saturating_sub(n);
        lines[start..].to_vec()
    }
}

/// Options for command execution.
#[derive(Debug, Clone, Default)]
pub struct CommandOptions {
    /// Working directory.
    pub cwd: Option<PathBuf>,

    /// Environment variables set on top of the inherited environment.
    pub env: HashMap<String, String>,

    /// Environment variables removed from the inherited environment.
    pub env_remove: Vec<String>,

    /// Capture stdout and stderr (if false, both are inherited).
    pub capture: bool,
}

/// Output line from command execution.
#[derive(Debug, Clone)]
pub enum OutputLine {
    Stdout(String),
    Stderr(String),
}

/// Callback for streaming output.
pub type OutputCallback = Box<dyn Fn(OutputLine) + Send>;

fn build_command(invocation: &Invocation, options: &CommandOptions) -> Command {
    let mut cmd = Command::new(&invocation.program);
    cmd.args(&invocation.args);

    if let Some(cwd) = &options.cwd {
        cmd.current_dir(cwd);
    }

    for key in &options.env_remove {
        cmd.env_remove(key);
    }

    for (key, value) in &options.env {
        cmd.env(key, value);
    }

    cmd
}

fn spawn_error(invocation: &Invocation, err: std::io::Error) -> SetupError {
    tracing::debug!("Failed to spawn '{}': {}", invocation, err);
    SetupError::SpawnFailed {
        command: invocation.to_string(),
        source: err,
    }
}

/// Execute a command and wait for it to exit.
pub fn execute(invocation: &Invocation, options: &CommandOptions) -> Result<CommandResult> {
    let start = Instant::now();
    tracing::debug!("Executing: {}", invocation);

    let mut cmd = build_command(invocation, options);
    cmd.stdin(Stdio::inherit());

    if options.capture {
        cmd.stdout(Stdio::piped()).stderr(Stdio::piped());
    } else {
        cmd.stdout(Stdio::inherit()).stderr(Stdio::inherit());
    }

    let output = cmd.output().map_err(|e| spawn_error(invocation, e))?;
    let duration = start.elapsed();

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();

    if output.status.success() {
        Ok(CommandResult::success(stdout, stderr, duration))
    } else {
        Ok(CommandResult::failure(
            output.status.code(),
            stdout,
            stderr,
            duration,
        ))
    }
}

/// Execute a command, forwarding each output line to `callback` while
/// also capturing it.
pub fn execute_streaming(
    invocation: &Invocation,
    options: &CommandOptions,
    callback: OutputCallback,
) -> Result<CommandResult> {
    let start = Instant::now();
    tracing::debug!("Executing (streaming): {}", invocation);

    let mut cmd = build_command(invocation, options);
    cmd.stdin(Stdio::inherit());
    cmd.stdout(Stdio::piped());
    cmd.stderr(Stdio::piped());

    let mut child = cmd.spawn().map_err(|e| spawn_error(invocation, e))?;

    let (stdout, stderr) = match (child.stdout.take(), child.stderr.take()) {
        (Some(out), Some(err)) => (out, err),
        _ => {
            return Err(spawn_error(
                invocation,
                std::io::Error::other("output pipes unavailable"),
            ))
        }
    };

    let (tx, rx) = mpsc::channel();
    let tx_stderr = tx.clone();

    let stdout_handle = thread::spawn(move || {
        let mut output = String::new();
        for line in BufReader::new(stdout).lines().map_while(std::result::Result::ok) {
            output.push_str(&line);
            output.push('\n');
            let _ = tx.send(OutputLine::Stdout(line));
        }
        output
    });

    let stderr_handle = thread::spawn(move || {
        let mut output = String::new();
        for line in BufReader::new(stderr).lines().map_while(std::result::Result::ok) {
            output.push_str(&line);
            output.push('\n');
            let _ = tx_stderr.send(OutputLine::Stderr(line));
        }
        output
    });

    for line in rx {
        callback(line);
    }

    let stdout_output = stdout_handle.join().unwrap_or_default();
    let stderr_output = stderr_handle.join().unwrap_or_default();

    let status = child.wait().map_err(|e| spawn_error(invocation, e))?;
    let duration = start.elapsed();

    if status.success() {
        Ok(CommandResult::success(stdout_output, stderr_output, duration))
    } else {
        Ok(CommandResult::failure(
            status.code(),
            stdout_output,
            stderr_output,
            duration,
        ))
    }
}

/// Seam between the step executor and real processes.
///
/// Tests substitute a recording implementation so that package managers
/// are never actually invoked.
pub trait ProcessRunner {
    /// Run an invocation to completion.
    fn run(&mut self, invocation: &Invocation, options: &CommandOptions) -> Result<CommandResult>;

    /// Run an invocation, forwarding output lines as they arrive.
    fn run_streaming(
        &mut self,
        invocation: &Invocation,
        options: &CommandOptions,
        _callback: OutputCallback,
    ) -> Result<CommandResult> {
        self.run(invocation, options)
    }
}

/// Runs invocations as real child processes.
#[derive(Debug, Default)]
pub struct SystemRunner;

impl ProcessRunner for SystemRunner {
    fn run(&mut self, invocation: &Invocation, options: &CommandOptions) -> Result<CommandResult> {
        execute(invocation, options)
    }

    fn run_streaming(
        &mut self,
        invocation: &Invocation,
        options: &CommandOptions,
        callback: OutputCallback,
    ) -> Result<CommandResult> {
        execute_streaming(invocation, options, callback)
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn sh(script: &str) -> Invocation {
        Invocation::new("sh", ["-c", script])
    }

    fn captured() -> CommandOptions {
        CommandOptions {
            capture: true,
            ..Default::default()
        }
    }

    #[test]
    fn execute_successful_command() {
        let result = execute(&sh("echo hello"), &captured()).unwrap();

        assert!(result.success);
        assert_eq!(result.exit_code, Some(0));
        assert!(result.stdout.contains("hello"));
    }

    #[test]
    fn execute_failing_command_keeps_exit_code() {
        let result = execute(&sh("exit 3"), &captured()).unwrap();

        assert!(!result.success);
        assert_eq!(result.exit_code, Some(3));
    }

    #[test]
    fn execute_missing_program_reports_os_error() {
        let inv = Invocation::new("definitely-not-a-real-program-xyz", Vec::<String>::new());
        let err = execute(&inv, &captured()).unwrap_err();
        assert!(matches!(err, SetupError::SpawnFailed { .. }));
        assert!(err.to_string().contains("definitely-not-a-real-program-xyz"));
        assert!(err.to_string().contains("No such file or directory"));
    }

    #[test]
    fn execute_non_executable_reports_permission_denied() {
        let temp = tempfile::TempDir::new().unwrap();
        let script = temp.path().join("pip");
        std::fs::write(&script, "#!/bin/sh\n").unwrap();

        let inv = Invocation::new(script.to_string_lossy(), ["install"]);
        let err = execute(&inv, &captured()).unwrap_err();

        assert!(matches!(err, SetupError::SpawnFailed { .. }));
        assert!(err.to_string().contains("Permission denied"));
    }

    #[test]
    fn execute_with_env_overlay() {
        let mut options = captured();
        options.env.insert("MY_VAR".into(), "my_value".into());

        let result = execute(&sh("echo $MY_VAR"), &options).unwrap();
        assert!(result.stdout.contains("my_value"));
    }

    #[test]
    fn execute_with_env_removal() {
        let mut options = captured();
        options.env_remove.push("HOME".into());

        let result = execute(&sh("echo \"[${HOME:-unset}]\""), &options).unwrap();
        assert!(result.stdout.contains("[unset]"));
    }

    #[test]
    fn execute_with_cwd() {
        let temp = tempfile::TempDir::new().unwrap();
        std::fs::write(temp.path().join("marker.txt"), "").unwrap();
        let mut options = captured();
        options.cwd = Some(temp.path().to_path_buf());

        let result = execute(&sh("ls"), &options).unwrap();
        assert!(result.stdout.contains("marker.txt"));
    }

    #[test]
    fn execute_streaming_captures_both_streams() {
        use std::sync::{Arc, Mutex};

        let lines = Arc::new(Mutex::new(Vec::new()));
        let lines_clone = Arc::clone(&lines);
        let callback: OutputCallback = Box::new(move |line| {
            lines_clone.lock().unwrap().push(line);
        });

        let result = execute_streaming(
            &sh("echo out1 && echo err1 >&2 && echo out2"),
            &CommandOptions::default(),
            callback,
        )
        .unwrap();

        assert!(result.success);
        assert!(result.stdout.contains("out2"));
        assert!(result.stderr.contains("err1"));
        let captured = lines.lock().unwrap();
        assert_eq!(captured.len(), 3);
        assert!(captured.iter().any(|l| matches!(l, OutputLine::Stderr(_))));
    }

    #[test]
    fn output_tail_returns_last_lines() {
        let result = CommandResult::failure(
            Some(1),
            "a\nb\n\nc\n".into(),
            "E: broken\n".into(),
            Duration::ZERO,
        );
        assert_eq!(result.output_tail(2), vec!["c", "E: broken"]);
        assert_eq!(result.output_tail(10).len(), 4);
    }

    #[test]
    fn invocation_display_quotes_when_needed() {
        let inv = Invocation::new("pip", ["install", "-r", "my reqs.txt"]);
        assert_eq!(inv.to_string(), "pip install -r 'my reqs.txt'");
    }

    #[test]
    fn invocation_prefixed_with_sudo() {
        let inv = Invocation::new("apt-get", ["update"]).prefixed("sudo");
        assert_eq!(inv.program, "sudo");
        assert_eq!(inv.args, vec!["apt-get", "update"]);
    }
}
