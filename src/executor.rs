//! Shell execution with a bounded wall-clock timeout.
//!
//! The shell strategy is picked once from the detected platform and held
//! for the process lifetime. Spawn failures and timeouts are reported
//! through `ExecutionResult`, never as propagated errors, so a runaway or
//! missing interpreter can't take down the CLI.

use crate::platform::Platform;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::debug;

/// Hard upper bound on command wall-clock time.
pub const COMMAND_TIMEOUT: Duration = Duration::from_secs(30);

/// Distinguished exit code reported when the timeout fires.
pub const TIMEOUT_EXIT_CODE: i32 = 124;

/// Outcome of running one command through the shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionResult {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
    pub timed_out: bool,
}

impl ExecutionResult {
    fn failure(message: String) -> Self {
        Self {
            exit_code: 1,
            stdout: String::new(),
            stderr: message,
            timed_out: false,
        }
    }

    fn timeout_expired() -> Self {
        Self {
            exit_code: TIMEOUT_EXIT_CODE,
            stdout: String::new(),
            stderr: String::new(),
            timed_out: true,
        }
    }
}

/// OS-specific mechanism for running a validated command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellStrategy {
    /// `cmd /C` with package-manager shim directories appended to PATH.
    Windows,
    /// `<shell> -c`, non-interactive.
    Unix { shell: &'static str },
}

impl ShellStrategy {
    /// Select the strategy for a platform. Called once per process.
    pub fn for_platform(platform: Platform) -> Self {
        match platform {
            Platform::Windows => ShellStrategy::Windows,
            Platform::Linux => ShellStrategy::Unix { shell: "bash" },
            Platform::MacOs => ShellStrategy::Unix { shell: "zsh" },
        }
    }

    /// Run `command` through this shell with the default timeout.
    pub async fn run(&self, command: &str) -> ExecutionResult {
        self.run_with_timeout(command, COMMAND_TIMEOUT).await
    }

    async fn run_with_timeout(&self, command: &str, timeout: Duration) -> ExecutionResult {
        let mut cmd = match self {
            ShellStrategy::Windows => {
                let mut cmd = Command::new("cmd");
                cmd.args(["/C", command]);
                if let Some(path) = windows_search_path() {
                    cmd.env("PATH", path);
                }
                cmd
            }
            ShellStrategy::Unix { shell } => {
                let mut cmd = Command::new(shell);
                cmd.args(["-c", command]);
                cmd
            }
        };

        debug!("Running command: {command}");
        // kill_on_drop reaps the child when the timeout cancels the wait
        let output = cmd
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output();

        match tokio::time::timeout(timeout, output).await {
            Err(_) => ExecutionResult::timeout_expired(),
            Ok(Err(e)) => ExecutionResult::failure(format!("Failed to run command: {e}")),
            Ok(Ok(output)) => ExecutionResult {
                exit_code: output.status.code().unwrap_or(1),
                stdout: String::from_utf8_lossy(&output.stdout).trim().to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
                timed_out: false,
            },
        }
    }
}

/// Extend the inherited PATH with well-known package-manager shim
/// directories that exist on disk and are not already listed.
fn windows_search_path() -> Option<std::ffi::OsString> {
    let current = std::env::var_os("PATH")?;
    let existing: Vec<PathBuf> = std::env::split_paths(&current).collect();

    let candidates = windows_shim_dirs()
        .into_iter()
        .filter(|p| p.is_dir())
        .collect();
    let merged = append_missing(existing, candidates);

    std::env::join_paths(merged).ok()
}

/// Optional install locations for scoop, chocolatey and winget shims.
fn windows_shim_dirs() -> Vec<PathBuf> {
    let mut dirs = Vec::new();
    if let Some(home) = dirs::home_dir() {
        dirs.push(home.join("scoop").join("shims"));
    }
    if let Some(local) = std::env::var_os("LOCALAPPDATA") {
        dirs.push(
            PathBuf::from(local)
                .join("Microsoft")
                .join("WinGet")
                .join("Links"),
        );
    }
    let program_data =
        std::env::var_os("ProgramData").unwrap_or_else(|| "C:\\ProgramData".into());
    dirs.push(PathBuf::from(program_data).join("chocolatey").join("bin"));
    dirs
}

/// Append candidate directories that are not already present.
fn append_missing(mut existing: Vec<PathBuf>, candidates: Vec<PathBuf>) -> Vec<PathBuf> {
    for candidate in candidates {
        if !existing.iter().any(|p| p == &candidate) {
            existing.push(candidate);
        }
    }
    existing
}
