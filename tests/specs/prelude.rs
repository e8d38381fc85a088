//! Test helpers for behavioral specifications.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic, dead_code)]

use std::path::{Path, PathBuf};
use std::process::{Child, Output, Stdio};
use std::sync::OnceLock;
use std::time::Duration;

// Aggressive timeouts for fast tests.
const SQSCTL_TIMEOUT_IPC_MS: &str = "500";
const SQSCTL_POLL_MS: &str = "20";

/// Upper bound on any single command.
const COMMAND_TIMEOUT: Duration = Duration::from_secs(30);

pub const SPEC_POLL_INTERVAL_MS: u64 = 10;
pub const SPEC_WAIT_MAX_MS: u64 = 5000;

/// Daemon settings that must not leak in from the developer's shell.
const DAEMON_VARS: &[&str] = &[
    "SQSD_CONFIG",
    "QUEUE_URL",
    "INVOKER_URL",
    "REQUEST_CONTENT_TYPE",
    "DEFAULT_INVOKER_TIMEOUT_SECONDS",
    "VISIBILITY_TIMEOUT_SECONDS",
    "FETCHER_PARALLEL_COUNT",
    "INVOKER_PARALLEL_COUNT",
    "REMOVER_PARALLEL_COUNT",
    "MAX_MESSAGES_PER_REQUEST",
    "WAIT_TIME_SECONDS",
    "MONITORING_PORT",
    "SQS_ENDPOINT_URL",
    "AWS_REGION",
    "LOG_LEVEL",
    "DRAIN_TIMEOUT_SECONDS",
    "RUST_LOG",
    "SQSD_ADDR",
];

/// Path to a workspace binary, building the workspace binaries once if the
/// test run has not produced them yet.
fn binary_path(name: &str) -> PathBuf {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    let candidates = || {
        let mut paths = vec![
            manifest_dir.join("target/llvm-cov-target/debug").join(name),
            manifest_dir.join("target/debug").join(name),
        ];
        // The test binary lives at target/debug/deps/specs-<hash>
        if let Ok(exe) = std::env::current_exe() {
            if let Some(debug_dir) = exe.parent().and_then(|d| d.parent()) {
                paths.push(debug_dir.join(name));
            }
        }
        paths
    };

    if let Some(found) = candidates().into_iter().find(|p| p.exists()) {
        return found;
    }

    static BUILT: OnceLock<bool> = OnceLock::new();
    BUILT.get_or_init(|| {
        std::process::Command::new(env!("CARGO"))
            .args(["build", "-p", "sqsd-daemon", "-p", "sqsctl"])
            .current_dir(manifest_dir)
            .status()
            .map(|s| s.success())
            .unwrap_or(false)
    });
    candidates()
        .into_iter()
        .find(|p| p.exists())
        .unwrap_or_else(|| manifest_dir.join("target/debug").join(name))
}

/// Create a builder for `sqsctl`
pub fn cli() -> CliBuilder {
    CliBuilder::new("sqsctl")
}

/// Create a builder for `sqsd`
pub fn daemon() -> CliBuilder {
    CliBuilder::new("sqsd")
}

/// Fluent builder for running a binary with a clean environment
pub struct CliBuilder {
    binary: &'static str,
    args: Vec<String>,
    envs: Vec<(String, String)>,
}

impl CliBuilder {
    fn new(binary: &'static str) -> Self {
        Self {
            binary,
            args: Vec::new(),
            envs: vec![
                ("SQSCTL_TIMEOUT_IPC_MS".into(), SQSCTL_TIMEOUT_IPC_MS.into()),
                ("SQSCTL_POLL_MS".into(), SQSCTL_POLL_MS.into()),
                ("NO_COLOR".into(), "1".into()),
            ],
        }
    }

    pub fn args(mut self, args: &[&str]) -> Self {
        self.args.extend(args.iter().map(|s| s.to_string()));
        self
    }

    pub fn env(mut self, key: &str, value: impl AsRef<str>) -> Self {
        self.envs.push((key.to_string(), value.as_ref().to_string()));
        self
    }

    fn std_command(&self) -> std::process::Command {
        let mut cmd = std::process::Command::new(binary_path(self.binary));
        cmd.args(&self.args);
        for var in DAEMON_VARS {
            cmd.env_remove(var);
        }
        for (key, value) in &self.envs {
            cmd.env(key, value);
        }
        cmd
    }

    fn output(self) -> Output {
        let mut cmd = assert_cmd::Command::from_std(self.std_command());
        cmd.timeout(COMMAND_TIMEOUT);
        cmd.output().expect("command should run")
    }

    /// Start in the background with output discarded
    pub fn spawn(self) -> Child {
        self.std_command()
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .expect("command should start")
    }

    /// Run and expect success (exit code 0)
    pub fn passes(self) -> RunAssert {
        let output = self.output();
        assert!(
            output.status.success(),
            "expected command to pass, got exit code {:?}\nstdout: {}\nstderr: {}",
            output.status.code(),
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        );
        RunAssert { output }
    }

    /// Run and expect failure (non-zero exit code)
    pub fn fails(self) -> RunAssert {
        let output = self.output();
        assert!(
            !output.status.success(),
            "expected command to fail, but it passed\nstdout: {}\nstderr: {}",
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        );
        RunAssert { output }
    }

    /// Run and report only whether it exited 0
    pub fn succeeds(self) -> bool {
        self.output().status.success()
    }
}

/// Result of a run for chaining assertions
pub struct RunAssert {
    output: Output,
}

impl RunAssert {
    pub fn stdout(&self) -> String {
        String::from_utf8_lossy(&self.output.stdout).into_owned()
    }

    pub fn stderr(&self) -> String {
        String::from_utf8_lossy(&self.output.stderr).into_owned()
    }

    pub fn code(self, expected: i32) -> Self {
        assert_eq!(self.output.status.code(), Some(expected));
        self
    }

    pub fn stdout_has(self, expected: &str) -> Self {
        let stdout = self.stdout();
        assert!(
            stdout.contains(expected),
            "stdout does not contain '{}'\nstdout: {}",
            expected,
            stdout
        );
        self
    }

    pub fn stderr_has(self, expected: &str) -> Self {
        let stderr = self.stderr();
        assert!(
            stderr.contains(expected),
            "stderr does not contain '{}'\nstderr: {}",
            expected,
            stderr
        );
        self
    }

    /// Parse stdout as JSON
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.stdout()).unwrap_or_else(|e| {
            panic!("stdout is not JSON ({e}):\n{}", self.stdout());
        })
    }
}

/// Poll a condition until it returns true or timeout is reached.
pub fn wait_for<F>(timeout_ms: u64, mut condition: F) -> bool
where
    F: FnMut() -> bool,
{
    let start = std::time::Instant::now();
    let timeout = Duration::from_millis(timeout_ms);
    let poll_interval = Duration::from_millis(SPEC_POLL_INTERVAL_MS);

    while start.elapsed() < timeout {
        if condition() {
            return true;
        }
        std::thread::sleep(poll_interval);
    }
    false
}

/// A TCP port nothing is listening on.
pub fn free_port() -> u16 {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port()
}

/// A daemon process pointed at unreachable endpoints, killed on drop.
pub struct RunningDaemon {
    pub child: Child,
    pub addr: String,
}

impl RunningDaemon {
    pub fn start() -> Self {
        let port = free_port();
        let dead = format!("http://127.0.0.1:{}", free_port());
        let child = daemon()
            .env("QUEUE_URL", format!("{dead}/000000000000/jobs"))
            .env("INVOKER_URL", format!("{dead}/run"))
            .env("WAIT_TIME_SECONDS", "0")
            .env("MONITORING_PORT", port.to_string())
            .spawn();
        let addr = format!("127.0.0.1:{port}");

        let ready = wait_for(SPEC_WAIT_MAX_MS, || {
            cli().args(&["--addr", &addr, "ping"]).succeeds()
        });
        assert!(ready, "sqsd did not start listening on {addr}");
        Self { child, addr }
    }

    /// sqsctl aimed at this daemon
    pub fn ctl(&self) -> CliBuilder {
        cli().env("SQSD_ADDR", &self.addr)
    }

    /// Wait for the process to exit and return its exit code.
    pub fn wait_exit(&mut self, timeout_ms: u64) -> Option<i32> {
        let mut code = None;
        let exited = wait_for(timeout_ms, || match self.child.try_wait() {
            Ok(Some(status)) => {
                code = status.code();
                true
            }
            _ => false,
        });
        assert!(exited, "sqsd did not exit within {timeout_ms}ms");
        code
    }
}

impl Drop for RunningDaemon {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}
