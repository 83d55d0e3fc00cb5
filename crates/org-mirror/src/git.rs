//! Executors for the local half of a migration: the mirror workspace and
//! the `git clone --mirror` / `git push --mirror` invocations.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use mirror_core::{Credential, MirrorError, MirrorExecutor, Result};
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Runs the real `git` executable
pub struct GitCommandExecutor {
    program: PathBuf,
    timeout: Option<Duration>,
}

impl GitCommandExecutor {
    pub fn new(timeout: Option<Duration>) -> Self {
        Self {
            program: PathBuf::from("git"),
            timeout,
        }
    }

    /// Confirm the executable runs, returning its version line
    pub fn check_available(&self) -> Result<String> {
        let output = Command::new(&self.program)
            .arg("--version")
            .stdin(Stdio::null())
            .output()
            .map_err(|e| MirrorError::Git(format!("failed to run {}: {}", self.program.display(), e)))?;

        if !output.status.success() {
            return Err(MirrorError::Git(format!(
                "{} --version exited with {}",
                self.program.display(),
                output.status
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    fn run(&self, args: &[&str], cwd: Option<&Path>, credential: &Credential) -> Result<Vec<String>> {
        let command_line = format!("git {}", args.join(" "));
        tracing::debug!(command = %command_line, "running git");

        let mut command = Command::new(&self.program);
        command
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .env("GIT_TERMINAL_PROMPT", "0")
            .envs(auth_env(credential));
        if let Some(dir) = cwd {
            command.current_dir(dir);
        }
        // git leads its own process group so a timeout also reaches the remote helpers
        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            command.process_group(0);
        }

        let mut child = command
            .spawn()
            .map_err(|e| MirrorError::Git(format!("failed to start `{}`: {}", command_line, e)))?;

        let stdout = child.stdout.take().map(|s| thread::spawn(move || read_lines(s)));
        let stderr = child.stderr.take().map(|s| thread::spawn(move || read_lines(s)));

        let waited = match self.timeout {
            Some(limit) => wait_with_deadline(&mut child, limit),
            None => child.wait().map_err(|e| format!("failed: {}", e)),
        };

        // Readers end once no process of the group holds the pipes any more
        let mut lines = Vec::new();
        for handle in [stdout, stderr].into_iter().flatten() {
            lines.extend(handle.join().unwrap_or_default());
        }
        let status = waited.map_err(|e| MirrorError::Git(format!("`{}` {}", command_line, e)))?;

        let lines: Vec<String> = lines
            .iter()
            .map(|line| redact(line, credential))
            .filter(|line| !line.trim().is_empty())
            .collect();

        if status.success() {
            Ok(lines)
        } else {
            let detail = lines
                .iter()
                .rev()
                .take(5)
                .rev()
                .cloned()
                .collect::<Vec<_>>()
                .join(" | ");
            Err(MirrorError::Git(format!(
                "`{}` exited with {}: {}",
                command_line, status, detail
            )))
        }
    }
}

impl MirrorExecutor for GitCommandExecutor {
    fn prepare_work_dir(&self, path: &Path) -> Result<Vec<String>> {
        if path.is_dir() {
            return Ok(Vec::new());
        }
        std::fs::create_dir_all(path)
            .map_err(|e| MirrorError::Io(format!("creating {}: {}", path.display(), e)))?;
        Ok(vec![format!("Created working directory {}", path.display())])
    }

    fn prepare_workspace(&self, path: &Path) -> Result<Vec<String>> {
        let mut notes = Vec::new();
        if path.exists() {
            std::fs::remove_dir_all(path)
                .map_err(|e| MirrorError::Io(format!("removing {}: {}", path.display(), e)))?;
            notes.push(format!("Removed stale mirror at {}", path.display()));
        }
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| MirrorError::Io(format!("creating {}: {}", parent.display(), e)))?;
        }
        Ok(notes)
    }

    fn mirror_clone(&self, url: &str, credential: &Credential, path: &Path) -> Result<Vec<String>> {
        let target = path.to_string_lossy().into_owned();
        self.run(&["clone", "--mirror", url, target.as_str()], None, credential)
    }

    fn mirror_push(&self, path: &Path, url: &str, credential: &Credential) -> Result<Vec<String>> {
        self.run(&["push", "--mirror", url], Some(path), credential)
    }

    fn cleanup_workspace(&self, path: &Path) -> Result<Vec<String>> {
        if !path.exists() {
            return Ok(Vec::new());
        }
        std::fs::remove_dir_all(path)
            .map_err(|e| MirrorError::Io(format!("removing {}: {}", path.display(), e)))?;
        Ok(vec![format!("Removed local mirror {}", path.display())])
    }
}

/// Announces clone and push without touching the filesystem or running git
pub struct DryRunExecutor;

impl MirrorExecutor for DryRunExecutor {
    fn prepare_workspace(&self, _path: &Path) -> Result<Vec<String>> {
        Ok(Vec::new())
    }

    fn mirror_clone(&self, url: &str, _credential: &Credential, path: &Path) -> Result<Vec<String>> {
        Ok(vec![format!(
            "[DRY RUN] Would mirror-clone {} into {}",
            url,
            path.display()
        )])
    }

    fn mirror_push(&self, path: &Path, url: &str, _credential: &Credential) -> Result<Vec<String>> {
        Ok(vec![format!(
            "[DRY RUN] Would mirror-push {} to {}",
            path.display(),
            url
        )])
    }

    fn cleanup_workspace(&self, _path: &Path) -> Result<Vec<String>> {
        Ok(Vec::new())
    }
}

/// Value of the `Authorization` header git sends over HTTPS
fn basic_auth(credential: &Credential) -> String {
    STANDARD.encode(format!("x-access-token:{}", credential.expose()))
}

/// Per-invocation git configuration carrying the credential.
///
/// Passed through the environment so the token never shows up in argv,
/// remote URLs or the clone's stored config.
fn auth_env(credential: &Credential) -> Vec<(&'static str, String)> {
    vec![
        ("GIT_CONFIG_COUNT", "1".to_string()),
        ("GIT_CONFIG_KEY_0", "http.extraHeader".to_string()),
        (
            "GIT_CONFIG_VALUE_0",
            format!("Authorization: Basic {}", basic_auth(credential)),
        ),
    ]
}

/// Mask the credential, raw or encoded, in captured output
fn redact(line: &str, credential: &Credential) -> String {
    if credential.is_empty() {
        return line.to_string();
    }
    line.replace(credential.expose(), "***")
        .replace(&basic_auth(credential), "***")
}

fn read_lines<R: Read>(reader: R) -> Vec<String> {
    BufReader::new(reader).lines().map_while(|l| l.ok()).collect()
}

fn wait_with_deadline(child: &mut Child, limit: Duration) -> std::result::Result<ExitStatus, String> {
    let started = Instant::now();
    loop {
        match child.try_wait() {
            Ok(Some(status)) => return Ok(status),
            Ok(None) if started.elapsed() >= limit => {
                kill_process_group(child);
                let _ = child.kill();
                let _ = child.wait();
                return Err(format!("timed out after {}s", limit.as_secs()));
            }
            Ok(None) => thread::sleep(POLL_INTERVAL),
            Err(e) => return Err(format!("failed: {}", e)),
        }
    }
}

/// Kill git together with every helper it started
#[cfg(unix)]
fn kill_process_group(child: &Child) {
    let _ = Command::new("kill")
        .args(["-KILL", "--", &format!("-{}", child.id())])
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();
}

#[cfg(not(unix))]
fn kill_process_group(_child: &Child) {}
