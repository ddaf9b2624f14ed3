use crate::env::Environment;
use anyhow::{Context, Result};
use std::borrow::Cow;
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use tracing::debug;

/// Conventional process exit code: 0 for success, anything else for failure.
pub type ExitCode = i32;

/// A command line handed to a system shell as `<shell> -c <script>`.
///
/// The child shares the terminal: stdin, stdout and stderr are inherited.
pub struct ShellCommand {
    program: OsString,
    script: String,
}

impl ShellCommand {
    /// Resolve `shell` against the environment's `PATH`.
    ///
    /// If it cannot be found the bare name is kept and the OS gets the final say.
    pub fn new(shell: &str, script: impl Into<String>, env: &Environment) -> Self {
        let program = env
            .get_var("PATH")
            .and_then(|paths| {
                find_command_path(OsStr::new(&paths), Path::new(shell))
                    .map(|p| p.into_owned().into_os_string())
            })
            .unwrap_or_else(|| OsString::from(shell));
        Self {
            program,
            script: script.into(),
        }
    }

    /// Run to completion, blocking until the child exits.
    pub fn execute(self, env: &Environment) -> Result<ExitCode> {
        let mut child = std::process::Command::new(&self.program)
            .arg("-c")
            .arg(&self.script)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .envs(env.vars.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .current_dir(&env.current_dir)
            .spawn()
            .with_context(|| format!("{}: failed to start", self.program.to_string_lossy()))?;
        let exit_status = child.wait()?;
        let code = match exit_status.code() {
            Some(x) => x,
            None => terminated_by_signal(exit_status),
        };
        debug!(code, script = %self.script, "command finished");
        Ok(code)
    }
}

#[cfg(unix)]
fn terminated_by_signal(exit_status: ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;
    if let Some(signal) = ExitStatusExt::signal(&exit_status) {
        128 + signal
    } else if ExitStatusExt::core_dumped(&exit_status) {
        255
    } else {
        -1
    }
}

#[cfg(not(unix))]
fn terminated_by_signal(_exit_status: ExitStatus) -> i32 {
    -1
}

/// Resolve a program path the way a typical shell would.
///
/// - Absolute path: returned if it exists.
/// - `./foo` (or anything on non-Unix): returned if it exists in the current directory.
/// - Single component (e.g. `bash`): each directory of `search_paths` is tried in order.
/// - Several components (e.g. `bin/sh`): returned if it exists relative to the current directory.
/// - Empty path: `None`.
pub fn find_command_path<'a>(search_paths: &OsStr, path: &'a Path) -> Option<Cow<'a, Path>> {
    if path.is_absolute() {
        return find_by_path(path).map(Cow::Borrowed);
    }

    let search_in_current_dir = cfg!(not(unix)) || path.starts_with("./");
    if search_in_current_dir && path.exists() {
        return Some(Cow::Borrowed(path));
    }

    let mut components = path.components();
    match (components.next(), components.next()) {
        (None, None) => None,
        (Some(x), None) => find_in_path(search_paths, x.as_os_str()).map(Cow::Owned),
        _ => find_by_path(path).map(Cow::Borrowed),
    }
}

fn find_in_path(search_paths: &OsStr, cmd: &OsStr) -> Option<PathBuf> {
    std::env::split_paths(search_paths)
        .map(|dir| dir.join(cmd))
        .find(|path| path.exists())
}

fn find_by_path(path: &Path) -> Option<&Path> {
    if path.exists() { Some(path) } else { None }
}
