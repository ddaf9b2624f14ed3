use crate::env::Environment;
use crate::paths::expand_home;
use anyhow::{Context, Result};
use argh::{EarlyExit, FromArgs};
use std::env;
use std::fs;
use std::path::PathBuf;
use tracing::debug;

#[derive(FromArgs, Debug)]
/// Change the current working directory.
/// If no target is provided, changes to the home directory.
pub struct Cd {
    #[argh(positional)]
    /// directory to switch to; absolute, relative to the current directory, or starting with `~`.
    pub target: Option<String>,
}

impl Cd {
    pub const NAME: &'static str = "cd";

    /// Parse the arguments following `cd`.
    ///
    /// On failure the error carries argh's usage message, prefixed like every other
    /// `cd` error.
    pub fn parse(args: &[&str]) -> Result<Self> {
        Cd::from_args(&[Self::NAME], args).map_err(|EarlyExit { output, .. }| {
            anyhow::anyhow!("cd: {}", output.trim_end())
        })
    }

    /// Switch both the process and `env` to the target directory.
    ///
    /// Returns the canonical directory now in effect.
    pub fn execute(self, env: &mut Environment) -> Result<PathBuf> {
        let home = env.home_dir();
        let target = match &self.target {
            Some(t) if !t.is_empty() => PathBuf::from(expand_home(t, home.as_deref()).as_ref()),
            _ => home.ok_or_else(|| anyhow::anyhow!("cd: no target and HOME not set"))?,
        };

        let new_dir = if target.is_absolute() {
            target
        } else {
            env.current_dir.join(target)
        };

        let canonical = fs::canonicalize(&new_dir)
            .with_context(|| format!("cd: {}", new_dir.display()))?;

        env::set_current_dir(&canonical)
            .with_context(|| format!("cd: can't chdir to {}", canonical.display()))?;
        debug!(dir = %canonical.display(), "changed directory");
        env.current_dir = canonical.clone();
        Ok(canonical)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::lock_current_dir;
    use std::collections::HashMap;
    use std::env as stdenv;
    use tempfile::tempdir;

    fn env_at(dir: PathBuf) -> Environment {
        Environment {
            vars: HashMap::new(),
            current_dir: dir,
        }
    }

    #[test]
    fn test_cd_to_absolute_path() {
        let _lock = lock_current_dir();
        let temp = tempdir().unwrap();
        let canonical_temp = fs::canonicalize(temp.path()).unwrap();
        let orig = stdenv::current_dir().unwrap();
        let mut env = env_at(orig.clone());

        let cmd = Cd::parse(&[canonical_temp.to_str().unwrap()]).unwrap();
        let res = cmd.execute(&mut env);

        let new_cwd = fs::canonicalize(stdenv::current_dir().unwrap()).unwrap();
        stdenv::set_current_dir(orig).expect("failed to restore cwd");

        assert_eq!(res.unwrap(), canonical_temp);
        assert_eq!(new_cwd, canonical_temp);
        assert_eq!(env.current_dir, canonical_temp);
    }

    #[test]
    fn test_cd_to_home_when_none() {
        let _lock = lock_current_dir();
        let temp = tempdir().unwrap();
        let canonical_temp = fs::canonicalize(temp.path()).unwrap();
        let orig = stdenv::current_dir().unwrap();
        let mut env = env_at(orig.clone());
        env.set_var("HOME", canonical_temp.to_string_lossy().to_string());

        let res = Cd::parse(&[]).unwrap().execute(&mut env);
        stdenv::set_current_dir(orig).expect("failed to restore cwd");

        assert!(res.is_ok());
        assert_eq!(env.current_dir, canonical_temp);
    }

    #[test]
    fn test_cd_expands_tilde() {
        let _lock = lock_current_dir();
        let temp = tempdir().unwrap();
        fs::create_dir(temp.path().join("proj")).unwrap();
        let canonical_temp = fs::canonicalize(temp.path()).unwrap();
        let orig = stdenv::current_dir().unwrap();
        let mut env = env_at(orig.clone());
        env.set_var("HOME", canonical_temp.to_string_lossy().to_string());

        let res = Cd::parse(&["~/proj"]).unwrap().execute(&mut env);
        stdenv::set_current_dir(orig).expect("failed to restore cwd");

        assert_eq!(res.unwrap(), canonical_temp.join("proj"));
    }

    #[test]
    fn test_cd_relative_to_env_dir() {
        let _lock = lock_current_dir();
        let temp = tempdir().unwrap();
        fs::create_dir(temp.path().join("inner")).unwrap();
        let canonical_temp = fs::canonicalize(temp.path()).unwrap();
        let orig = stdenv::current_dir().unwrap();
        let mut env = env_at(canonical_temp.clone());

        let res = Cd::parse(&["inner"]).unwrap().execute(&mut env);
        stdenv::set_current_dir(orig).expect("failed to restore cwd");

        assert_eq!(res.unwrap(), canonical_temp.join("inner"));
    }

    #[test]
    fn test_cd_nonexistent_path_errors() {
        let _lock = lock_current_dir();
        let orig = stdenv::current_dir().unwrap();
        let mut env = env_at(orig.clone());

        let name = format!("nonexistent_dir_for_cd_test_{}", std::process::id());
        let res = Cd::parse(&[&name]).unwrap().execute(&mut env);

        assert!(res.is_err());
        assert!(res.unwrap_err().to_string().starts_with("cd: "));
        assert_eq!(stdenv::current_dir().unwrap(), orig);
        assert_eq!(env.current_dir, orig);
    }

    #[test]
    fn test_cd_rejects_extra_arguments() {
        let err = Cd::parse(&["a", "b"]).unwrap_err();
        assert!(err.to_string().starts_with("cd: "), "{err}");
    }
}
