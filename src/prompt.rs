use crate::env::Environment;
use std::path::{MAIN_SEPARATOR, Path};

/// `user@host:dir$ ` for the current environment.
pub fn render(env: &Environment) -> String {
    let dir = compress_home(&env.current_dir, env.home_dir().as_deref());
    format!("{}@{}:{}$ ", env.user(), env.hostname(), dir)
}

/// Display `dir` with a leading `home` replaced by `~`.
///
/// Only whole path components are replaced: `/home/u2` is not under `/home/u`.
pub fn compress_home(dir: &Path, home: Option<&Path>) -> String {
    let relative = home
        .filter(|h| !h.as_os_str().is_empty())
        .and_then(|h| dir.strip_prefix(h).ok());
    match relative {
        Some(rel) if rel.as_os_str().is_empty() => "~".to_string(),
        Some(rel) => format!("~{}{}", MAIN_SEPARATOR, rel.display()),
        None => dir.display().to_string(),
    }
}
