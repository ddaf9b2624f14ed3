//! Filesystem completion for path-like tokens.

use crate::completion::Suggestion;
use crate::error::{Error, Result};
use std::borrow::Cow;
use std::fs;
use std::path::{MAIN_SEPARATOR, Path, PathBuf};
use tracing::debug;

/// Expand a leading `~` or `~/` to `home`.
///
/// A bare `~` expands to the home directory with a trailing separator. `~user` and
/// tokens without a leading tilde are returned unchanged, as is everything when the
/// home directory is unknown or not valid UTF-8.
pub fn expand_home<'a>(token: &'a str, home: Option<&Path>) -> Cow<'a, str> {
    let Some(rest) = token.strip_prefix('~') else {
        return Cow::Borrowed(token);
    };
    if !(rest.is_empty() || rest.starts_with(MAIN_SEPARATOR)) {
        return Cow::Borrowed(token);
    }
    match home.and_then(Path::to_str) {
        Some(home) => Cow::Owned(format!(
            "{}{}{}",
            home.trim_end_matches(MAIN_SEPARATOR),
            MAIN_SEPARATOR,
            rest.trim_start_matches(MAIN_SEPARATOR)
        )),
        None => Cow::Borrowed(token),
    }
}

/// A directory entry as seen by the completer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listing {
    pub name: String,
    /// True for directories and for symlinks pointing at one.
    pub is_dir: bool,
}

/// List the immediate entries of `dir` in the order the OS returns them.
///
/// Entries whose names are not valid UTF-8 are skipped.
pub fn list_dir(dir: &Path) -> Result<Vec<Listing>> {
    let entries = fs::read_dir(dir).map_err(|e| Error::from_io(dir, e))?;
    let mut out = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| Error::from_io(dir, e))?;
        let Ok(name) = entry.file_name().into_string() else {
            debug!(dir = %dir.display(), "skipping non UTF-8 entry");
            continue;
        };
        let is_dir = match entry.file_type() {
            Ok(ft) if ft.is_symlink() => fs::metadata(entry.path()).is_ok_and(|m| m.is_dir()),
            Ok(ft) => ft.is_dir(),
            Err(_) => false,
        };
        out.push(Listing { name, is_dir });
    }
    Ok(out)
}

/// Suggests directory entries for a path-like token.
#[derive(Debug, Clone, Default)]
pub struct PathResolver {
    home: Option<PathBuf>,
}

impl PathResolver {
    pub fn new(home: Option<PathBuf>) -> Self {
        Self { home }
    }

    pub fn home(&self) -> Option<&Path> {
        self.home.as_deref()
    }

    /// Complete `raw_token`, re-attaching `prefix` to every suggestion.
    ///
    /// A token ending in a separator lists that directory unfiltered; otherwise the
    /// parent directory is listed and entries are kept when they start with the last
    /// component. Directories get a trailing separator. Tokens typed with `~` are
    /// displayed with `~`, while the annotation carries the expanded path.
    ///
    /// An unreadable or missing directory yields no suggestions.
    pub fn suggest(&self, prefix: &str, raw_token: &str) -> Vec<Suggestion> {
        let expanded = expand_home(raw_token, self.home());
        let home_expanded = matches!(expanded, Cow::Owned(_));
        let expanded: &str = if expanded.is_empty() { "." } else { &expanded };

        let target = Target::parse(expanded);
        let entries = match list_dir(Path::new(target.dir)) {
            Ok(entries) => entries,
            Err(e) => {
                debug!("no path suggestions: {e}");
                return Vec::new();
            }
        };

        let home_prefix = self
            .home()
            .and_then(Path::to_str)
            .map(|h| h.trim_end_matches(MAIN_SEPARATOR));

        entries
            .into_iter()
            .filter(|entry| entry.name.starts_with(target.filter))
            .map(|entry| {
                let mut full = target.join(&entry.name);
                if entry.is_dir {
                    full.push(MAIN_SEPARATOR);
                }
                let shown = match home_prefix {
                    Some(home) if home_expanded && full.starts_with(home) => {
                        format!("~{}", &full[home.len()..])
                    }
                    _ => full.clone(),
                };
                Suggestion {
                    display_text: format!("{prefix}{shown}"),
                    annotation: full,
                }
            })
            .collect()
    }
}

/// Where to look and what to keep, derived from an expanded token.
struct Target<'a> {
    dir: &'a str,
    filter: &'a str,
    /// The token had no separator; entries are shown by bare name.
    implicit_dir: bool,
}

impl<'a> Target<'a> {
    fn parse(expanded: &'a str) -> Self {
        if expanded.ends_with(MAIN_SEPARATOR) {
            return Self {
                dir: expanded,
                filter: "",
                implicit_dir: false,
            };
        }
        match expanded.rfind(MAIN_SEPARATOR) {
            Some(0) => Self {
                dir: &expanded[..1],
                filter: &expanded[1..],
                implicit_dir: false,
            },
            Some(i) => Self {
                dir: &expanded[..i],
                filter: &expanded[i + 1..],
                implicit_dir: false,
            },
            None => Self {
                dir: ".",
                filter: expanded,
                implicit_dir: true,
            },
        }
    }

    fn join(&self, name: &str) -> String {
        if self.implicit_dir {
            name.to_string()
        } else if self.dir.ends_with(MAIN_SEPARATOR) {
            format!("{}{}", self.dir, name)
        } else {
            format!("{}{}{}", self.dir, MAIN_SEPARATOR, name)
        }
    }
}
