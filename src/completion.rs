use crate::history::HistoryStore;
use crate::paths::PathResolver;
use crate::ranker::{FuzzyFinder, Ranker, SkimFinder};
use crate::tokenizer::{self, TokenKind};

/// A single completion candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    /// Text that replaces the completed span of the line.
    pub display_text: String,
    /// Human-readable metadata: the full path, or how often a command was used.
    pub annotation: String,
}

/// Suggestions for one cursor position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Completion {
    /// Byte offset in the line where the replaced span starts. The span ends at the cursor.
    pub start: usize,
    pub suggestions: Vec<Suggestion>,
}

/// Decides between path and history completion for the text before the cursor.
///
/// ```
/// use smartsh::{CompletionEngine, HistoryStore, PathResolver};
///
/// let mut engine = CompletionEngine::new(HistoryStore::in_memory(), PathResolver::default());
/// engine.record("git status");
/// engine.record("git status");
/// engine.record("git pull");
///
/// let completion = engine.complete("gst", 3);
/// assert_eq!(completion.start, 0);
/// assert_eq!(completion.suggestions[0].display_text, "git status");
/// assert_eq!(completion.suggestions[0].annotation, "used 2 times");
/// ```
pub struct CompletionEngine<F = SkimFinder> {
    history: HistoryStore,
    paths: PathResolver,
    ranker: Ranker<F>,
}

impl CompletionEngine {
    pub fn new(history: HistoryStore, paths: PathResolver) -> Self {
        Self::with_ranker(history, paths, Ranker::default())
    }
}

impl<F: FuzzyFinder> CompletionEngine<F> {
    pub fn with_ranker(history: HistoryStore, paths: PathResolver, ranker: Ranker<F>) -> Self {
        Self {
            history,
            paths,
            ranker,
        }
    }

    /// Complete `line` with the cursor at byte offset `pos`.
    ///
    /// Path-like tokens are completed from the filesystem and replace `prefix + token`
    /// right before the cursor. Anything else fuzzy-matches the trimmed text before the
    /// cursor against history and replaces all of it.
    pub fn complete(&self, line: &str, pos: usize) -> Completion {
        let Some(before) = line.get(..pos) else {
            return Completion::default();
        };
        if before.trim().is_empty() {
            return Completion::default();
        }

        let (prefix, token) = tokenizer::split(before);
        match tokenizer::classify(token) {
            TokenKind::PathLike => Completion {
                start: pos - prefix.len() - token.len(),
                suggestions: self.paths.suggest(prefix, token),
            },
            TokenKind::Plain => Completion {
                start: 0,
                suggestions: self
                    .ranker
                    .suggest(before.trim(), self.history.snapshot()),
            },
        }
    }

    /// Record a submitted command in history.
    pub fn record(&mut self, command: &str) {
        self.history.append(command);
    }

    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    pub fn history_mut(&mut self) -> &mut HistoryStore {
        &mut self.history
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn engine() -> CompletionEngine {
        CompletionEngine::new(HistoryStore::in_memory(), PathResolver::default())
    }

    #[test]
    fn test_blank_input_completes_nothing() {
        let engine = engine();
        assert_eq!(engine.complete("", 0), Completion::default());
        assert_eq!(engine.complete("   ", 3), Completion::default());
    }

    #[test]
    fn test_plain_input_searches_history_with_trimmed_line() {
        let mut engine = engine();
        engine.record("cargo build");
        engine.record("cargo test");
        engine.record("cargo test");

        let completion = engine.complete("  cargo te", 10);
        assert_eq!(completion.start, 0);
        assert_eq!(completion.suggestions[0].display_text, "cargo test");
        assert_eq!(completion.suggestions[0].annotation, "used 2 times");
    }

    #[test]
    fn test_only_text_before_the_cursor_is_considered() {
        let mut engine = engine();
        engine.record("make");

        let completion = engine.complete("mk /tmp/whatever", 2);
        assert_eq!(completion.suggestions.len(), 1);
        assert_eq!(completion.suggestions[0].display_text, "make");
    }

    #[test]
    fn test_path_tokens_replace_only_the_argument() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("notes.md"), "").unwrap();
        let root = dir.path().to_str().unwrap();

        let line = format!("vim {root}/no");
        let completion = engine().complete(&line, line.len());

        assert_eq!(completion.start, 4);
        assert_eq!(completion.suggestions.len(), 1);
        assert_eq!(
            completion.suggestions[0].display_text,
            format!("{root}/notes.md")
        );
    }

    #[test]
    fn test_path_after_path_field_replaces_both() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("b.txt"), "").unwrap();
        let root = dir.path().to_str().unwrap();

        let line = format!("cp ./a {root}/b");
        let completion = engine().complete(&line, line.len());

        assert_eq!(completion.start, 3);
        assert_eq!(
            completion.suggestions[0].display_text,
            format!("./a {root}/b.txt")
        );
    }

    #[test]
    fn test_cursor_off_a_char_boundary_is_ignored() {
        let engine = engine();
        assert_eq!(engine.complete("é", 1), Completion::default());
    }
}
