//! Line-editor glue: exposes the completion engine to `rustyline`.

use crate::completion::{CompletionEngine, Suggestion};
use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::{Context, Helper, Validator};
use std::borrow::Cow;

/// Tab completion lists every suggestion; an inline hint previews the best one.
#[derive(Helper, Validator)]
pub struct SmartHelper {
    pub engine: CompletionEngine,
}

impl SmartHelper {
    pub fn new(engine: CompletionEngine) -> Self {
        Self { engine }
    }
}

fn to_pair(suggestion: Suggestion) -> Pair {
    Pair {
        display: format!("{}  {}", suggestion.display_text, suggestion.annotation),
        replacement: suggestion.display_text,
    }
}

impl Completer for SmartHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let completion = self.engine.complete(line, pos);
        Ok((
            completion.start,
            completion.suggestions.into_iter().map(to_pair).collect(),
        ))
    }
}

impl Hinter for SmartHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        if pos < line.len() {
            return None;
        }
        let completion = self.engine.complete(line, pos);
        let typed = line.get(completion.start..pos)?;
        completion.suggestions.iter().find_map(|s| {
            s.display_text
                .strip_prefix(typed)
                .filter(|rest| !rest.is_empty())
                .map(str::to_string)
        })
    }
}

impl Highlighter for SmartHelper {
    fn highlight_hint<'h>(&self, hint: &'h str) -> Cow<'h, str> {
        Cow::Owned(format!("\x1b[2m{hint}\x1b[0m"))
    }
}
