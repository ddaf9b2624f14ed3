//! An interactive shell front end with history- and path-aware completion.
//!
//! Every keystroke asks the [`CompletionEngine`] for suggestions: the text before the
//! cursor is split by the [`tokenizer`], path-like tokens are completed from the
//! filesystem by the [`PathResolver`], and everything else is fuzzy-matched against
//! previously run commands by the [`Ranker`], most used first. Submitted lines are
//! recorded in the [`HistoryStore`] and run through a system shell.
//!
//! [`Interpreter`] ties it together behind a `rustyline` editor.

mod builtin;
pub mod completion;
pub mod config;
pub mod env;
pub mod error;
mod external;
mod helper;
pub mod history;
mod interpreter;
pub mod paths;
pub mod prompt;
pub mod ranker;
pub mod tokenizer;

#[cfg(test)]
mod testutil;

pub use completion::{Completion, CompletionEngine, Suggestion};
pub use config::{Args, Config};
pub use env::Environment;
pub use external::ExitCode;
pub use history::{HistoryEntry, HistoryStore, RankedSnapshot};
pub use interpreter::{Interpreter, Outcome, is_exit_request};
pub use paths::PathResolver;
pub use ranker::{FuzzyFinder, FuzzyMatch, Ranker, SkimFinder};
