use crate::builtin::Cd;
use crate::completion::CompletionEngine;
use crate::config::Config;
use crate::env::Environment;
use crate::external::{ExitCode, ShellCommand};
use crate::helper::SmartHelper;
use crate::history::HistoryStore;
use crate::paths::PathResolver;
use crate::prompt;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::{CompletionType, Config as EditorConfig, Editor};
use std::path::PathBuf;
use tracing::warn;

/// What happened to a submitted line.
#[derive(Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Blank input; nothing ran.
    Skipped,
    /// `cd` succeeded; the new working directory.
    ChangedDir(PathBuf),
    /// The command ran in the shell and exited with this code.
    Ran(ExitCode),
}

/// `exit` or `quit`, surrounded by optional whitespace.
pub fn is_exit_request(line: &str) -> bool {
    matches!(line.trim(), "exit" | "quit")
}

/// The interactive loop: prompt, read with completion, run, remember.
///
/// ```no_run
/// use smartsh::{Config, Environment, Interpreter};
///
/// let env = Environment::new();
/// let config = Config::resolve(Default::default(), &env);
/// Interpreter::new(config, env).repl().unwrap();
/// ```
pub struct Interpreter {
    env: Environment,
    config: Config,
}

impl Interpreter {
    pub fn new(config: Config, env: Environment) -> Self {
        Self { env, config }
    }

    pub fn env(&self) -> &Environment {
        &self.env
    }

    /// Build the completion engine for this session, loading persisted history.
    pub fn engine(&self) -> CompletionEngine {
        let history = match &self.config.history_file {
            Some(path) => HistoryStore::open(path),
            None => HistoryStore::in_memory(),
        };
        CompletionEngine::new(history, PathResolver::new(self.env.home_dir()))
    }

    /// Run one submitted line.
    ///
    /// `cd` is handled in-process and only recorded when it succeeds. Everything else
    /// is recorded first and then handed to the configured shell; its exit status is
    /// returned but carries no meaning for the loop.
    pub fn execute(&mut self, line: &str, history: &mut HistoryStore) -> anyhow::Result<Outcome> {
        let input = line.trim();
        if input.is_empty() {
            return Ok(Outcome::Skipped);
        }

        let mut fields = input.split_whitespace();
        if fields.next() == Some(Cd::NAME) {
            let args: Vec<&str> = fields.collect();
            let dir = Cd::parse(&args)?.execute(&mut self.env)?;
            history.append(input);
            return Ok(Outcome::ChangedDir(dir));
        }

        history.append(input);
        let code = ShellCommand::new(&self.config.shell, input, &self.env).execute(&self.env)?;
        Ok(Outcome::Ran(code))
    }

    /// Read-eval loop until `exit`, `quit` or end of input.
    pub fn repl(&mut self) -> rustyline::Result<()> {
        let editor_config = EditorConfig::builder()
            .completion_type(CompletionType::List)
            .auto_add_history(false)
            .build();
        let mut rl: Editor<SmartHelper, DefaultHistory> = Editor::with_config(editor_config)?;
        rl.set_helper(Some(SmartHelper::new(self.engine())));

        loop {
            let readline = rl.readline(&prompt::render(&self.env));
            match readline {
                Ok(line) => {
                    if is_exit_request(&line) {
                        break;
                    }
                    if line.trim().is_empty() {
                        continue;
                    }
                    rl.add_history_entry(line.trim())?;
                    let Some(helper) = rl.helper_mut() else {
                        break;
                    };
                    if let Err(e) = self.execute(&line, helper.engine.history_mut()) {
                        eprintln!("{e:#}");
                    }
                }
                Err(ReadlineError::Interrupted) => continue,
                Err(ReadlineError::Eof) => break,
                Err(err) => {
                    warn!("line editor failed: {err}");
                    return Err(err);
                }
            }
        }

        Ok(())
    }
}
