use crate::env::Environment;
use argh::FromArgs;
use std::path::PathBuf;

const DEFAULT_SHELL: &str = "bash";
const HISTORY_FILE_NAME: &str = ".bash_history";

#[derive(FromArgs, Debug, Default)]
/// Interactive shell front end with history and path completion.
pub struct Args {
    #[argh(option)]
    /// history log to read and append to; defaults to $HISTFILE, then ~/.bash_history.
    pub history_file: Option<PathBuf>,

    #[argh(option)]
    /// shell used to run commands (default: bash).
    pub shell: Option<String>,

    #[argh(switch, short = 'q')]
    /// do not print the start-up banner.
    pub quiet: bool,
}

/// Settings for one session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// `None` when no location could be determined; history is then kept in memory only.
    pub history_file: Option<PathBuf>,
    pub shell: String,
    pub banner: bool,
}

impl Config {
    /// Combine command-line flags with the environment.
    ///
    /// Flags win over `$HISTFILE`, which wins over `<home>/.bash_history`.
    pub fn resolve(args: Args, env: &Environment) -> Self {
        let history_file = args
            .history_file
            .or_else(|| {
                env.get_var("HISTFILE")
                    .filter(|f| !f.is_empty())
                    .map(PathBuf::from)
            })
            .or_else(|| env.home_dir().map(|home| home.join(HISTORY_FILE_NAME)));
        Self {
            history_file,
            shell: args
                .shell
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_SHELL.to_string()),
            banner: !args.quiet,
        }
    }
}
