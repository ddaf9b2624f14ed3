use smartsh::{Args, Config, Environment, Interpreter};
use tracing_subscriber::EnvFilter;

fn init_logging() {
    // Diagnostics go to stderr and stay quiet unless RUST_LOG asks for more.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() -> anyhow::Result<()> {
    let args: Args = argh::from_env();
    init_logging();

    let env = Environment::new();
    let config = Config::resolve(args, &env);
    tracing::debug!(?config, "starting session");

    if config.banner {
        println!("smartsh: commands from your history, paths from your disk.");
        println!("Press Tab for suggestions; type 'exit' or 'quit' to leave.");
    }

    Interpreter::new(config, env).repl()?;
    Ok(())
}
