use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    init_tracing();

    let cli = tasksense::cli::Cli::parse();
    let config = tasksense::config::from_cli(&cli)?;

    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    tasksense::commands::execute(&config, cli.command, &mut handle)?;

    Ok(())
}

fn init_tracing() {
    let env_filter = EnvFilter::builder()
        .with_default_directive(tracing_subscriber::filter::LevelFilter::WARN.into())
        .from_env_lossy();

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .try_init();
}
