use clap::Parser;
use experiment_gate::cli::{self, Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cli::init(cli.config.as_deref())?;

    match cli.command {
        Command::List => cli::list::run(&config),
        Command::Render(args) => cli::render::run(&config, args).await,
    }
}
