use clap::Parser;

mod cli;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("filegate=info".parse()?)
                .add_directive("filegate_core=info".parse()?)
                .add_directive("tower_http=debug".parse()?)
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Start { port } => {
            cli::commands::start::run(cli.config, port).await?;
        }
        Commands::Status => {
            cli::commands::status::run(cli.config).await?;
        }
        Commands::Rewrite { path } => {
            cli::commands::rewrite::run(cli.config, &path)?;
        }
        Commands::Components { scan, json, write, out } => {
            cli::commands::components::run(cli.config, scan, json, write, out)?;
        }
    }

    Ok(())
}
