use clap::Parser;
use tracing_subscriber::EnvFilter;
use web_agent::cli::commands::{cmd_plan, cmd_recommend, cmd_run};
use web_agent::cli::config::{Cli, Commands, load_config, resolve_planner};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = load_config(cli.config.as_deref());
    // Resolve planner settings: CLI > config > defaults
    let planner = resolve_planner(&cli, &config);

    match cli.command {
        Commands::Recommend {
            dom,
            instruction,
            hints,
        } => {
            cmd_recommend(&dom, &instruction, hints)?;
        }
        Commands::Plan { dom, instruction } => {
            cmd_plan(&dom, &instruction, &planner, &config)?;
        }
        Commands::Run {
            dom,
            instruction,
            max_replans,
        } => {
            let success = cmd_run(&dom, &instruction, max_replans, &planner, &config)?;
            if !success {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
