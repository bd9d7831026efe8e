use clap::Parser;
use qa_scout::cli::commands::{cmd_analyze, cmd_generate, cmd_login};
use qa_scout::cli::config::{Cli, Commands, load_config};
use qa_scout::trace::logger::init_logging;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.trace_file.as_deref())?;
    let config = load_config(cli.config.as_deref());

    match cli.command {
        Commands::Analyze { url, format } => {
            cmd_analyze(&config, &url, &format, cli.headed)?;
        }
        Commands::Generate {
            url,
            credentials,
            login,
            format,
        } => {
            cmd_generate(
                &config,
                &url,
                &credentials,
                login,
                format.as_deref(),
                cli.headed,
            )?;
        }
        Commands::Login { url, credentials } => {
            let success = cmd_login(&config, &url, &credentials, cli.headed)?;
            if !success {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
