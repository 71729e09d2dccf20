mod cli;
mod prompt;
mod spider;

// remote imports
use clap::Parser;
use cli::{Cli, TraceLevel};
use colored::Colorize;
use std::process::ExitCode;
use tearsheet_spider::Config;
use tracing::{error, subscriber, trace, Level};
use tracing_subscriber::FmtSubscriber;

////////////////////////////////////////////////////////////////////////////

// preproccess the trace level
fn preprocess(trace_level: Level) {
    let my_subscriber = FmtSubscriber::builder()
        .with_max_level(trace_level)
        .finish();
    subscriber::set_global_default(my_subscriber).expect("Set subscriber");
}

////////////////////////////////////////////////////////////////////////////

#[tokio::main]
async fn main() -> ExitCode {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    // set the trace level
    if let Some(trace_level) = cli.trace {
        preprocess(match trace_level {
            TraceLevel::DEBUG => Level::DEBUG,
            TraceLevel::ERROR => Level::ERROR,
            TraceLevel::INFO => Level::INFO,
            TraceLevel::TRACE => Level::TRACE,
            TraceLevel::WARN => Level::WARN,
        });
    }
    trace!("command line input recorded: {cli:?}");

    // if no trace level provided, use tui
    let tui = cli.trace.is_none();

    // the one place a failure is reported
    match run(cli, tui).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if tui {
                eprintln!("{}", format!("{err:#}").red());
                eprintln!("{}", "Exiting ...".red());
            } else {
                error!("{err:#}");
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli, tui: bool) -> anyhow::Result<()> {
    let config = Config::from_env();
    let http_client = tearsheet_spider::std_client_build(&config)?;

    // read cli inputs
    use cli::Commands::*;
    match cli.command {
        // `tearsheet upload --spreadsheet <NAME>`: scrape & upload
        Upload {
            spreadsheet,
            symbol,
            categories,
            mode,
        } => {
            let symbol = prompt::symbol(symbol)?;
            let access_token = prompt::access_token(config.access_token.clone())?;
            spider::upload(
                &http_client,
                &config,
                &access_token,
                &spreadsheet,
                &symbol,
                &cli::categories(categories),
                mode.into(),
                tui,
            )
            .await?;
        }

        // `tearsheet show`: scrape & print
        Show {
            symbol,
            categories,
            json,
        } => {
            let symbol = prompt::symbol(symbol)?;
            spider::show(
                &http_client,
                &config,
                &symbol,
                &cli::categories(categories),
                json,
                tui,
                &mut std::io::stdout(),
            )
            .await?;
        }
    }

    Ok(())
}
