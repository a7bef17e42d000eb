//! # rivalscope CLI Application
//!
//! Command-line entry point. `serve` runs the HTTP function (locally or as an
//! Azure Functions custom handler); `analyze` runs a single analysis and
//! prints the report.

mod telemetry;

use std::sync::Arc;

use anyhow::Context;
use clap::{Args, CommandFactory, Parser, Subcommand};
use rivalscope::analysis::{AnalysisRequest, ReportAssembler};
use rivalscope::config::Config;
use rivalscope::crawler::Fetcher;
use rivalscope::insights::PageSpeedClient;
use rivalscope::model::ChatCompletionClient;
use rivalscope::server::HttpServer;
use tracing::instrument;

#[derive(Parser)]
#[command(author, version, about = "SEO competitor analysis backed by an LLM", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Serve the analysis as an HTTP function
    Serve(ServeArgs),

    /// Analyse one URL and print the report as JSON
    Analyze(AnalyzeArgs),
}

#[derive(Args, Debug)]
struct ServeArgs {
    /// Address to listen on (overrides LISTEN_ADDR and FUNCTIONS_CUSTOMHANDLER_PORT)
    #[arg(short, long)]
    listen: Option<String>,
}

#[derive(Args, Debug)]
struct AnalyzeArgs {
    /// URL to analyse
    #[arg(required = true)]
    url: String,

    /// Competitor URL to compare against instead of asking the model (repeatable)
    #[arg(short, long = "competitor")]
    competitors: Vec<String>,

    /// Ask the model for an estimated score increase
    #[arg(short, long)]
    estimate: bool,

    /// Skip the readability section
    #[arg(long)]
    no_readability: bool,

    /// Skip the PageSpeed section
    #[arg(long)]
    no_page_speed: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let _ = dotenvy::dotenv();
    let _otel = telemetry::init_tracing_subscriber()?;

    match cli.command {
        Some(Commands::Serve(args)) => {
            let mut config = Config::from_env()?;
            if let Some(listen) = args.listen {
                config.listen_addr = listen;
            }
            serve_command(config).await?;
        }
        Some(Commands::Analyze(args)) => {
            analyze_command(Config::from_env()?, args).await?;
        }
        None => {
            // If no command is provided, show help
            Cli::command().print_help()?;
        }
    }

    Ok(())
}

fn build_assembler(config: &Config) -> anyhow::Result<ReportAssembler> {
    let model = ChatCompletionClient::new(config.llm.clone())
        .context("Failed to create completion client")?;
    let fetcher = Fetcher::new(config.fetcher.clone())?;

    let mut assembler = ReportAssembler::new(fetcher, Arc::new(model), config.analysis.clone());
    if let Some(page_speed) = &config.page_speed {
        let client = PageSpeedClient::new(&page_speed.api_key)
            .context("Failed to create PageSpeed client")?
            .with_base_url(&page_speed.base_url);
        assembler = assembler.with_page_speed(client);
    }
    Ok(assembler)
}

#[instrument(skip(config))]
async fn serve_command(config: Config) -> anyhow::Result<()> {
    let assembler = Arc::new(build_assembler(&config)?);
    HttpServer::new(config.listen_addr, assembler).run().await?;
    Ok(())
}

#[instrument(skip(config))]
async fn analyze_command(mut config: Config, args: AnalyzeArgs) -> anyhow::Result<()> {
    config.analysis.estimation |= args.estimate;
    config.analysis.readability &= !args.no_readability;
    config.analysis.page_speed &= !args.no_page_speed;
    config.fetcher.include_body_text = config.analysis.readability;

    let mut request = AnalysisRequest::new(args.url);
    if !args.competitors.is_empty() {
        config.analysis.caller_competitors = true;
        request = request.with_competitors(args.competitors);
    }

    let report = build_assembler(&config)?.analyze(request).await?;
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_analyze_with_competitors() {
        let cli = Cli::try_parse_from([
            "rivalscope",
            "analyze",
            "https://example.com",
            "--competitor",
            "https://a.example",
            "-c",
            "https://b.example",
        ])
        .unwrap();

        let Some(Commands::Analyze(args)) = cli.command else {
            panic!("expected analyze");
        };
        assert_eq!(args.url, "https://example.com");
        assert_eq!(args.competitors, vec!["https://a.example", "https://b.example"]);
        assert!(!args.estimate);
    }

    #[test]
    fn test_no_subcommand_parses() {
        let cli = Cli::try_parse_from(["rivalscope"]).unwrap();
        assert!(cli.command.is_none());
        assert!(Cli::command().render_help().to_string().contains("analyze"));
    }
}
