use analyzer::{AnalyzeOutcome, Analyzer};
use anyhow::anyhow;
use commands::{Command, HELP};
use hf_inference::{ReqwestTransport, SentimentClient};
use review_corpus::{DatasetLoader, DatasetSource};
use std::error::Error;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use view::TerminalView;

mod analyzer;
mod commands;
mod config;
mod telemetry;
mod view;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenvy::dotenv().ok();
    let config = config::AnalyzerConfig::try_from_env().map_err(|e| anyhow!("{e}"))?;
    telemetry::init_telemetry(&config.logging)?;

    info!(
        dataset = %config.dataset_source,
        column = %config.text_column,
        model_url = %config.model_url,
        policy = ?config.decision_policy,
        "Starting review analyzer"
    );

    let client = SentimentClient::new(ReqwestTransport::new(&config.model_url))
        .with_decision_policy(config.decision_policy);
    let loader = DatasetLoader::new(
        DatasetSource::parse(&config.dataset_source),
        &config.text_column,
    );
    let analyzer = Analyzer::new(client, loader, TerminalView).with_token(config.hf_token);

    // Load failures are already reported to the view.
    let _ = analyzer.load().await;
    println!("{HELP}");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match Command::parse(&line) {
            Ok(Command::Analyze) => match analyzer.analyze().await {
                AnalyzeOutcome::NoReviews => println!("No reviews loaded, nothing to analyze."),
                AnalyzeOutcome::Busy => println!("An analysis is already running."),
                AnalyzeOutcome::Completed { review, result } => info!(
                    review_chars = review.chars().count(),
                    %result,
                    "Analysis finished"
                ),
                AnalyzeOutcome::Failed { review, error } => info!(
                    review_chars = review.chars().count(),
                    %error,
                    "Analysis finished with an error"
                ),
            },
            Ok(Command::Token(token)) => {
                analyzer.set_token(token);
                if analyzer.has_token() {
                    println!("Token set.");
                } else {
                    println!("Token cleared, requests are sent unauthenticated.");
                }
            }
            Ok(Command::Reload) => {
                let _ = analyzer.load().await;
            }
            Ok(Command::Status) => {
                let load = analyzer.load_status();
                let analysis = analyzer.analysis_status();
                println!("Dataset:  {:?} {}", load.kind, load.message);
                println!("Reviews:  {}", analyzer.review_count());
                println!("Analysis: {:?} {}", analysis.kind, analysis.message);
                println!("Token:    {}", if analyzer.has_token() { "set" } else { "not set" });
                println!("Ready:    {}", analyzer.can_analyze());
            }
            Ok(Command::Help) => println!("{HELP}"),
            Ok(Command::Quit) => break,
            Err(unknown) => println!("Unknown command '{unknown}', type 'help' for commands."),
        }
    }

    info!("Review analyzer stopped");
    Ok(())
}
