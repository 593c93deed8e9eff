//! FaceGen CLI
//!
//! Command-line tools for checking a host and running the pipeline stages
//! without the server.

#![allow(clippy::print_stdout)]

use std::path::PathBuf;
use std::process::ExitCode;

use ai_lipsync::{LipSyncOutcome, Wav2LipInvoker};
use ai_speech::{SpeechSynthesizer, torch_prober};
use anyhow::Context;
use clap::{Parser, Subcommand};
use infrastructure::{AppConfig, LogFormat, init_logging};

/// FaceGen CLI
#[derive(Parser)]
#[command(name = "facegen-cli")]
#[command(author, version, about = "Talking-head video generator CLI", long_about = None)]
struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Configuration file, with or without extension
    #[arg(short, long, global = true, default_value = "config", env = "FACEGEN_CONFIG")]
    config: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Probe MPS and CUDA and show which device synthesis would use
    Devices,

    /// Check the Wav2Lip checkout and checkpoint
    CheckInstall,

    /// Synthesize speech into a WAV file
    Speak {
        /// Text to speak
        #[arg(short, long)]
        text: String,

        /// Output WAV path
        #[arg(short, long, default_value = "speech.wav")]
        output: PathBuf,
    },

    /// Run lip-sync on an existing face image and WAV
    LipSync {
        /// Face image
        #[arg(long)]
        face: PathBuf,

        /// Speech WAV
        #[arg(long)]
        audio: PathBuf,

        /// Output MP4 path
        #[arg(short, long, default_value = "result.mp4")]
        output: PathBuf,
    },

    /// Query a running server's status
    Status {
        /// Server URL
        #[arg(short, long, default_value = "http://localhost:5001")]
        url: String,
    },
}

/// Determine log filter level from verbosity count
const fn log_filter_from_verbosity(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Format endpoint URL
fn endpoint_url(base_url: &str, path: &str) -> String {
    format!("{}{path}", base_url.trim_end_matches('/'))
}

const fn exit_code(ok: bool) -> ExitCode {
    if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE }
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    init_logging(LogFormat::Text, log_filter_from_verbosity(cli.verbose))
        .context("Failed to initialize logging")?;

    if let Commands::Status { url } = &cli.command {
        let resp = reqwest::Client::new()
            .get(endpoint_url(url, "/status"))
            .send()
            .await?
            .error_for_status()?
            .json::<serde_json::Value>()
            .await?;

        println!("📊 Server Status:");
        println!("{}", serde_json::to_string_pretty(&resp)?);
        return Ok(ExitCode::SUCCESS);
    }

    let config = AppConfig::load_from(&cli.config).context("Failed to load configuration")?;

    match cli.command {
        Commands::Devices => {
            let report = torch_prober(&config.speech).device_info().await;
            println!("🖥️  Device report:");
            println!("{}", serde_json::to_string_pretty(&report)?);
            Ok(ExitCode::SUCCESS)
        },

        Commands::CheckInstall => {
            let invoker = Wav2LipInvoker::new(config.lip_sync)?;
            let report = invoker.installation_report();
            println!("{}", serde_json::to_string_pretty(&report)?);

            if report.is_ready() {
                println!("✅ Wav2Lip is ready");
            } else {
                println!("❌ Wav2Lip is not ready:");
                for problem in report.problems() {
                    println!("   - {problem}");
                }
            }
            Ok(exit_code(report.is_ready()))
        },

        Commands::Speak { text, output } => {
            let synthesizer = SpeechSynthesizer::from_config(&config.speech)?;
            println!("🗣️  Synthesizing {} characters...", text.chars().count());

            match synthesizer.synthesize(&text, &output).await {
                Ok(report) => {
                    println!(
                        "✅ Wrote {} on {} in {:.1}s",
                        report.output.display(),
                        report.device,
                        report.elapsed.as_secs_f64()
                    );
                    for event in &report.events {
                        println!("   ⚠️  {}", serde_json::to_string(event)?);
                    }
                    Ok(ExitCode::SUCCESS)
                },
                Err(failure) => {
                    println!("❌ {failure}");
                    for event in &failure.events {
                        println!("   ⚠️  {}", serde_json::to_string(event)?);
                    }
                    Ok(ExitCode::FAILURE)
                },
            }
        },

        Commands::LipSync {
            face,
            audio,
            output,
        } => {
            let invoker = Wav2LipInvoker::new(config.lip_sync)?;
            println!("🎬 Running lip-sync...");

            let outcome = invoker.run_lip_sync(&face, &audio, &output).await;
            if outcome.is_success() {
                println!("✅ {outcome}");
            } else {
                println!("❌ {outcome}");
                match &outcome {
                    LipSyncOutcome::ProcessFailed { stderr, .. } if !stderr.is_empty() => {
                        println!("{stderr}");
                    },
                    _ => {},
                }
            }
            Ok(exit_code(outcome.is_success()))
        },

        Commands::Status { .. } => Ok(ExitCode::SUCCESS),
    }
}
