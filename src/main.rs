use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use echonote::{AuthClient, BackendClient, Config, ResultView, TranscriptionSession};
use std::io::Write;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "echonote")]
#[command(about = "Upload or record audio and fetch transcripts, summaries, key points, and speaker diarization")]
struct Cli {
    /// Config file path, without extension
    #[arg(long, default_value = "config/echonote")]
    config: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Upload an audio file and print the transcription results
    Transcribe {
        file: PathBuf,

        /// Also write result documents to the export directory
        #[arg(long)]
        export: bool,
    },

    /// Record from the microphone, then transcribe the recording
    ///
    /// While recording, type "pause", "resume", or "stop" and press enter.
    Record {
        /// Also write result documents (and the recording) to the export
        /// directory
        #[arg(long)]
        export: bool,
    },

    /// Extract key points from a saved transcript file
    Keypoints { transcript: PathBuf },

    /// Sign in with email and password
    Login { email: String, password: String },

    /// Create an email/password account
    Signup { email: String, password: String },

    /// Send a password-reset email
    ResetPassword { email: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let cfg = Config::load(&cli.config)
        .with_context(|| format!("Failed to load config: {}", cli.config))?;

    info!("{} v0.1.0", cfg.service.name);

    match cli.command {
        Command::Transcribe { file, export } => {
            let mut session = TranscriptionSession::new(cfg);
            session.select_file(&file)?;
            run_transcription(&mut session, export).await
        }

        Command::Record { export } => {
            let mut session = TranscriptionSession::new(cfg);
            record_interactive(&mut session).await?;

            if session.source().is_none() {
                println!("No recording captured.");
                return Ok(());
            }

            if export {
                let path = session.save_source()?;
                println!("Recording saved to {}", path.display());
            }

            run_transcription(&mut session, export).await
        }

        Command::Keypoints { transcript } => {
            let text = std::fs::read_to_string(&transcript)
                .with_context(|| format!("Failed to read {}", transcript.display()))?;

            let client = BackendClient::new(&cfg.backend);
            let points = client.extract_key_points(&text).await?;

            for (i, point) in points.iter().enumerate() {
                println!("{}. {}", i + 1, point);
            }

            Ok(())
        }

        Command::Login { email, password } => {
            let client = AuthClient::new(&cfg.auth);
            let session = client.sign_in(&email, &password).await?;
            println!("Signed in as {} (user id {})", session.email, session.local_id);
            Ok(())
        }

        Command::Signup { email, password } => {
            let client = AuthClient::new(&cfg.auth);
            let session = client.sign_up(&email, &password).await?;
            println!("Account created for {} (user id {})", session.email, session.local_id);
            Ok(())
        }

        Command::ResetPassword { email } => {
            let client = AuthClient::new(&cfg.auth);
            client.send_password_reset(&email).await?;
            println!("Password reset email sent to {email}");
            Ok(())
        }
    }
}

/// Drive a microphone recording from stdin commands.
async fn record_interactive(session: &mut TranscriptionSession) -> Result<()> {
    session.start_recording().await?;
    println!("Recording. Commands: pause | resume | stop");

    let stdin = BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();

    while let Some(line) = lines.next_line().await? {
        match line.trim() {
            "pause" => session.pause_recording(),
            "resume" => session.resume_recording(),
            "stop" => {
                session.stop_recording().await?;
                println!("Recording stopped.");
                break;
            }
            "" => {}
            other => println!("Unknown command: {other}"),
        }

        if let Some(status) = session.recording_status() {
            println!("{status}");
        }
    }

    Ok(())
}

/// Upload the active source, printing progress, then render each available
/// result view.
async fn run_transcription(session: &mut TranscriptionSession, export: bool) -> Result<()> {
    let mut progress_rx = session.subscribe_progress();
    let progress_task = tokio::spawn(async move {
        while progress_rx.changed().await.is_ok() {
            let progress = *progress_rx.borrow();
            if progress.in_flight {
                print!("\rUploading... {}%", progress.percent);
                let _ = std::io::stdout().flush();
            }
        }
    });

    let outcome = session.transcribe().await;
    println!();
    progress_task.abort();
    outcome?;

    if let Some(text) = session.presenter().render(ResultView::Transcript) {
        println!("--- Transcript ---");
        println!("{text}");
    }

    if let Some(text) = session.presenter().render(ResultView::Diarization) {
        println!("--- Speaker diarization ---");
        println!("{text}");
    }

    if let Some(summary) = session.ensure_summary().await? {
        println!("--- Summary ---");
        println!("{summary}");
    }

    if let Some(text) = session.presenter().render(ResultView::KeyPoints) {
        println!("--- Key points ---");
        println!("{text}");
    }

    if export {
        for view in [
            ResultView::Transcript,
            ResultView::Summary,
            ResultView::KeyPoints,
            ResultView::Diarization,
        ] {
            if session.presenter().available(view) {
                let path = session.export(view)?;
                println!("Saved {}", path.display());
            }
        }
    }

    Ok(())
}
