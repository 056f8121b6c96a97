use std::sync::Arc;

use anyhow::Context;

use capture_onboarding::channels::{
    Console, ConsolePermissionGateway, ConsolePresenter, FileCaptureGateway,
};
use capture_onboarding::config::AppConfig;
use capture_onboarding::onboarding::{CaptureOutcome, LaunchKind, OnboardingController};
use capture_onboarding::permissions::MediaSource;
use capture_onboarding::store::{FlagStore, LibSqlBackend};

const HELP: &str = "Commands: camera, gallery, status, refresh, onboard, quit";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = AppConfig::from_env().context("invalid configuration")?;

    eprintln!("📸 Capture Onboarding v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Database: {}", config.db_path.display());
    eprintln!("   Gallery:  {}", config.gallery_dir.display());
    eprintln!("   Captures: {}\n", config.output_dir.display());

    let db = Arc::new(
        LibSqlBackend::new_local(&config.db_path)
            .await
            .with_context(|| format!("failed to open database at {}", config.db_path.display()))?,
    );
    let flags: Arc<dyn FlagStore> = db.clone();

    let console = Arc::new(Console::stdin());
    let controller = OnboardingController::new(
        flags,
        Arc::new(ConsolePermissionGateway::new(Arc::clone(&console), db)),
        Arc::new(FileCaptureGateway::new(
            Arc::clone(&console),
            config.gallery_dir.clone(),
            config.output_dir.clone(),
        )),
        Arc::new(ConsolePresenter::new(Arc::clone(&console))),
        config.controller.clone(),
    );

    match controller.initialize().await {
        LaunchKind::FirstLaunch => eprintln!("\nWelcome aboard."),
        LaunchKind::Returning => eprintln!("Welcome back."),
        LaunchKind::Degraded => eprintln!("⚠️  Settings storage unavailable; permissions unknown."),
        LaunchKind::AlreadyInitialized => {}
    }
    print_status(&controller)?;
    eprintln!("{HELP}");

    while let Some(line) = console.read_line("> ").await {
        match line.as_str() {
            "" => continue,
            "camera" => report(controller.attempt_capture(MediaSource::Camera).await),
            "gallery" => report(controller.attempt_capture(MediaSource::Gallery).await),
            "status" => print_status(&controller)?,
            "refresh" => {
                controller.refresh_permission_state().await;
                print_status(&controller)?;
            }
            "onboard" => {
                controller.request_permissions_sequentially().await;
                print_status(&controller)?;
            }
            "quit" | "exit" => break,
            other => eprintln!("Unknown command: {other}. {HELP}"),
        }
    }

    Ok(())
}

fn print_status(controller: &OnboardingController) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(&controller.snapshot())?);
    Ok(())
}

fn report(outcome: CaptureOutcome) {
    match outcome {
        CaptureOutcome::Captured(asset) => println!("🖼  {asset}"),
        CaptureOutcome::Cancelled => eprintln!("Cancelled."),
        // The presenter already showed the advisory.
        CaptureOutcome::PermissionNeeded => {}
        CaptureOutcome::Busy => eprintln!("⏳ Still working on the last photo."),
        CaptureOutcome::Failed { reason } => tracing::debug!(%reason, "Capture failed"),
    }
}
