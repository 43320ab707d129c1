// src/main.rs

use anyhow::Context;
use clap::Parser;
use log::LevelFilter;
use log4rs::{
    append::console::ConsoleAppender,
    append::file::FileAppender,
    config::{Appender, Root},
    encode::pattern::PatternEncoder,
    filter::threshold::ThresholdFilter,
    Config,
};
use podsnips::canva::{CanvaApi, CanvaHttpClient, OAuthSession, TokenFile};
use podsnips::server::AuthState;
use podsnips::youtube::{extract_video_id, watch_url};
use podsnips::{
    run_api_server, run_auth_server, run_export, AppError, ClipPipeline, Command,
    CommandLineInput, ProjectService, Settings, ShortsBundle, ValidationError, YouTubeUploader,
};
use std::fs;
use std::sync::Arc;

/// Sets up logging configuration.
fn setup_logging(verbose: bool) -> anyhow::Result<()> {
    let log_level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let log_file_path = std::env::temp_dir().join("podsnips.log");
    if let Some(parent) = log_file_path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating log directory {}", parent.display()))?;
    }

    let pattern = if verbose {
        "{d(%Y-%m-%d %H:%M:%S)} [{l}] {t} - {m}{n}"
    } else {
        "{m}{n}"
    };

    let stdout_appender = ConsoleAppender::builder()
        .encoder(Box::new(PatternEncoder::new(pattern)))
        .build();

    let file_appender = FileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(
            "{d(%Y-%m-%d %H:%M:%S)} [{l}] {t} - {m}{n}",
        )))
        .build(&log_file_path)
        .with_context(|| format!("opening log file {}", log_file_path.display()))?;

    let config = Config::builder()
        .appender(Appender::builder().build("stdout", Box::new(stdout_appender)))
        .appender(
            Appender::builder()
                .filter(Box::new(ThresholdFilter::new(LevelFilter::Debug)))
                .build("file", Box::new(file_appender)),
        )
        .build(
            Root::builder()
                .appender("stdout")
                .appender("file")
                .build(log_level),
        )?;

    log4rs::init_config(config).context("installing the logger")?;
    log::debug!("Logging initialized. Log file: {}", log_file_path.display());
    Ok(())
}

async fn serve(settings: &Settings, host: &str, port: u16) -> Result<(), AppError> {
    let service = ProjectService::from_settings(settings)?;
    let pipeline = ClipPipeline::from_settings(settings)?;
    run_api_server(host, port, service, pipeline).await?;
    Ok(())
}

async fn authorize(settings: &Settings, host: &str, port: u16) -> Result<(), AppError> {
    let credentials = settings.canva_credentials.clone().ok_or_else(|| {
        AppError::MissingConfiguration(
            "CANVA_CLIENT_ID, CANVA_CLIENT_SECRET and CANVA_REDIRECT_URI must be set".to_string(),
        )
    })?;
    let canva: Arc<dyn CanvaApi> = Arc::new(CanvaHttpClient::new()?);
    let state = AuthState {
        session: OAuthSession::new(credentials, TokenFile::new(settings.token_file.clone())),
        canva,
    };
    run_auth_server(host, port, state).await?;
    Ok(())
}

async fn clip(
    settings: &Settings,
    url: &str,
    start: &str,
    end: &str,
    title: Option<&str>,
    upload: bool,
) -> Result<(), AppError> {
    let video_id =
        extract_video_id(url).ok_or_else(|| ValidationError::InvalidVideoId(url.to_string()))?;
    let pipeline = ClipPipeline::from_settings(settings)?;
    if upload {
        let user = pipeline.check_tokens().await?;
        log::debug!("Canva token accepted for user {}", user);
    }

    let path = pipeline.download(&watch_url(&video_id), start, end, title).await?;
    println!("✓ Clip saved to {}", path.display());

    if upload {
        let outcome = pipeline.upload(&path).await?;
        match outcome.asset_id() {
            Some(asset_id) => println!("✓ Uploaded to Canva as asset {}; local copy removed", asset_id),
            None => eprintln!("⚠️  Upload did not complete: {:?}", outcome),
        }
    }
    Ok(())
}

async fn export(settings: &Settings) -> Result<(), AppError> {
    let (Some(key), Some(source), Some(target)) = (
        settings.notion_api_key.as_ref(),
        settings.source_database_id.as_ref(),
        settings.target_database_id.as_ref(),
    ) else {
        return Err(AppError::MissingConfiguration(
            "NOTION_API_KEY, SOURCE_DATABASE_ID and TARGET_DATABASE_ID must be set".to_string(),
        ));
    };
    let notion = podsnips::NotionHttpClient::new(key)?;

    let report = run_export(&notion, source, target).await?;
    for page in &report.pages {
        println!(
            "{}: {}/{} snips → {}",
            page.episode, page.snips_created, page.snips_found, page.new_status
        );
    }
    println!(
        "📄 Processed {} page(s), created {} snip(s).",
        report.pages.len(),
        report.snips_created()
    );
    Ok(())
}

async fn publish(settings: &Settings, prefix: &str, title: &str) -> Result<(), AppError> {
    let token = settings.youtube_access_token.as_ref().ok_or_else(|| {
        AppError::MissingConfiguration("YOUTUBE_ACCESS_TOKEN not set".to_string())
    })?;
    let bundle = ShortsBundle::from_prefix(prefix).await?;
    let short = YouTubeUploader::new()?
        .publish_short(token, &bundle, title)
        .await?;

    println!("✓ Published video {}", short.video_id);
    println!("  {}", short.watch_url());
    println!("  {}", short.shorts_url());
    if bundle.thumbnail.is_some() && !short.thumbnail_set {
        eprintln!("⚠️  Thumbnail was not set; see the log for details.");
    }
    Ok(())
}

async fn run(cli: CommandLineInput) -> Result<(), AppError> {
    let settings = Settings::from_env(cli.content_dir);
    match cli.command {
        Command::Serve { host, port } => serve(&settings, &host, port).await,
        Command::Auth { host, port } => authorize(&settings, &host, port).await,
        Command::Clip {
            url,
            start,
            end,
            title,
            upload,
        } => clip(&settings, &url, &start, &end, title.as_deref(), upload).await,
        Command::Export => export(&settings).await,
        Command::Publish { prefix, title } => publish(&settings, &prefix, &title).await,
    }
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            eprintln!("⚠️  Could not read .env: {}", e);
        }
    }

    let cli = CommandLineInput::parse();

    setup_logging(cli.verbose)?;

    run(cli).await.context("podsnips failed")?;

    Ok(())
}
