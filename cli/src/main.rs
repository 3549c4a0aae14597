//! CLI entrypoint for Study Tutor
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};
use tutor_application::{
    AskTutorUseCase, NoteStore, ReviewCardsUseCase, SaveNoteUseCase, SessionParams,
};
use tutor_infrastructure::{
    API_KEY_ENV, AnkiConnectStore, ConfigLoader, FileConfig, GeminiAnswerGateway,
    LocalFileStore, StorageBackend,
};
use tutor_presentation::{
    BackendArg, Cli, ConsoleFormatter, InteractiveDuplicateResolver, TutorRepl,
};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let _log_guard = init_logging(cli.verbose, cli.log_file.as_deref())?;

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_ref());
        return Ok(());
    }

    let mut config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
            .map_err(|e| anyhow!("Failed to load configuration: {}", e))?
    };
    apply_overrides(&mut config, &cli);
    config.validate().context("Invalid configuration")?;

    info!("Starting Study Tutor");

    let params = SessionParams::default()
        .with_retry(
            config.retry.max_attempts,
            config.retry.empty_delay_secs,
            config.retry.backoff_base_secs,
        )?
        .with_review_tag(config.review.tag.clone())
        .with_review_batch_size(config.review.batch_size);

    // === Dependency Injection ===
    let api_key = config
        .gemini
        .resolved_api_key()
        .with_context(|| format!("{} not set and no [gemini] api_key configured", API_KEY_ENV))?;
    let chat_gateway = Arc::new(GeminiAnswerGateway::new(
        &config.gemini.endpoint,
        &config.gemini.model,
        &api_key,
    )?);
    let review_gateway = Arc::new(GeminiAnswerGateway::new(
        &config.gemini.endpoint,
        &config.gemini.review_model,
        &api_key,
    )?);
    info!(
        model = chat_gateway.model(),
        review_model = review_gateway.model(),
        "Gemini gateways ready"
    );

    let gateways = Gateways {
        chat: chat_gateway,
        review: review_gateway,
    };

    match config.storage.backend {
        StorageBackend::Anki => {
            let store = AnkiConnectStore::new(&config.anki.url, &config.anki.deck)?
                .with_note_model(&config.anki.note_model)
                .with_tag(&config.anki.tag);
            run_session(Arc::new(store), gateways, params, cli.quiet).await
        }
        StorageBackend::Local => {
            let store = LocalFileStore::new(&config.local.notes_file, &config.local.export_file);
            run_session(Arc::new(store), gateways, params, cli.quiet).await
        }
    }
}

struct Gateways {
    chat: Arc<GeminiAnswerGateway>,
    review: Arc<GeminiAnswerGateway>,
}

async fn run_session<S: NoteStore + 'static>(
    store: Arc<S>,
    gateways: Gateways,
    params: SessionParams,
    quiet: bool,
) -> Result<()> {
    if let Err(e) = store.ensure_ready().await {
        warn!(backend = store.name(), "Could not prepare store: {}", e);
        eprintln!("{}", ConsoleFormatter::error(format!("Could not prepare store: {}", e)));
    }

    let save = SaveNoteUseCase::new(store.clone(), Arc::new(InteractiveDuplicateResolver::new()));
    // The session still starts without a cache; every proposal then counts as new
    let cache = match save.load_cache().await {
        Ok(cache) => cache,
        Err(e) => {
            warn!(backend = store.name(), "Could not load notes: {}", e);
            eprintln!("{}", ConsoleFormatter::error(format!("Could not load notes: {}", e)));
            Default::default()
        }
    };
    println!("{}", ConsoleFormatter::welcome(store.name(), cache.len()));

    let ask = AskTutorUseCase::new(gateways.chat).with_policy(params.retry);
    let review = ReviewCardsUseCase::new(
        AskTutorUseCase::new(gateways.review).with_policy(params.retry),
        store,
    )
    .with_batch_size(params.review_batch_size);

    let mut repl = TutorRepl::new(ask, save, review, params, cache).with_progress(!quiet);
    repl.run().await?;
    Ok(())
}

fn apply_overrides(config: &mut FileConfig, cli: &Cli) {
    if let Some(backend) = cli.backend {
        config.storage.backend = match backend {
            BackendArg::Anki => StorageBackend::Anki,
            BackendArg::Local => StorageBackend::Local,
        };
    }
    if let Some(deck) = &cli.deck {
        config.anki.deck = deck.clone();
    }
}

/// Install the subscriber; the returned guard flushes the log file on drop.
fn init_logging(verbose: u8, log_file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace", // -vvv or more
    };

    let Some(path) = log_file else {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::new(level))
            .with_target(false)
            .init();
        return Ok(None);
    };

    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let file_name = path
        .file_name()
        .with_context(|| format!("Invalid log file path: {}", path.display()))?;
    let (writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::never(dir, file_name));

    tracing_subscriber::registry()
        .with(EnvFilter::new(level))
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(fmt::layer().with_ansi(false).with_writer(writer))
        .init();

    Ok(Some(guard))
}
