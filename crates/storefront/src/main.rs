//! Tee Storefront - single-product page in the terminal.
//!
//! Loads the product (cache first, then the rate-limited product endpoint),
//! renders it, and reads page events from stdin until `quit`.
//!
//! # Architecture
//!
//! - `tee_storefront::page::PageController` owns the cart and selection
//! - `TerminalRenderer` implements the page's render surface
//! - Product cache and rate window persist in a JSON store file between runs
//! - One `current_thread` runtime; the only suspension point is the fetch

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::process::ExitCode;
use std::sync::Arc;

use sentry::integrations::tracing as sentry_tracing;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tee_storefront::clock::{Clock, SystemClock};
use tee_storefront::config::StorefrontConfig;
use tee_storefront::error::{AppError, Result};
use tee_storefront::page::PageController;
use tee_storefront::product::{HttpProductSource, ProductDataService, ProductSource};
use tee_storefront::store::{FileStore, KeyValueStore};
use tee_storefront::view::ViewRenderer;

mod terminal;

use terminal::{Command, HELP, TerminalRenderer};

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &StorefrontConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            sample_rate: config.sentry_sample_rate,
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Load configuration from environment (needed for Sentry init)
    let config = StorefrontConfig::from_env().expect("Failed to load configuration");

    // Initialize Sentry (must be done before tracing subscriber)
    let _sentry_guard = init_sentry(&config);

    // Logs go to stderr so they don't interleave with the rendered page
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "tee_storefront=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    match run(&config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            e.report();
            ExitCode::FAILURE
        }
    }
}

async fn run(config: &StorefrontConfig) -> Result<()> {
    let store = Arc::new(FileStore::open(&config.store_path)?);
    tracing::info!(path = %store.path().display(), "Using store file");

    let source = HttpProductSource::new(&config.product_api);
    let products = ProductDataService::new(store, source, SystemClock);
    let mut page = PageController::new(products, TerminalRenderer::new(std::io::stdout()));

    load(&mut page).await;
    page.view_mut().line(HELP);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines
        .next_line()
        .await
        .map_err(|e| AppError::Internal(format!("failed to read stdin: {e}")))?
    {
        let Some(command) = Command::parse(&line) else {
            if !line.trim().is_empty() {
                page.view_mut().line("? unknown command (try `help`)");
            }
            continue;
        };

        match command {
            Command::Size(label) => {
                if let Err(e) = page.on_size_selected(&label) {
                    AppError::from(e).report();
                }
            }
            Command::Add => {
                if let Err(e) = page.on_add_to_cart_clicked() {
                    AppError::from(e).report();
                }
            }
            Command::Quantity { size, raw } => {
                if page.on_cart_quantity_changed(&size, &raw).is_none() {
                    page.view_mut().line("? quantity must be a whole number");
                }
            }
            Command::ToggleCart => {
                page.on_cart_toggle_clicked();
            }
            Command::ClickOutside => page.on_document_clicked(false),
            Command::Reload => load(&mut page).await,
            Command::Help => page.view_mut().line(HELP),
            Command::Quit => break,
        }
    }

    tracing::info!(
        line_items = page.cart().len(),
        "Leaving page, cart discarded"
    );
    Ok(())
}

/// Load and render the product, reporting failures without ending the session.
async fn load<S, P, C, V>(page: &mut PageController<S, P, C, V>)
where
    S: KeyValueStore,
    P: ProductSource,
    C: Clock,
    V: ViewRenderer,
{
    match page.load_product().await {
        Ok(Some(_)) => {}
        Ok(None) => {
            AppError::RateLimited.report();
        }
        Err(e) => AppError::from(e).report(),
    }
}
