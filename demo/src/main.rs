// ./demo/src/main.rs
use chrono::{TimeZone, Utc};
use std::sync::Arc;
use tracing::{error, info, level_filters::LevelFilter};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use application::{ApplicationError, DocumentStore};
use domain::{Author, Document, SearchRequest};
use infrastructure::InMemoryDocumentRepository;

// Application entry point
#[tokio::main]
async fn main() {
    // --- Logger Initialization ---
    let filter: EnvFilter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
    info!("Logger initialized successfully.");

    // --- Dependency Injection ---
    let document_repository = Arc::new(InMemoryDocumentRepository::new());
    let store = DocumentStore::new(document_repository);
    info!("In-memory document store initialized.");

    if let Err(e) = run(&store).await {
        error!("Demo session failed: {}", e);
        std::process::exit(1);
    }
}

async fn run(store: &DocumentStore) -> Result<(), ApplicationError> {
    let ferris = Author::new("a1", "Ferris");
    let corro = Author::new("a2", "Corro");

    let intro = store
        .save(
            Document::new()
                .with_title("Introduction to ownership")
                .with_content("Every value has a single owner")
                .with_author(ferris.clone())
                .with_created(timestamp(2024, 1, 10)),
        )
        .await?;
    store
        .save(
            Document::new()
                .with_title("Advanced traits")
                .with_content("Associated types and blanket impls")
                .with_author(corro)
                .with_created(timestamp(2024, 2, 5)),
        )
        .await?;
    store
        .save(
            Document::new()
                .with_title("Intro to async")
                .with_content("Futures do nothing until polled")
                .with_author(ferris),
        )
        .await?;
    store
        .save(Document::new().with_content("Loose note without title or author"))
        .await?;

    // Full replacement of the first document, keeping its position
    if let Some(id) = intro.assigned_id() {
        store
            .save(
                Document {
                    title: Some("Introduction to ownership (2nd edition)".to_string()),
                    ..intro.clone()
                },
            )
            .await?;
        print_json("find_by_id", &store.find_by_id(id.as_str()).await?);
    }

    let requests = [
        ("all documents", SearchRequest::new()),
        (
            "titles starting with \"Intro\"",
            SearchRequest::new().with_title_prefixes(["Intro"]),
        ),
        (
            "by a1 created from 2024-01-01",
            SearchRequest::new()
                .with_author_ids(["a1"])
                .created_from(timestamp(2024, 1, 1)),
        ),
        (
            "content mentions \"polled\" or \"note\"",
            SearchRequest::new().with_contains_contents(["polled", "note"]),
        ),
        (
            "authorless documents",
            SearchRequest::new().including_authorless(),
        ),
    ];
    for (label, request) in &requests {
        let hits = store.search(request).await?;
        print_json(label, &hits);
    }

    info!(total = store.len().await?, "Demo session finished");
    Ok(())
}

fn timestamp(year: i32, month: u32, day: u32) -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 0, 0, 0)
        .single()
        .unwrap_or_default()
}

fn print_json<T: serde::Serialize>(label: &str, value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("# {label}\n{json}"),
        Err(e) => error!(label, "Failed to serialize output: {}", e),
    }
}
