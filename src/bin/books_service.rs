use rusty_library_services::{
    adapters::{
        http::GoogleBooksMetadataLookup,
        memory::{InMemoryBookRepository, InMemoryRatingRepository},
        postgres::{PostgresBookRepository, PostgresRatingRepository},
    },
    api::{BooksState, create_books_router},
    application::book::ServiceDependencies,
    config::{BooksSettings, StorageBackend},
    ports::{BookRepository, RatingRepository},
    telemetry,
};
use std::sync::Arc;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    // Initialize tracing
    telemetry::init();

    let settings = BooksSettings::from_env()?;

    // Initialize adapters
    let book_repository: Arc<dyn BookRepository>;
    let rating_repository: Arc<dyn RatingRepository>;
    match settings.storage {
        StorageBackend::Postgres => {
            tracing::info!("Database URL: {}", settings.database_url);

            let pool = sqlx::postgres::PgPoolOptions::new()
                .max_connections(settings.database_max_connections)
                .connect(&settings.database_url)
                .await?;

            sqlx::migrate!("./migrations/books").run(&pool).await?;

            book_repository = Arc::new(PostgresBookRepository::new(pool.clone()));
            rating_repository = Arc::new(PostgresRatingRepository::new(pool));
        }
        StorageBackend::Memory => {
            tracing::warn!("using in-memory storage, data is lost on shutdown");
            book_repository = Arc::new(InMemoryBookRepository::new());
            rating_repository = Arc::new(InMemoryRatingRepository::new());
        }
    }

    let metadata_lookup = Arc::new(GoogleBooksMetadataLookup::new(
        settings.metadata_api_url.clone(),
        settings.http(),
    )?);

    // Create service dependencies
    let service_deps = ServiceDependencies {
        book_repository,
        rating_repository,
        metadata_lookup,
    };

    // Create application state
    let app_state = Arc::new(BooksState {
        service_deps,
        api_key: settings.books_api_key.clone(),
    });

    // Create router
    let app = create_books_router(app_state);

    // Server configuration
    let addr = format!("0.0.0.0:{}", settings.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Books service listening on {}", addr);

    // Start server
    axum::serve(listener, app).await?;

    Ok(())
}
