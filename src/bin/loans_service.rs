use rusty_library_services::{
    adapters::{
        http::HttpBookCatalog, memory::InMemoryLoanRepository, postgres::PostgresLoanRepository,
    },
    api::{LoansState, create_loans_router},
    application::loan::ServiceDependencies,
    config::{LoansSettings, StorageBackend},
    ports::LoanRepository,
    telemetry,
};
use std::sync::Arc;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    // Initialize tracing
    telemetry::init();

    let settings = LoansSettings::from_env()?;

    // Initialize adapters
    let loan_repository: Arc<dyn LoanRepository> = match settings.storage {
        StorageBackend::Postgres => {
            tracing::info!("Database URL: {}", settings.database_url);

            let pool = sqlx::postgres::PgPoolOptions::new()
                .max_connections(settings.database_max_connections)
                .connect(&settings.database_url)
                .await?;

            sqlx::migrate!("./migrations/loans").run(&pool).await?;

            Arc::new(PostgresLoanRepository::new(pool))
        }
        StorageBackend::Memory => {
            tracing::warn!("using in-memory storage, data is lost on shutdown");
            Arc::new(InMemoryLoanRepository::new())
        }
    };

    tracing::info!("Books service URL: {}", settings.books_service_url);

    let book_catalog = Arc::new(HttpBookCatalog::new(
        settings.books_service_url.clone(),
        settings.books_service_api_key.clone(),
        settings.http(),
    )?);

    // Create service dependencies
    let service_deps = ServiceDependencies {
        loan_repository,
        book_catalog,
    };

    // Create application state
    let app_state = Arc::new(LoansState { service_deps });

    // Create router
    let app = create_loans_router(app_state);

    // Server configuration
    let addr = format!("0.0.0.0:{}", settings.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Loans service listening on {}", addr);

    // Start server
    axum::serve(listener, app).await?;

    Ok(())
}
