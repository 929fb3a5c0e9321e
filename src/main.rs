use book_lending::{
    adapters::{
        argon2_password_hasher::PasswordHasher as Argon2PasswordHasher,
        memory::{
            AccountRepository as MemoryAccountRepository, BookRepository as MemoryBookRepository,
            NotificationService as MemoryNotificationService, SessionStore as MemorySessionStore,
        },
        postgres::{self, PostgresAccountRepository, PostgresBookRepository},
    },
    api::{handlers::AppState, router::create_router},
    application::{ServiceDependencies, seed_demo_data},
    config::AppConfig,
    ports::{AccountRepository, BookRepository},
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "book_lending=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env().expect("Invalid configuration");

    // Initialize repositories
    let (book_repository, account_repository): (Arc<dyn BookRepository>, Arc<dyn AccountRepository>) =
        match &config.database_url {
            Some(database_url) => {
                tracing::info!("Using PostgreSQL repositories");
                let pool = postgres::connect(database_url, config.database_max_connections)
                    .await
                    .expect("Failed to connect to database");
                (
                    Arc::new(PostgresBookRepository::new(pool.clone())),
                    Arc::new(PostgresAccountRepository::new(pool)),
                )
            }
            None => {
                tracing::info!("DATABASE_URL not set, using in-memory repositories");
                (
                    Arc::new(MemoryBookRepository::new()),
                    Arc::new(MemoryAccountRepository::new()),
                )
            }
        };

    let password_hasher =
        Argon2PasswordHasher::new(config.argon2).expect("Invalid Argon2 parameters");

    // Create service dependencies
    let service_deps = ServiceDependencies {
        book_repository,
        account_repository,
        session_store: Arc::new(MemorySessionStore::new()),
        notification_service: Arc::new(MemoryNotificationService::new()),
        password_hasher: Arc::new(password_hasher),
        session_ttl: config.session_ttl,
    };

    if config.seed_demo_data {
        seed_demo_data(&service_deps)
            .await
            .expect("Failed to seed demo data");
    }

    // Create application state
    let app_state = Arc::new(AppState { service_deps });

    // Create router
    let app = create_router(app_state);

    // Server configuration
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind to address");

    tracing::info!("Server listening on {}", addr);

    // Start server
    axum::serve(listener, app)
        .await
        .expect("Failed to start server");
}
