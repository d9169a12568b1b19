//! Coupon Admin server entry point.

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use coupon_admin::adapters::auth::{MockSessionValidator, OidcConfig, OidcSessionValidator};
use coupon_admin::adapters::events::{EventLogHandler, InMemoryEventBus, COUPON_EVENT_TYPES};
use coupon_admin::adapters::http::{
    build_router, middleware::AuthState, CouponHandlers, CouponScreenSettings, HttpSettings,
};
use coupon_admin::adapters::memory::{InMemoryAdminLog, InMemoryCouponStore};
use coupon_admin::adapters::postgres::{
    PostgresAdminLog, PostgresCouponReader, PostgresCouponRepository,
};
use coupon_admin::application::{
    CreateCouponHandler, GetCouponHandler, ListCouponsHandler, UpdateCouponHandler,
};
use coupon_admin::config::{AppConfig, AuthConfig, DatabaseConfig, ServerConfig};
use coupon_admin::ports::{
    AdminLogWriter, CouponReader, CouponRepository, EventPublisher, EventSubscriber,
};

/// Envelopes and audit lines kept in memory.
const HISTORY_LIMIT: usize = 1_000;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

struct Storage {
    repository: Arc<dyn CouponRepository>,
    reader: Arc<dyn CouponReader>,
    admin_log: Arc<dyn AdminLogWriter>,
}

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let config = AppConfig::load()?;
    init_tracing(&config.server);
    config.validate()?;

    let storage = match &config.database {
        Some(database) => postgres_storage(database).await?,
        None => {
            tracing::warn!("No database configured, coupons are kept in memory");
            memory_storage()
        }
    };

    let bus = Arc::new(InMemoryEventBus::new().with_history_limit(HISTORY_LIMIT));
    bus.subscribe_all(&COUPON_EVENT_TYPES, Arc::new(EventLogHandler::new()));
    let publisher: Arc<dyn EventPublisher> = bus;

    let handlers = CouponHandlers::new(
        Arc::new(CreateCouponHandler::new(
            storage.repository.clone(),
            publisher.clone(),
        )),
        Arc::new(UpdateCouponHandler::new(
            storage.repository.clone(),
            publisher,
        )),
        Arc::new(GetCouponHandler::new(storage.repository.clone())),
        Arc::new(ListCouponsHandler::new(
            storage.reader,
            config.admin.page_size,
        )),
        storage.admin_log,
        CouponScreenSettings {
            default_lang: config.admin.default_lang()?,
            default_expiration_months: config.admin.default_expiration_months,
        },
    );

    let settings = HttpSettings {
        request_timeout: config.http.request_timeout(),
        cors_origins: config.http.allowed_origins(),
    };
    let app = build_router(handlers, session_validator(&config.auth)?, &settings);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, environment = ?config.server.environment, "Coupon admin listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Coupon admin stopped");
    Ok(())
}

fn init_tracing(server: &ServerConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&server.log_level));

    let registry = tracing_subscriber::registry().with(filter);
    if server.is_production() {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

async fn postgres_storage(database: &DatabaseConfig) -> Result<Storage, BoxError> {
    let pool = database.pool_options().connect(&database.url).await?;

    if database.run_migrations {
        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!("Database migrations applied");
    }

    Ok(Storage {
        repository: Arc::new(PostgresCouponRepository::new(pool.clone())),
        reader: Arc::new(PostgresCouponReader::new(pool.clone())),
        admin_log: Arc::new(PostgresAdminLog::new(pool)),
    })
}

fn memory_storage() -> Storage {
    let store = Arc::new(InMemoryCouponStore::new());
    Storage {
        repository: store.clone(),
        reader: store,
        admin_log: Arc::new(InMemoryAdminLog::new().with_history_limit(HISTORY_LIMIT)),
    }
}

fn session_validator(auth: &AuthConfig) -> Result<AuthState, BoxError> {
    if let Some(token) = auth.dev_token() {
        tracing::warn!("Using development token, every request holding it is a full admin");
        return Ok(Arc::new(
            MockSessionValidator::new().with_admin(token, "dev-admin", ["*"]),
        ));
    }

    let oidc = OidcConfig::new(&auth.authority, &auth.audience)
        .with_cache_duration(auth.jwks_cache_ttl());
    Ok(Arc::new(OidcSessionValidator::new(oidc)?))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
