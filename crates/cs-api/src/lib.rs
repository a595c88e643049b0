use std::env;
use std::net::{IpAddr, SocketAddr};
use std::num::NonZeroU32;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use axum::{
    Router,
    body::Body,
    extract::DefaultBodyLimit,
    extract::State,
    extract::connect_info::ConnectInfo,
    http::Method,
    http::Request,
    http::header::{AUTHORIZATION, CONTENT_TYPE, HeaderName, HeaderValue},
    middleware,
    middleware::Next,
    response::Response,
    routing::{get, post},
};
use clap::Parser;
use cs_common::db::{PgCandidateStore, PoolSettings, create_pool_from_url, run_migrations};
use cs_common::logging::{init_tracing_subscriber, install_tracing_panic_hook};
use cs_common::{CandidateStore, MemoryCandidateStore, SearchConfig, load_seed_documents};
use cs_metrics::init_metrics;
use dotenvy::dotenv;
use governor::{
    Quota, RateLimiter, clock::DefaultClock, middleware::NoOpMiddleware,
    state::keyed::DashMapStateStore,
};
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};

pub mod auth;
pub mod error;
pub mod handlers;

use auth::{AuthConfig, AuthMode};
use error::ApiError;
use handlers::{candidates, health};

const SHUTDOWN_DRAIN_GRACE: Duration = Duration::from_millis(200);
const MAX_BODY_BYTES: usize = 64 * 1024;

#[derive(Debug, Clone, Parser)]
#[command(name = "cs-api", about = "HTTP API for recruiter candidate search")]
struct Cli {
    /// PostgreSQL connection string; without it candidates are served from memory
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,

    /// Server port
    #[arg(long, env = "PORT", default_value_t = 3001)]
    port: u16,

    /// API key for X-API-Key authentication
    #[arg(long, env = "CS_API_KEY")]
    api_key: Option<String>,

    /// Authentication mode: api_key | jwt
    #[arg(long, env = "AUTH_MODE", default_value = "api_key", value_enum)]
    auth_mode: AuthMode,

    /// HS256 secret for AUTH_MODE=jwt
    #[arg(long, env = "JWT_SECRET")]
    jwt_secret: Option<String>,

    /// Comma separated list of allowed CORS origins
    #[arg(long, env = "CS_CORS_ORIGINS", default_value = "http://localhost:3000")]
    cors_origins: String,

    /// JSON array of candidate profiles loaded at startup
    #[arg(long, env = "CS_SEED_FILE")]
    seed_file: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: Option<String>,
    pub port: u16,
    pub cors_origins: Vec<String>,
    pub auth: AuthConfig,
    pub seed_file: Option<PathBuf>,
}

impl AppConfig {
    fn from_cli(cli: Cli) -> Result<Self, ApiError> {
        let cors_origins = cli
            .cors_origins
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect::<Vec<_>>();

        if cors_origins.iter().any(|origin| origin == "*") {
            return Err(ApiError::BadRequest(
                "CS_CORS_ORIGINS must list explicit origins when credentials are enabled".into(),
            ));
        }

        let auth = AuthConfig {
            mode: cli.auth_mode,
            api_key: cli.api_key,
            jwt_secret: cli.jwt_secret,
        };

        match auth.mode {
            AuthMode::ApiKey if auth.api_key.is_none() => {
                return Err(ApiError::BadRequest(
                    "CS_API_KEY is required when AUTH_MODE=api_key".into(),
                ));
            }
            AuthMode::Jwt if auth.jwt_secret.is_none() => {
                return Err(ApiError::BadRequest(
                    "JWT_SECRET is required when AUTH_MODE=jwt".into(),
                ));
            }
            _ => {}
        }

        Ok(Self {
            database_url: cli.database_url.filter(|url| !url.trim().is_empty()),
            port: cli.port,
            cors_origins,
            auth,
            seed_file: cli.seed_file,
        })
    }

    pub fn for_tests(auth: AuthConfig) -> Self {
        Self {
            database_url: None,
            port: 3001,
            cors_origins: vec!["http://localhost:3000".into()],
            auth,
            seed_file: None,
        }
    }
}

type IpRateLimiter = RateLimiter<IpAddr, DashMapStateStore<IpAddr>, DefaultClock, NoOpMiddleware>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitConfig {
    pub per_sec: u64,
    pub burst: u32,
}

impl RateLimitConfig {
    fn parse_positive<T: std::str::FromStr + PartialOrd + Default>(raw: Option<String>) -> Option<T> {
        raw.and_then(|value| value.trim().parse::<T>().ok())
            .filter(|value| *value > T::default())
    }

    fn from_vars(per_sec: Option<String>, burst: Option<String>) -> Self {
        Self {
            per_sec: Self::parse_positive(per_sec).unwrap_or(20),
            burst: Self::parse_positive(burst).unwrap_or(40),
        }
    }

    fn from_env() -> Self {
        Self::from_vars(
            env::var("CS_RATE_LIMIT_PER_SEC").ok(),
            env::var("CS_RATE_LIMIT_BURST").ok(),
        )
    }
}

fn build_ip_limiter(config: &RateLimitConfig) -> Arc<IpRateLimiter> {
    let nanos_per_token = (1_000_000_000u64 / config.per_sec.max(1)).max(1);
    let burst = NonZeroU32::new(config.burst).unwrap_or(NonZeroU32::MIN);
    let quota = Quota::with_period(Duration::from_nanos(nanos_per_token))
        .unwrap_or_else(|| Quota::per_second(NonZeroU32::MIN))
        .allow_burst(burst);

    Arc::new(RateLimiter::keyed(quota))
}

pub fn default_rate_limiter() -> Arc<IpRateLimiter> {
    build_ip_limiter(&RateLimitConfig::from_env())
}

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn CandidateStore>,
    pub store_kind: &'static str,
    pub config: AppConfig,
    pub search_config: SearchConfig,
    pub(crate) rate_limiter: Arc<IpRateLimiter>,
    pub readiness: Arc<AtomicBool>,
}

pub type SharedState = Arc<AppState>;

impl axum::extract::FromRef<SharedState> for AuthConfig {
    fn from_ref(input: &SharedState) -> AuthConfig {
        input.config.auth.clone()
    }
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed = origins
        .iter()
        .filter_map(|origin| origin.parse::<HeaderValue>().ok())
        .collect::<Vec<_>>();

    CorsLayer::new()
        .allow_origin(allowed)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            AUTHORIZATION,
            CONTENT_TYPE,
            HeaderName::from_static(auth::API_KEY_HEADER),
        ])
        .allow_credentials(true)
}

fn request_ip<B>(req: &Request<B>) -> Option<IpAddr> {
    req.extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|info| info.0.ip())
}

async fn rate_limit(
    State(state): State<SharedState>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    if let Some(client_ip) = request_ip(&req) {
        if state.rate_limiter.check_key(&client_ip).is_err() {
            return Err(ApiError::TooManyRequests("rate limit exceeded".into()));
        }
    }

    Ok(next.run(req).await)
}

async fn attach_request_id_context(req: Request<Body>, next: Next) -> Result<Response, ApiError> {
    let request_id = req
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .map(|value| value.to_string());

    Ok(error::with_request_id(request_id, next.run(req)).await)
}

pub fn create_router(state: SharedState) -> Router {
    let cors = cors_layer(&state.config.cors_origins);

    let request_id_header = HeaderName::from_static("x-request-id");
    let trace_header = request_id_header.clone();

    let trace = TraceLayer::new_for_http().make_span_with(move |request: &Request<Body>| {
        let request_id = request
            .headers()
            .get(&trace_header)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("");

        tracing::info_span!(
            "http_request",
            method = %request.method(),
            uri = %request.uri(),
            request_id = %request_id,
            status = tracing::field::Empty,
        )
    });

    let api_routes = Router::new()
        .route(
            "/candidates/advanced-search",
            post(candidates::advanced_search),
        )
        .route("/candidates/search", post(candidates::legacy_search))
        .route("/candidates/suggestions", get(candidates::suggestions));

    Router::new()
        .route("/livez", get(health::livez))
        .route("/readyz", get(health::readyz))
        .nest("/api", api_routes)
        .layer(middleware::from_fn_with_state(state.clone(), rate_limit))
        .layer(middleware::from_fn(attach_request_id_context))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(trace)
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(SetRequestIdLayer::new(
            request_id_header,
            MakeRequestUuid::default(),
        ))
        .layer(cors)
        .with_state(state)
}

fn state_with_store(
    store: Arc<dyn CandidateStore>,
    store_kind: &'static str,
    config: AppConfig,
    search_config: SearchConfig,
) -> SharedState {
    Arc::new(AppState {
        store,
        store_kind,
        config,
        search_config,
        rate_limiter: default_rate_limiter(),
        readiness: Arc::new(AtomicBool::new(true)),
    })
}

fn api_key_config(api_key: &str) -> AppConfig {
    AppConfig::for_tests(AuthConfig {
        mode: AuthMode::ApiKey,
        api_key: Some(api_key.to_string()),
        jwt_secret: None,
    })
}

/// Router state over an empty in-memory store.
pub fn test_state(api_key: &str) -> SharedState {
    test_state_with_store(api_key, Arc::new(MemoryCandidateStore::default()))
}

pub fn test_state_with_store(api_key: &str, store: Arc<dyn CandidateStore>) -> SharedState {
    state_with_store(store, "memory", api_key_config(api_key), SearchConfig::default())
}

/// Postgres when `DATABASE_URL` is set, otherwise process memory. The seed
/// file fills the memory store, or an empty Postgres table.
async fn build_store(config: &AppConfig) -> Result<(Arc<dyn CandidateStore>, &'static str), ApiError> {
    let Some(database_url) = config.database_url.as_deref() else {
        let documents = match config.seed_file.as_ref() {
            Some(path) => load_seed_documents(path)?,
            None => {
                warn!("DATABASE_URL not set; serving an empty in-memory candidate store");
                Vec::new()
            }
        };
        info!(candidates = documents.len(), "using in-memory candidate store");
        let store: Arc<dyn CandidateStore> = Arc::new(MemoryCandidateStore::new(documents));
        return Ok((store, "memory"));
    };

    let pool = create_pool_from_url(database_url, &PoolSettings::from_env())?;
    run_migrations(&pool).await?;
    let store = PgCandidateStore::new(pool);

    if let Some(path) = config.seed_file.as_ref() {
        if store.count_all().await? == 0 {
            let documents = load_seed_documents(path)?;
            store.import_documents(&documents).await?;
        } else {
            info!("candidate table already populated; skipping seed file");
        }
    }

    let store: Arc<dyn CandidateStore> = Arc::new(store);
    Ok((store, "postgres"))
}

pub async fn run() -> Result<(), ApiError> {
    dotenv().ok();
    init_tracing_subscriber(env!("CARGO_PKG_NAME"));
    install_tracing_panic_hook(env!("CARGO_PKG_NAME"));

    let cli = Cli::parse();
    let config = AppConfig::from_cli(cli)?;
    init_metrics("CS_METRICS_PORT", 9101);

    let (store, store_kind) = build_store(&config).await?;
    let state = state_with_store(store, store_kind, config.clone(), SearchConfig::from_env());

    let addr: SocketAddr = ([0, 0, 0, 0], config.port).into();
    let app = create_router(state.clone());

    info!(%addr, auth_mode = ?config.auth.mode, store = store_kind, "cs-api listening");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|err| ApiError::Internal(err.to_string()))?;

    let service = app.into_make_service_with_connect_info::<SocketAddr>();

    axum::serve(listener, service)
        .with_graceful_shutdown(shutdown_signal(state.clone()))
        .await
        .map_err(|err| ApiError::Internal(err.to_string()))?;

    Ok(())
}

async fn shutdown_signal(state: SharedState) {
    let ctrl_c = async {
        let _ = tokio::signal::ctrl_c().await;
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        if let Ok(mut sigterm) = signal(SignalKind::terminate()) {
            let _ = sigterm.recv().await;
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    state.readiness.store(false, Ordering::SeqCst);

    // Let load balancers observe /readyz failing before connections stop.
    tokio::time::sleep(SHUTDOWN_DRAIN_GRACE).await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use tower::ServiceExt;

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("cs-api").chain(args.iter().copied())).unwrap()
    }

    #[tokio::test]
    async fn sets_request_id_when_missing() {
        let app = Router::new()
            .route("/", get(|| async { "ok" }))
            .layer(TraceLayer::new_for_http())
            .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
                "x-request-id",
            )))
            .layer(SetRequestIdLayer::new(
                HeaderName::from_static("x-request-id"),
                MakeRequestUuid::default(),
            ));

        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));
    }

    #[test]
    fn rate_limit_config_ignores_zero_and_garbage() {
        assert_eq!(
            RateLimitConfig::from_vars(Some("10".into()), Some("25".into())),
            RateLimitConfig { per_sec: 10, burst: 25 }
        );
        assert_eq!(
            RateLimitConfig::from_vars(Some("0".into()), Some("lots".into())),
            RateLimitConfig { per_sec: 20, burst: 40 }
        );
    }

    #[test]
    fn config_requires_credentials_for_the_auth_mode() {
        let missing_key = AppConfig::from_cli(cli(&["--auth-mode", "api_key"]));
        assert!(matches!(missing_key, Err(ApiError::BadRequest(_))));

        let missing_secret = AppConfig::from_cli(cli(&["--auth-mode", "jwt"]));
        assert!(matches!(missing_secret, Err(ApiError::BadRequest(_))));

        let wildcard = AppConfig::from_cli(cli(&["--api-key", "k", "--cors-origins", "*"]));
        assert!(matches!(wildcard, Err(ApiError::BadRequest(_))));
    }

    #[test]
    fn cors_origins_are_split_and_trimmed() {
        let config = AppConfig::from_cli(cli(&[
            "--api-key",
            "k",
            "--cors-origins",
            "http://localhost:3000, https://portal.example",
        ]))
        .unwrap();

        assert_eq!(
            config.cors_origins,
            vec!["http://localhost:3000", "https://portal.example"]
        );
    }

    #[tokio::test]
    async fn memory_store_is_seeded_from_file() {
        let path = env::temp_dir().join(format!("cs-api-seed-{}.json", std::process::id()));
        std::fs::write(&path, r#"[{"personalInfo": {"currentCity": "Pune"}}]"#).unwrap();

        let mut config = api_key_config("k");
        config.seed_file = Some(path.clone());
        let (store, kind) = build_store(&config).await.unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(kind, "memory");
        let cities = store.distinct_values("personalInfo.currentCity", "pu", 10).await.unwrap();
        assert_eq!(cities, vec!["Pune"]);
    }
}
