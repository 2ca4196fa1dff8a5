mod core;
mod features;
mod modules;
mod shared;

use crate::core::config::Config;
use crate::core::{database, middleware};
use crate::features::auth::{routes as auth_routes, AuthService, SessionManager};
use crate::features::grievances::handlers::GrievanceState;
use crate::features::grievances::{routes as grievances_routes, GrievanceService, ResponseService};
use crate::features::staff::handlers::StaffState;
use crate::features::staff::{routes as staff_routes, DashboardService};
use crate::features::taxonomy::{routes as taxonomy_routes, TaxonomyService};
use crate::features::users::{routes as users_routes, UserService};
use crate::modules::storage::{self, AttachmentStorage};
use axum::{extract::DefaultBodyLimit, Router};
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    // Build Tokio runtime with configurable worker threads
    let worker_threads = std::env::var("TOKIO_WORKER_THREADS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|p| p.get())
                .unwrap_or(4)
        });

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(worker_threads)
        .max_blocking_threads(worker_threads * 4)
        .enable_all()
        .build()?;

    runtime.block_on(async_main(worker_threads))
}

/// Services shared by every route
#[derive(Clone)]
struct AppServices {
    sessions: Arc<SessionManager>,
    auth: Arc<AuthService>,
    users: Arc<UserService>,
    taxonomy: Arc<TaxonomyService>,
    grievances: Arc<GrievanceService>,
    responses: Arc<ResponseService>,
    dashboard: Arc<DashboardService>,
}

impl AppServices {
    fn new(pool: PgPool, sessions: SessionManager, storage: Arc<dyn AttachmentStorage>) -> Self {
        let sessions = Arc::new(sessions);
        let users = Arc::new(UserService::new(pool.clone()));
        let auth = Arc::new(AuthService::new(Arc::clone(&users), Arc::clone(&sessions)));
        let taxonomy = Arc::new(TaxonomyService::new(pool.clone()));
        let grievances = Arc::new(GrievanceService::new(
            pool.clone(),
            storage,
            Arc::clone(&taxonomy),
        ));
        let responses = Arc::new(ResponseService::new(pool.clone()));
        let dashboard = Arc::new(DashboardService::new(pool));

        Self {
            sessions,
            auth,
            users,
            taxonomy,
            grievances,
            responses,
            dashboard,
        }
    }
}

/// Simple health check endpoint (no auth required)
async fn health_check() -> axum::http::StatusCode {
    axum::http::StatusCode::OK
}

fn build_app(services: AppServices, max_request_body_size: usize) -> Router {
    let grievance_state = GrievanceState {
        grievances: Arc::clone(&services.grievances),
        responses: Arc::clone(&services.responses),
        taxonomy: Arc::clone(&services.taxonomy),
    };

    let staff_state = StaffState {
        dashboard: services.dashboard,
        grievances: services.grievances,
        responses: services.responses,
        users: Arc::clone(&services.users),
    };

    let session_state = middleware::SessionState {
        sessions: services.sessions,
        users: Arc::clone(&services.users),
    };

    let health_route = Router::new().route("/health", axum::routing::get(health_check));

    Router::new()
        .merge(taxonomy_routes::routes(services.taxonomy))
        .merge(users_routes::routes(services.users))
        .merge(auth_routes::routes(services.auth))
        .merge(grievances_routes::routes(grievance_state))
        .merge(staff_routes::routes(staff_state))
        .merge(health_route)
        // Resolve the session cookie into an AuthenticatedUser extension
        .layer(axum::middleware::from_fn_with_state(
            session_state,
            middleware::session_middleware,
        ))
        .layer(DefaultBodyLimit::max(max_request_body_size))
        // Propagate X-Request-Id to response headers
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(middleware::MakeSpanWithRequestId)
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        // Generate X-Request-Id using UUID v7 (or use client-provided one)
        .layer(SetRequestIdLayer::x_request_id(middleware::MakeRequestUuid))
}

async fn async_main(worker_threads: usize) -> anyhow::Result<()> {
    // Load .env file BEFORE initializing logger so RUST_LOG is available
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env().map_err(|e| anyhow::anyhow!(e))?;

    // Log system info
    let available_cpus = std::thread::available_parallelism()
        .map(|p| p.get())
        .unwrap_or(1);
    tracing::info!(
        "System info: available_cpus={}, tokio_worker_threads={}, pid={}",
        available_cpus,
        worker_threads,
        std::process::id()
    );

    tracing::info!("Configuration loaded successfully: {:?}", config.session);

    // Create database connection pool
    let pool = database::create_pool(&config.database).await?;
    tracing::info!("Database connection pool created");

    // Run migrations automatically
    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .map_err(|e| anyhow::anyhow!("Migration failed: {}", e))?;
    tracing::info!("Database migrations completed successfully");

    // Attachment storage (local disk or MinIO)
    let attachment_storage = storage::from_config(&config.storage)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to initialize attachment storage: {}", e))?;

    let sessions = SessionManager::new(&config.session);
    tracing::info!("Session manager initialized");

    let services = AppServices::new(pool, sessions, attachment_storage);
    let app = build_app(services, config.app.max_request_body_size);

    // Start server
    let addr = config.app.server_address();
    let socket_addr: std::net::SocketAddr = addr
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid address: {}", e))?;

    // Use socket2 for TCP listener configuration
    let socket = socket2::Socket::new(
        socket2::Domain::for_address(socket_addr),
        socket2::Type::STREAM,
        Some(socket2::Protocol::TCP),
    )?;

    socket.set_reuse_address(true)?;
    socket.set_nodelay(true)?;

    #[cfg(target_os = "linux")]
    {
        let keepalive = socket2::TcpKeepalive::new()
            .with_time(std::time::Duration::from_secs(60))
            .with_interval(std::time::Duration::from_secs(10))
            .with_retries(3);
        socket.set_tcp_keepalive(&keepalive)?;
    }
    #[cfg(not(target_os = "linux"))]
    {
        let keepalive = socket2::TcpKeepalive::new().with_time(std::time::Duration::from_secs(60));
        socket.set_tcp_keepalive(&keepalive)?;
    }

    socket.set_nonblocking(true)?;
    socket.bind(&socket_addr.into())?;
    socket.listen(1024)?;

    let listener = tokio::net::TcpListener::from_std(socket.into())?;
    tracing::info!("Server listening on {}", format!("http://{}", addr));

    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::auth::model::AuthenticatedUser;
    use crate::shared::test_helpers::{
        lazy_pool, seed_category, seed_user, session_cookie, test_session_config, MemoryStorage,
    };
    use axum::http::{header, HeaderValue, StatusCode};
    use axum_test::multipart::{MultipartForm, Part};
    use axum_test::TestServer;
    use serde_json::json;

    fn services(pool: PgPool) -> AppServices {
        AppServices::new(
            pool,
            SessionManager::new(&test_session_config()),
            Arc::new(MemoryStorage::default()),
        )
    }

    /// Router over a pool that never connects; only anonymous paths that stop
    /// before the database can be exercised
    fn offline_server() -> TestServer {
        TestServer::new(build_app(services(lazy_pool()), 1024 * 1024)).unwrap()
    }

    /// Router over a real database
    fn db_server(pool: PgPool) -> TestServer {
        TestServer::new(build_app(services(pool), 1024 * 1024)).unwrap()
    }

    async fn count_grievances(pool: &PgPool) -> i64 {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM grievances")
            .fetch_one(pool)
            .await
            .unwrap()
    }

    fn cookie_for(user: &AuthenticatedUser) -> HeaderValue {
        let sessions = SessionManager::new(&test_session_config());
        HeaderValue::from_str(&session_cookie(&sessions, user)).unwrap()
    }

    fn location(response: &axum_test::TestResponse) -> String {
        response
            .headers()
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string()
    }

    #[tokio::test]
    async fn test_health() {
        let server = offline_server();
        let response = server.get("/health").await;

        assert_eq!(response.status_code(), StatusCode::OK);
        assert!(response.headers().get("x-request-id").is_some());
    }

    #[tokio::test]
    async fn test_anonymous_redirected_to_login_with_next() {
        let server = offline_server();

        let response = server.get("/grievances/my").await;
        assert_eq!(response.status_code(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/login?next=%2Fgrievances%2Fmy");

        let response = server.get("/staff/dashboard").await;
        assert_eq!(response.status_code(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/login?next=%2Fstaff%2Fdashboard");
    }

    #[tokio::test]
    async fn test_tampered_session_is_anonymous() {
        let server = offline_server();

        let response = server
            .get("/grievances/submit")
            .add_header(
                header::COOKIE,
                HeaderValue::from_static("gp_session=eyJhbGciOiJIUzI1NiJ9.e30.forged"),
            )
            .await;

        assert_eq!(response.status_code(), StatusCode::SEE_OTHER);
        assert!(location(&response).starts_with("/login?next="));
    }

    #[sqlx::test]
    #[ignore = "requires a running Postgres (DATABASE_URL)"]
    async fn test_citizen_denied_staff_pages(pool: PgPool) {
        let citizen = seed_user(&pool, "asha", false).await;
        let server = db_server(pool);

        for path in [
            "/staff/dashboard",
            "/staff/grievances",
            "/staff/grievances/GR-1A2B3C4D",
        ] {
            let response = server
                .get(path)
                .add_header(header::COOKIE, cookie_for(&citizen))
                .await;

            assert_eq!(response.status_code(), StatusCode::SEE_OTHER, "{}", path);
            assert_eq!(location(&response), "/");
            assert!(response.headers().get(header::SET_COOKIE).is_some());
        }
    }

    #[sqlx::test]
    #[ignore = "requires a running Postgres (DATABASE_URL)"]
    async fn test_citizen_cannot_post_status_change(pool: PgPool) {
        let citizen = seed_user(&pool, "asha", false).await;
        let server = db_server(pool);

        let response = server
            .post("/staff/grievances/GR-1A2B3C4D")
            .add_header(header::COOKIE, cookie_for(&citizen))
            .form(&json!({ "update_status": "1", "status": "resolved" }))
            .await;

        assert_eq!(response.status_code(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/");
    }

    #[sqlx::test]
    #[ignore = "requires a running Postgres (DATABASE_URL)"]
    async fn test_malformed_reference_is_not_found(pool: PgPool) {
        let citizen = seed_user(&pool, "asha", false).await;
        let officer = seed_user(&pool, "officer", true).await;
        let server = db_server(pool);

        let response = server
            .get("/grievances/not-a-reference")
            .add_header(header::COOKIE, cookie_for(&citizen))
            .await;
        assert_eq!(response.status_code(), StatusCode::NOT_FOUND);

        let response = server
            .get("/staff/grievances/GR-lowercase")
            .add_header(header::COOKIE, cookie_for(&officer))
            .await;
        assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    }

    #[sqlx::test]
    #[ignore = "requires a running Postgres (DATABASE_URL)"]
    async fn test_revoked_staff_role_applies_to_existing_session(pool: PgPool) {
        let officer = seed_user(&pool, "officer", true).await;
        let server = db_server(pool.clone());

        let response = server
            .get("/staff/dashboard")
            .add_header(header::COOKIE, cookie_for(&officer))
            .await;
        assert_eq!(response.status_code(), StatusCode::OK);

        sqlx::query("UPDATE users SET is_staff = FALSE WHERE id = $1")
            .bind(officer.user_id)
            .execute(&pool)
            .await
            .unwrap();

        // Same cookie, still claiming staff
        let response = server
            .get("/staff/dashboard")
            .add_header(header::COOKIE, cookie_for(&officer))
            .await;
        assert_eq!(response.status_code(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/");
    }

    #[sqlx::test]
    #[ignore = "requires a running Postgres (DATABASE_URL)"]
    async fn test_session_claims_cannot_grant_staff(pool: PgPool) {
        let mut citizen = seed_user(&pool, "asha", false).await;
        citizen.is_staff = true;
        let server = db_server(pool);

        let response = server
            .get("/staff/grievances")
            .add_header(header::COOKIE, cookie_for(&citizen))
            .await;
        assert_eq!(response.status_code(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/");
    }

    #[sqlx::test]
    #[ignore = "requires a running Postgres (DATABASE_URL)"]
    async fn test_deleted_user_session_is_anonymous(pool: PgPool) {
        let officer = seed_user(&pool, "officer", true).await;
        let server = db_server(pool.clone());

        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(officer.user_id)
            .execute(&pool)
            .await
            .unwrap();

        let response = server
            .get("/staff/dashboard")
            .add_header(header::COOKIE, cookie_for(&officer))
            .await;
        assert_eq!(response.status_code(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/login?next=%2Fstaff%2Fdashboard");
    }

    #[tokio::test]
    async fn test_login_and_register_pages_render() {
        let server = offline_server();

        let response = server.get("/login?next=/grievances/my").await;
        assert_eq!(response.status_code(), StatusCode::OK);
        assert!(response.text().contains("name=\"next\""));

        let response = server.get("/register").await;
        assert_eq!(response.status_code(), StatusCode::OK);
        assert!(response.text().contains("name=\"password2\""));
    }

    #[tokio::test]
    async fn test_invalid_registration_rerenders_inline() {
        let server = offline_server();

        let response = server
            .post("/register")
            .form(&json!({
                "username": "asha rao",
                "email": "asha@example.com",
                "first_name": "Asha",
                "last_name": "Rao",
                "phone": "9876543210",
                "address": "12 Lake Road",
                "password1": "streetlight-42",
                "password2": "streetlight-43",
            }))
            .await;

        assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = response.text();
        assert!(body.contains("password fields didn"));
        assert!(body.contains("value=\"Asha\""));
        assert!(!body.contains("streetlight-42"));
    }

    #[tokio::test]
    async fn test_overlong_email_rerenders_inline() {
        let server = offline_server();
        let label = "b".repeat(60);
        let email = format!("{}@{}.{}.{}.{}", "a".repeat(60), label, label, label, label);

        let response = server
            .post("/register")
            .form(&json!({
                "username": "asha_rao",
                "email": email,
                "first_name": "Asha",
                "last_name": "Rao",
                "phone": "9876543210",
                "address": "12 Lake Road",
                "password1": "streetlight-42",
                "password2": "streetlight-42",
            }))
            .await;

        assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        assert!(response.text().contains("at most 254 characters"));
    }

    #[tokio::test]
    async fn test_blank_login_rerenders_inline() {
        let server = offline_server();

        let response = server
            .post("/login")
            .form(&json!({ "username": "", "password": "" }))
            .await;

        assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        assert!(response.text().contains("This field is required."));
    }

    #[sqlx::test]
    #[ignore = "requires a running Postgres (DATABASE_URL)"]
    async fn test_logout_clears_session(pool: PgPool) {
        let citizen = seed_user(&pool, "asha", false).await;
        let server = db_server(pool);

        let response = server
            .post("/logout")
            .add_header(header::COOKIE, cookie_for(&citizen))
            .await;

        assert_eq!(response.status_code(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/");
        let cleared = response
            .headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .any(|v| v.starts_with("gp_session=") && v.contains("Max-Age=0"));
        assert!(cleared);
    }

    #[sqlx::test]
    #[ignore = "requires a running Postgres (DATABASE_URL)"]
    async fn test_submit_with_empty_file_part_has_no_attachment(pool: PgPool) {
        let category = seed_category(&pool, "Public Works", "Streetlights").await;
        let asha = seed_user(&pool, "asha", false).await;
        let server = db_server(pool.clone());

        // What a browser sends when no file was chosen
        let form = MultipartForm::new()
            .add_text("title", "Broken streetlight")
            .add_text("description", "Dark since Monday")
            .add_text("category", category)
            .add_part("attachment", Part::bytes(Vec::<u8>::new()).file_name(""));

        let response = server
            .post("/grievances/submit")
            .add_header(header::COOKIE, cookie_for(&asha))
            .multipart(form)
            .await;
        assert_eq!(response.status_code(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/grievances/my");

        let keys = sqlx::query_scalar::<_, Option<String>>(
            "SELECT attachment_key FROM grievances WHERE user_id = $1",
        )
        .bind(asha.user_id)
        .fetch_all(&pool)
        .await
        .unwrap();
        assert_eq!(keys, vec![None]);
    }

    #[sqlx::test]
    #[ignore = "requires a running Postgres (DATABASE_URL)"]
    async fn test_submit_with_disallowed_attachment_rerenders_inline(pool: PgPool) {
        let category = seed_category(&pool, "Public Works", "Streetlights").await;
        let asha = seed_user(&pool, "asha", false).await;
        let server = db_server(pool.clone());

        let form = MultipartForm::new()
            .add_text("title", "Broken streetlight")
            .add_text("description", "Dark since Monday")
            .add_text("category", category)
            .add_part(
                "attachment",
                Part::bytes(b"MZ".to_vec())
                    .file_name("setup.exe")
                    .mime_type("application/x-msdownload"),
            );

        let response = server
            .post("/grievances/submit")
            .add_header(header::COOKIE, cookie_for(&asha))
            .multipart(form)
            .await;
        assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = response.text();
        assert!(body.contains("is not allowed"));
        assert!(body.contains("value=\"Broken streetlight\""));
        assert_eq!(count_grievances(&pool).await, 0);
    }

    /// Citizen A files a grievance, citizen B is turned away, staff moves it
    /// to in progress
    #[sqlx::test]
    #[ignore = "requires a running Postgres (DATABASE_URL)"]
    async fn test_broken_streetlight_scenario(pool: PgPool) {
        let category = seed_category(&pool, "Public Works", "Streetlights").await;
        let asha = seed_user(&pool, "asha", false).await;
        let ravi = seed_user(&pool, "ravi", false).await;
        let officer = seed_user(&pool, "officer", true).await;

        let app_services = services(pool.clone());
        let grievances = Arc::clone(&app_services.grievances);
        let server = TestServer::new(build_app(app_services, 1024 * 1024)).unwrap();

        let submitted = grievances
            .submit(
                &asha,
                crate::features::grievances::services::NewGrievance {
                    title: "Broken streetlight".to_string(),
                    description: "The lamp at the corner has been out for a week".to_string(),
                    category_id: category,
                    attachment: None,
                },
            )
            .await
            .unwrap();
        let reference = submitted.reference_id.clone();
        assert!(crate::features::grievances::reference::is_valid_reference_id(&reference));

        let detail = format!("/grievances/{}", reference);

        let response = server
            .get(&detail)
            .add_header(header::COOKIE, cookie_for(&asha))
            .await;
        assert_eq!(response.status_code(), StatusCode::OK);
        assert!(response.text().contains("Broken streetlight"));

        let response = server
            .get(&detail)
            .add_header(header::COOKIE, cookie_for(&ravi))
            .await;
        assert_eq!(response.status_code(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/grievances/my");

        let response = server
            .post(&detail)
            .add_header(header::COOKIE, cookie_for(&ravi))
            .form(&json!({ "response": "Not my grievance" }))
            .await;
        assert_eq!(response.status_code(), StatusCode::SEE_OTHER);

        let staff_detail = format!("/staff/grievances/{}", reference);
        let response = server
            .post(&staff_detail)
            .add_header(header::COOKIE, cookie_for(&officer))
            .form(&json!({ "update_status": "1", "status": "in_progress" }))
            .await;
        assert_eq!(response.status_code(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), staff_detail);

        let refetched = grievances.get_by_reference(&reference).await.unwrap();
        assert_eq!(
            refetched.status,
            crate::features::grievances::models::GrievanceStatus::InProgress
        );
        assert!(refetched.updated_at > refetched.created_at);

        let thread = ResponseService::new(pool).list_responses(&reference).await.unwrap();
        assert!(thread.is_empty());
    }
}
