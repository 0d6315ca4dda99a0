mod config;
mod guard;
mod routes;

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt::init();

    let config = config::ServerConfig::from_env().expect("invalid server configuration");
    let app = routes::app(&config, guard::GuardConfig::default());

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port))
        .await
        .expect("failed to bind");

    tracing::info!(port = config.port, website_dir = %config.website_dir.display(), "codechat page server listening");
    axum::serve(listener, app).await.expect("server failed");
}
