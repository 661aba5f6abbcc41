use tokio::net::TcpListener;
use tracing::info;
use qa_forge::{
    config::Config,
    api::routes::create_router,
    service::QaService,
    AppState,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    qa_forge::init_tracing();

    // Refuse to start without both credentials
    let config = Config::load()?;
    let server_addr = config.server_addr;

    let app_state = AppState::new(QaService::from_config(&config));
    let app = create_router(app_state);

    let listener = TcpListener::bind(server_addr).await?;
    info!("Listening on {}", server_addr);
    axum::serve(listener, app).await?;

    Ok(())
}
