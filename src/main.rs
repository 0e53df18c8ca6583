use actix_web::{App, HttpServer, web};
use dotenvy::dotenv;
use log::info;

use proof_ledger::api::{self, AppState};
use proof_ledger::config::NodeConfig;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let _ = dotenv();
    env_logger::init();

    let config = NodeConfig::from_env().map_err(std::io::Error::other)?;
    let (host, port) = (config.host.clone(), config.port);

    info!(
        "⛓️ Starting node {} at http://{host}:{port} (peer timeout {:?})",
        config.node_id, config.peer_timeout
    );

    let state = web::Data::new(AppState::from_config(&config));

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .configure(api::init_routes)
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}
