mod chain;
mod health;
pub mod models;
mod nodes;
mod tx;

use actix_web::web::ServiceConfig;

pub use models::AppState;

/// Routes keep the paths other nodes already call (`/get_chain` in particular),
/// so they are mounted at the root rather than under a versioned scope.
pub fn init_routes(cfg: &mut ServiceConfig) {
    cfg.service(health::health_check)
        .service(chain::mine_block)
        .service(chain::get_chain)
        .service(chain::is_valid)
        .service(tx::add_transaction)
        .service(tx::get_pending)
        .service(nodes::connect_node)
        .service(nodes::replace_chain);
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use actix_web::{App, http::StatusCode, test, web};
    use serde_json::{Value, json};

    use super::models::{
        ConnectNodeResponse, MineResponse, NewTxResponse, ReplaceChainResponse, ValidateResponse,
    };
    use super::*;
    use crate::config::LedgerSettings;
    use crate::ledger::Ledger;
    use crate::network::{HttpPeerClient, PeerChain};

    fn state() -> web::Data<AppState> {
        web::Data::new(AppState {
            ledger: Ledger::new(LedgerSettings::default()),
            peer_client: HttpPeerClient::new(Duration::from_secs(1)),
            mine_timeout: None,
        })
    }

    #[actix_web::test]
    async fn transaction_then_mine_round() {
        let state = state();
        let app =
            test::init_service(App::new().app_data(state.clone()).configure(init_routes)).await;

        let req = test::TestRequest::post()
            .uri("/add_transaction")
            .set_json(json!({"sender": "A", "receiver": "B", "amount": 5}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: NewTxResponse = test::read_body_json(resp).await;
        assert_eq!(body.index, 2);
        assert_eq!(body.message, "This transaction will be added to Block 2");

        let req = test::TestRequest::get().uri("/mine_block").to_request();
        let mined: MineResponse = test::call_and_read_body_json(&app, req).await;
        assert_eq!(mined.index, 2);
        assert_eq!(mined.proof, 533);
        assert_eq!(mined.transactions.len(), 1);
        assert_eq!(mined.transactions[0].sender, "A");

        let req = test::TestRequest::get().uri("/pending_transactions").to_request();
        let pending: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(pending["size"], 0);

        let req = test::TestRequest::get().uri("/get_chain").to_request();
        let chain: PeerChain = test::call_and_read_body_json(&app, req).await;
        assert_eq!(chain.length, 2);
        assert_eq!(chain.chain[1].previous_hash, chain.chain[0].fingerprint());

        let req = test::TestRequest::get().uri("/is_valid").to_request();
        let valid: ValidateResponse = test::call_and_read_body_json(&app, req).await;
        assert!(valid.valid);
    }

    #[actix_web::test]
    async fn transaction_with_missing_field_is_rejected() {
        let state = state();
        let app =
            test::init_service(App::new().app_data(state.clone()).configure(init_routes)).await;

        let req = test::TestRequest::post()
            .uri("/add_transaction")
            .set_json(json!({"sender": "A", "amount": 5}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert!(state.ledger.pending_transactions().is_empty());
    }

    #[actix_web::test]
    async fn connect_node_normalizes_addresses() {
        let state = state();
        let app =
            test::init_service(App::new().app_data(state.clone()).configure(init_routes)).await;

        let req = test::TestRequest::post()
            .uri("/connect_node")
            .set_json(json!({"nodes": ["http://127.0.0.1:5001/", "127.0.0.1:5001", "http://127.0.0.1:5002"]}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: ConnectNodeResponse = test::read_body_json(resp).await;
        assert_eq!(body.total_nodes, vec!["127.0.0.1:5001", "127.0.0.1:5002"]);

        let req = test::TestRequest::post()
            .uri("/connect_node")
            .set_json(json!({}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn replace_chain_without_peers_keeps_chain() {
        let state = state();
        let app =
            test::init_service(App::new().app_data(state.clone()).configure(init_routes)).await;

        let req = test::TestRequest::get().uri("/replace_chain").to_request();
        let body: ReplaceChainResponse = test::call_and_read_body_json(&app, req).await;
        assert!(body.new_chain.is_none());
        assert_eq!(body.actual_chain.map(|c| c.len()), Some(1));
    }
}
