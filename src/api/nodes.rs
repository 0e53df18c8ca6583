use actix_web::{HttpResponse, Responder, get, post, web};
use log::{info, warn};

use super::models::{AppState, ConnectNodeRequest, ConnectNodeResponse, ReplaceChainResponse};

/// Register peers by address. Addresses are reduced to `host:port`.
#[post("/connect_node")]
pub async fn connect_node(
    state: web::Data<AppState>,
    body: web::Json<ConnectNodeRequest>,
) -> impl Responder {
    let Some(nodes) = body.into_inner().nodes else {
        return HttpResponse::BadRequest().body("No node");
    };

    match state.ledger.register_peers(&nodes) {
        Ok(total_nodes) => {
            info!("POST /connect_node - {} peers known", total_nodes.len());
            HttpResponse::Created().json(ConnectNodeResponse {
                message: "All the nodes are now connected. The blockchain now contains the following nodes:".into(),
                total_nodes,
            })
        }
        Err(e) => {
            warn!("POST /connect_node - rejected: {}", e);
            HttpResponse::BadRequest().body(e.to_string())
        }
    }
}

/// Adopt the longest valid chain among registered peers, if it beats ours.
#[get("/replace_chain")]
pub async fn replace_chain(state: web::Data<AppState>) -> impl Responder {
    let outcome = state.ledger.reconcile(&state.peer_client).await;

    let resp = if outcome.replaced {
        ReplaceChainResponse {
            message: "The nodes had different chains so the chain was replaced by the longest one."
                .into(),
            new_chain: Some(outcome.chain),
            actual_chain: None,
        }
    } else {
        ReplaceChainResponse {
            message: "All good. The chain is the largest one.".into(),
            new_chain: None,
            actual_chain: Some(outcome.chain),
        }
    };
    HttpResponse::Ok().json(resp)
}
