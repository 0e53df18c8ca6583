use actix_web::{HttpResponse, Responder, get, web};
use log::{info, warn};

use super::models::{AppState, ChainResponse, MineResponse, ValidateResponse};
use crate::error::LedgerError;

/// Mine a block on the current tip, bundling every pending transaction.
/// The proof search runs off the request path; other requests keep being served.
#[get("/mine_block")]
pub async fn mine_block(state: web::Data<AppState>) -> impl Responder {
    let mined = match state.mine_timeout {
        Some(limit) => state.ledger.mine_with_timeout(limit).await,
        None => state.ledger.mine().await,
    };

    match mined {
        Ok(block) => {
            info!(
                "GET /mine_block - block #{} proof={}",
                block.index, block.proof
            );
            HttpResponse::Ok().json(MineResponse::from(block))
        }
        Err(e @ LedgerError::MiningTimedOut(_)) => {
            warn!("GET /mine_block - {}", e);
            HttpResponse::ServiceUnavailable().body(e.to_string())
        }
        Err(e) => {
            warn!("GET /mine_block - {}", e);
            HttpResponse::InternalServerError().body(e.to_string())
        }
    }
}

/// Get the full chain. Peers call this during reconciliation.
#[get("/get_chain")]
pub async fn get_chain(state: web::Data<AppState>) -> impl Responder {
    let chain = state.ledger.chain();
    HttpResponse::Ok().json(ChainResponse {
        length: chain.len(),
        chain,
    })
}

/// Validate the whole local chain.
#[get("/is_valid")]
pub async fn is_valid(state: web::Data<AppState>) -> impl Responder {
    let valid = state.ledger.is_valid();
    let message = if valid {
        "All good. The Blockchain is valid."
    } else {
        "The Blockchain is not valid."
    };
    HttpResponse::Ok().json(ValidateResponse {
        message: message.into(),
        valid,
    })
}
