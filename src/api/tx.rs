use actix_web::{HttpResponse, Responder, get, post, web};
use log::{debug, warn};

use super::models::{AppState, NewTxResponse, PendingResponse};
use crate::transaction::TransactionDraft;

/// Queue a transaction for the next mined block.
#[post("/add_transaction")]
pub async fn add_transaction(
    state: web::Data<AppState>,
    body: web::Json<TransactionDraft>,
) -> impl Responder {
    let transaction = match body.into_inner().into_transaction() {
        Ok(tx) => tx,
        Err(e) => {
            warn!("POST /add_transaction - rejected: {}", e);
            return HttpResponse::BadRequest().body(e.to_string());
        }
    };

    let index = state.ledger.add_transaction(transaction);
    debug!("POST /add_transaction - expected in block {}", index);

    HttpResponse::Created().json(NewTxResponse {
        message: format!("This transaction will be added to Block {index}"),
        index,
    })
}

/// List transactions waiting for the next block.
#[get("/pending_transactions")]
pub async fn get_pending(state: web::Data<AppState>) -> impl Responder {
    let transactions = state.ledger.pending_transactions();
    HttpResponse::Ok().json(PendingResponse {
        size: transactions.len(),
        transactions,
    })
}
