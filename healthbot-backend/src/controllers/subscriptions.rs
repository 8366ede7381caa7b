//! Subscription entry points
//!
//! Invoked by the conversational front-end as side effects of intent
//! resolution. Replies come back as user-facing text; the front-end relays
//! them verbatim.

use actix_web::{web, HttpResponse, Responder};
use serde::{Deserialize, Serialize};

use crate::models::{ChannelKind, Language};
use crate::AppState;

#[derive(Deserialize)]
pub struct SubscribeRequest {
    pub user_id: String,
    pub channel: String,
    pub address: String,
    #[serde(default)]
    pub language: Option<String>,
}

#[derive(Deserialize)]
pub struct UnsubscribeRequest {
    pub user_id: String,
}

#[derive(Deserialize)]
pub struct InteractionRequest {
    pub user_id: String,
    pub channel: String,
    pub intent: String,
    pub message: String,
    pub response: String,
}

#[derive(Serialize)]
struct ReplyResponse {
    reply: String,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/api/subscribe").route(web::post().to(subscribe)));
    cfg.service(web::resource("/api/unsubscribe").route(web::post().to(unsubscribe)));
    cfg.service(web::resource("/api/interactions").route(web::post().to(log_interaction)));
}

async fn subscribe(state: web::Data<AppState>, req: web::Json<SubscribeRequest>) -> impl Responder {
    let channel = match ChannelKind::from_str(&req.channel) {
        Some(c) => c,
        None => {
            return HttpResponse::BadRequest().json(ErrorResponse {
                error: format!("Unknown channel: {}", req.channel),
            });
        }
    };
    let language = req
        .language
        .as_deref()
        .and_then(Language::from_str)
        .unwrap_or_default();

    let reply = state
        .subscriptions
        .subscribe(&req.user_id, channel, &req.address, language);
    HttpResponse::Ok().json(ReplyResponse { reply })
}

async fn unsubscribe(
    state: web::Data<AppState>,
    req: web::Json<UnsubscribeRequest>,
) -> impl Responder {
    let reply = state.subscriptions.unsubscribe(&req.user_id);
    HttpResponse::Ok().json(ReplyResponse { reply })
}

async fn log_interaction(
    state: web::Data<AppState>,
    req: web::Json<InteractionRequest>,
) -> impl Responder {
    // Best-effort by contract: always 204, even if the write failed.
    state.subscriptions.log_interaction(
        &req.user_id,
        &req.channel,
        &req.intent,
        &req.message,
        &req.response,
    );
    HttpResponse::NoContent().finish()
}
