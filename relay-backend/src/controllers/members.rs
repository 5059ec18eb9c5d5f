use actix_web::{web, HttpResponse};

use crate::AppState;
use crate::models::{ModerationAction, ModerationRequest};
use crate::relay::RelayError;

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/api/servers/{server_id}/members/{member_id}/kick")
            .route(web::post().to(kick_member)),
    );
    cfg.service(
        web::resource("/api/servers/{server_id}/members/{member_id}/ban")
            .route(web::post().to(ban_member)),
    );
}

async fn kick_member(
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
    body: Option<web::Json<ModerationRequest>>,
) -> Result<HttpResponse, RelayError> {
    moderate(state, path, body, ModerationAction::Kick).await
}

async fn ban_member(
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
    body: Option<web::Json<ModerationRequest>>,
) -> Result<HttpResponse, RelayError> {
    moderate(state, path, body, ModerationAction::Ban).await
}

/// A missing or unreadable body is treated as "no reason given"
async fn moderate(
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
    body: Option<web::Json<ModerationRequest>>,
    action: ModerationAction,
) -> Result<HttpResponse, RelayError> {
    let (server_id, member_id) = path.into_inner();
    let reason = body.and_then(|b| b.into_inner().reason);

    log::debug!("Request to {} member {} in server {}", action.as_str(), member_id, server_id);
    let ack = state
        .relay
        .moderate(&server_id, &member_id, action, reason)
        .await?;
    Ok(HttpResponse::Ok().json(ack))
}
