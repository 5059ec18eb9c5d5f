use actix_web::{web, HttpResponse};

use crate::AppState;
use crate::relay::RelayError;

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/api/servers/{server_id}/channels/{channel_id}/messages")
            .route(web::get().to(export_messages)),
    );
}

/// Full channel history, newest first
async fn export_messages(
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse, RelayError> {
    let (server_id, channel_id) = path.into_inner();
    let messages = state.relay.export_messages(&server_id, &channel_id).await?;
    Ok(HttpResponse::Ok().json(messages))
}
