use actix_web::{web, HttpResponse};

use crate::AppState;
use crate::relay::RelayError;

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/api/servers").route(web::get().to(list_servers)));
    cfg.service(
        web::resource("/api/servers/{server_id}/channels").route(web::get().to(list_channels)),
    );
}

async fn list_servers(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(state.relay.list_communities())
}

async fn list_channels(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, RelayError> {
    let server_id = path.into_inner();
    let channels = state.relay.list_channels(&server_id)?;
    Ok(HttpResponse::Ok().json(channels))
}
