use actix_web::{web, HttpResponse};

use crate::AppState;
use crate::relay::RelayError;

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/api/servers/{server_id}/audit-logs").route(web::get().to(get_audit_logs)),
    );
}

async fn get_audit_logs(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, RelayError> {
    let server_id = path.into_inner();
    let entries = state.relay.audit_log(&server_id).await?;
    Ok(HttpResponse::Ok().json(entries))
}
