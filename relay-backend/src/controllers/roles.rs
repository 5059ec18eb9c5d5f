use actix_web::{web, HttpResponse};

use crate::AppState;
use crate::models::CreateRoleRequest;
use crate::relay::RelayError;

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/api/servers/{server_id}/roles").route(web::post().to(create_role)));
    cfg.service(
        web::resource("/api/servers/{server_id}/roles/{role_id}")
            .route(web::delete().to(delete_role)),
    );
}

/// Fields missing from the body fall through to the upstream call, which
/// decides whether they are acceptable.
async fn create_role(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: Option<web::Json<CreateRoleRequest>>,
) -> Result<HttpResponse, RelayError> {
    let server_id = path.into_inner();
    let request = body.map(|b| b.into_inner()).unwrap_or_default();
    let role = state.relay.create_role(&server_id, request).await?;
    Ok(HttpResponse::Ok().json(role))
}

async fn delete_role(
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse, RelayError> {
    let (server_id, role_id) = path.into_inner();
    let ack = state.relay.delete_role(&server_id, &role_id).await?;
    Ok(HttpResponse::Ok().json(ack))
}
