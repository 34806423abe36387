use actix_web::HttpResponse;

use crate::api::PingResponse;

/// GET /ping
#[utoipa::path(
    get,
    path = "/ping",
    responses((status = 200, description = "Service is reachable", body = PingResponse)),
    tag = "health"
)]
pub async fn ping() -> HttpResponse {
    HttpResponse::Ok().json(PingResponse {
        ok: true,
        message: "pong".to_string(),
    })
}
