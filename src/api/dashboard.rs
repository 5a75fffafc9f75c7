use actix_web::{web, HttpRequest, Responder};
use reqwest::Method;

use crate::api::{responder, token_de};
use crate::backend::BackendClient;

/// GET /api/dashboard/activity
/// El token se propaga cuando viene; el backend responde 401 si hace falta.
pub async fn actividad_handler(
    cliente: web::Data<BackendClient>,
    req: HttpRequest,
) -> impl Responder {
    let token = token_de(&req);
    let resultado = cliente
        .forward(
            Method::GET,
            "/dashboard/activity",
            &[],
            token.as_deref(),
            None,
        )
        .await;

    responder(resultado, "Error al obtener actividad del backend")
}
