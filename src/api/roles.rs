use actix_web::{web, HttpRequest, Responder};
use reqwest::Method;

use crate::api::{responder, sin_token, token_de};
use crate::backend::BackendClient;

/// GET /api/roles
pub async fn listar_handler(
    cliente: web::Data<BackendClient>,
    req: HttpRequest,
) -> impl Responder {
    let Some(token) = token_de(&req) else {
        return sin_token();
    };

    let resultado = cliente
        .forward(Method::GET, "/roles", &[], Some(&token), None)
        .await;

    responder(resultado, "Error al obtener roles")
}
