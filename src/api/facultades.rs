use actix_web::{web, HttpRequest, Responder};
use reqwest::Method;
use serde_json::Value;

use crate::api::{listar_completo, responder, token_de};
use crate::backend::BackendClient;

/// GET /api/facultades
/// Agrega todas las páginas del backend y devuelve el conjunto completo
/// como `{data, total}`. Los filtros entrantes se reenvían tal cual.
pub async fn listar_handler(
    cliente: web::Data<BackendClient>,
    req: HttpRequest,
    query: web::Query<Vec<(String, String)>>,
) -> impl Responder {
    listar_completo(&cliente, &req, "/facultades", query.into_inner()).await
}

/// POST /api/facultades
/// Reenvío directo; el token se propaga cuando viene (el backend decide).
pub async fn crear_handler(
    cliente: web::Data<BackendClient>,
    req: HttpRequest,
    body: web::Json<Value>,
) -> impl Responder {
    let token = token_de(&req);
    let resultado = cliente
        .forward(
            Method::POST,
            "/facultades",
            &[],
            token.as_deref(),
            Some(&body.into_inner()),
        )
        .await;

    responder(resultado, "Error al crear la facultad")
}
