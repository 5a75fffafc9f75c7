use actix_web::{web, HttpRequest, Responder};
use reqwest::Method;
use serde_json::Value;

use crate::api::{listar_completo, responder, sin_token, token_de};
use crate::backend::BackendClient;

/// GET /api/learning-outcomes
/// Resultados de aprendizaje de carrera (RA): conjunto completo agregado.
pub async fn listar_handler(
    cliente: web::Data<BackendClient>,
    req: HttpRequest,
    query: web::Query<Vec<(String, String)>>,
) -> impl Responder {
    listar_completo(&cliente, &req, "/learning-outcomes", query.into_inner()).await
}

/// POST /api/learning-outcomes
pub async fn crear_handler(
    cliente: web::Data<BackendClient>,
    req: HttpRequest,
    body: web::Json<Value>,
) -> impl Responder {
    let Some(token) = token_de(&req) else {
        return sin_token();
    };

    let resultado = cliente
        .forward(
            Method::POST,
            "/learning-outcomes",
            &[],
            Some(&token),
            Some(&body.into_inner()),
        )
        .await;

    responder(resultado, "Error al crear resultado de aprendizaje")
}
