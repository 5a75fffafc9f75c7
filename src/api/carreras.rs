use actix_web::{web, HttpRequest, Responder};
use reqwest::Method;
use serde_json::Value;

use crate::api::{listar_completo, responder, sin_token, token_de};
use crate::backend::BackendClient;

/// GET /api/carreras
pub async fn listar_handler(
    cliente: web::Data<BackendClient>,
    req: HttpRequest,
    query: web::Query<Vec<(String, String)>>,
) -> impl Responder {
    listar_completo(&cliente, &req, "/carreras", query.into_inner()).await
}

/// POST /api/carreras
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
            "/carreras",
            &[],
            Some(&token),
            Some(&body.into_inner()),
        )
        .await;

    responder(resultado, "Error al crear la carrera")
}

/// GET /api/carreras/{id}
pub async fn obtener_handler(
    cliente: web::Data<BackendClient>,
    req: HttpRequest,
    path: web::Path<String>,
) -> impl Responder {
    let Some(token) = token_de(&req) else {
        return sin_token();
    };

    let id = path.into_inner();
    let resultado = cliente
        .forward(
            Method::GET,
            &format!("/carreras/{}", id),
            &[],
            Some(&token),
            None,
        )
        .await;

    responder(resultado, "Error al obtener la carrera")
}
