use std::collections::HashMap;

use actix_web::{web, HttpRequest, HttpResponse, Responder};
use reqwest::Method;
use serde_json::{json, Value};

use crate::api::asignaturas::normalizar_lista;
use crate::api::{estado, responder, responder_error, sin_token, token_de};
use crate::backend::{mensaje_backend, BackendClient};

/// GET /api/raa
/// Resultados de aprendizaje de asignatura; sin paginación, filtrados por
/// `asignaturaId`.
pub async fn listar_handler(
    cliente: web::Data<BackendClient>,
    req: HttpRequest,
    query: web::Query<HashMap<String, String>>,
) -> impl Responder {
    let Some(token) = token_de(&req) else {
        return sin_token();
    };

    let mut params: Vec<(String, String)> = Vec::new();
    if let Some(asignatura_id) = query.get("asignaturaId") {
        params.push(("asignaturaId".to_string(), asignatura_id.clone()));
    }

    let relayed = match cliente
        .forward(Method::GET, "/raa", &params, Some(&token), None)
        .await
    {
        Ok(r) => r,
        Err(err) => return responder_error(err),
    };

    if !relayed.ok() {
        let mensaje = mensaje_backend(&relayed.body, "Error al obtener RAAs");
        return estado(relayed.status).json(json!({"error": mensaje}));
    }

    HttpResponse::Ok().json(normalizar_lista(relayed.body))
}

/// POST /api/raa
pub async fn crear_handler(
    cliente: web::Data<BackendClient>,
    req: HttpRequest,
    body: web::Json<Value>,
) -> impl Responder {
    let Some(token) = token_de(&req) else {
        return sin_token();
    };

    let resultado = cliente
        .forward(Method::POST, "/raa", &[], Some(&token), Some(&body.into_inner()))
        .await;

    responder(resultado, "Error al crear RAA")
}
