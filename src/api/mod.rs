//! Handlers del gateway, uno por recurso del backend.
//!
//! Cada handler exige (salvo excepciones documentadas) un header
//! `Authorization` tipo bearer, reenvía la petición al backend y relaya el
//! estado y el mensaje de error tal cual los entrega éste. Los fallos
//! locales de red o parseo responden 500 con un mensaje genérico.

pub mod asignaturas;
pub mod auth;
pub mod carreras;
pub mod dashboard;
pub mod eur_ace;
pub mod facultades;
pub mod learning_outcomes;
pub mod mappings;
pub mod program_objectives;
pub mod raa;
pub mod reportes;
pub mod roles;
pub mod usuarios;

use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, HttpResponseBuilder};
use log::error;
use serde_json::json;

use crate::backend::{mensaje_backend, BackendClient, ProxyError, Relayed};

/// Header de autorización entrante, si existe (se reenvía completo,
/// incluido el prefijo `Bearer`).
pub(crate) fn token_de(req: &HttpRequest) -> Option<String> {
    req.headers()
        .get("authorization")
        .and_then(|valor| valor.to_str().ok())
        .map(str::to_string)
}

/// 401 estándar para rutas protegidas sin token.
pub(crate) fn sin_token() -> HttpResponse {
    HttpResponse::Unauthorized().json(json!({"error": "Token de autorización requerido"}))
}

/// 500 genérico para fallos locales (red caída, cuerpo ilegible).
pub(crate) fn error_interno() -> HttpResponse {
    HttpResponse::InternalServerError().json(json!({"error": "Error interno del servidor"}))
}

/// Builder con el estado del backend; un código fuera de rango degrada a 500.
pub(crate) fn estado(status: u16) -> HttpResponseBuilder {
    HttpResponse::build(
        StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
    )
}

/// Convierte el resultado de un reenvío simple en la respuesta al cliente:
/// éxito se relaya con cuerpo y estado intactos, un estado no exitoso se
/// reduce a `{error}` con el mensaje extraído del cuerpo del backend.
pub(crate) fn responder(resultado: Result<Relayed, ProxyError>, fallback: &str) -> HttpResponse {
    match resultado {
        Ok(relayed) if relayed.ok() => estado(relayed.status).json(relayed.body),
        Ok(relayed) => {
            let mensaje = mensaje_backend(&relayed.body, fallback);
            error!("backend error: {} {}", relayed.status, mensaje);
            estado(relayed.status).json(json!({"error": mensaje}))
        }
        Err(err) => responder_error(err),
    }
}

/// Respuesta para un `ProxyError`: el estado del backend se relaya, un
/// fallo de transporte es un 500 local.
pub(crate) fn responder_error(err: ProxyError) -> HttpResponse {
    match err {
        ProxyError::Backend { status, message } => estado(status).json(json!({"error": message})),
        ProxyError::Transport(err) => {
            error!("error de red hacia el backend: {}", err);
            error_interno()
        }
    }
}

/// Camino común de los listados de conjunto completo: exige token, agrega
/// todas las páginas del recurso y responde `{data, total}` con el total
/// real acumulado (reemplaza las seis copias del bucle del frontend
/// histórico).
pub(crate) async fn listar_completo(
    cliente: &BackendClient,
    req: &HttpRequest,
    path: &str,
    query: Vec<(String, String)>,
) -> HttpResponse {
    let Some(token) = token_de(req) else {
        return sin_token();
    };

    match cliente.fetch_all_pages(path, &query, &token).await {
        Ok(items) => {
            let total = items.len();
            HttpResponse::Ok().json(json!({"data": items, "total": total}))
        }
        Err(err) => responder_error(err),
    }
}
