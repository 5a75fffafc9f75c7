//! Mapeos entre entidades de acreditación: RAA-RA, OPP-RA y RA-EUR-ACE,
//! más las matrices y los listados de RAs disponibles que consumen los
//! asistentes de mapeo.

use std::collections::HashMap;

use actix_web::{web, HttpRequest, HttpResponse, Responder};
use reqwest::Method;
use serde_json::{json, Value};

use crate::api::{estado, responder, responder_error, sin_token, token_de};
use crate::backend::{mensaje_backend, BackendClient};

/// GET /api/mappings/raa-ra
pub async fn listar_raa_ra_handler(
    cliente: web::Data<BackendClient>,
    req: HttpRequest,
    query: web::Query<HashMap<String, String>>,
) -> impl Responder {
    let Some(token) = token_de(&req) else {
        return sin_token();
    };

    let mut params: Vec<(String, String)> = Vec::new();
    for clave in ["carreraId", "nivelAporte"] {
        if let Some(valor) = query.get(clave) {
            params.push((clave.to_string(), valor.clone()));
        }
    }

    let resultado = cliente
        .forward(Method::GET, "/mappings/raa-ra", &params, Some(&token), None)
        .await;

    responder(resultado, "Error al obtener mappings RAA-RA")
}

/// POST /api/mappings/raa-ra
pub async fn crear_raa_ra_handler(
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
            "/mappings/raa-ra",
            &[],
            Some(&token),
            Some(&body.into_inner()),
        )
        .await;

    responder(resultado, "Error al crear mapping RAA-RA")
}

/// PATCH /api/mappings/raa-ra/{id}
/// El backend solo admite nivel y justificación; el mapeo queda activo.
pub async fn actualizar_raa_ra_handler(
    cliente: web::Data<BackendClient>,
    req: HttpRequest,
    path: web::Path<String>,
    body: web::Json<Value>,
) -> impl Responder {
    let Some(token) = token_de(&req) else {
        return sin_token();
    };

    let id = path.into_inner();
    let entrante = body.into_inner();
    let payload = json!({
        "nivelAporte": entrante.get("nivelAporte").cloned().unwrap_or(Value::Null),
        "justificacion": entrante.get("justificacion").cloned().unwrap_or(Value::Null),
        "estadoActivo": true,
    });

    let resultado = cliente
        .forward(
            Method::PATCH,
            &format!("/mappings/raa-ra/{}", id),
            &[],
            Some(&token),
            Some(&payload),
        )
        .await;

    responder(resultado, "Error al actualizar mapping RAA-RA")
}

/// DELETE /api/mappings/raa-ra/{id}
pub async fn eliminar_raa_ra_handler(
    cliente: web::Data<BackendClient>,
    req: HttpRequest,
    path: web::Path<String>,
) -> impl Responder {
    let Some(token) = token_de(&req) else {
        return sin_token();
    };

    let id = path.into_inner();
    eliminar_mapping(&cliente, &format!("/mappings/raa-ra/{}", id), &token).await
}

/// DELETE /api/mappings/{id}
pub async fn eliminar_handler(
    cliente: web::Data<BackendClient>,
    req: HttpRequest,
    path: web::Path<String>,
) -> impl Responder {
    let Some(token) = token_de(&req) else {
        return sin_token();
    };

    let id = path.into_inner();
    eliminar_mapping(&cliente, &format!("/mappings/{}", id), &token).await
}

/// PUT /api/mappings/{id}
pub async fn actualizar_handler(
    cliente: web::Data<BackendClient>,
    req: HttpRequest,
    path: web::Path<String>,
    body: web::Json<Value>,
) -> impl Responder {
    let Some(token) = token_de(&req) else {
        return sin_token();
    };

    let id = path.into_inner();
    let resultado = cliente
        .forward(
            Method::PUT,
            &format!("/mappings/{}", id),
            &[],
            Some(&token),
            Some(&body.into_inner()),
        )
        .await;

    responder(resultado, "Error al actualizar mapping")
}

/// GET /api/mappings/opp-ra
pub async fn listar_opp_ra_handler(
    cliente: web::Data<BackendClient>,
    req: HttpRequest,
    query: web::Query<Vec<(String, String)>>,
) -> impl Responder {
    let Some(token) = token_de(&req) else {
        return sin_token();
    };

    let resultado = cliente
        .forward(
            Method::GET,
            "/mappings/opp-ra",
            &query.into_inner(),
            Some(&token),
            None,
        )
        .await;

    responder(resultado, "Error al obtener mappings OPP-RA")
}

/// POST /api/mappings/opp-ra/batch
pub async fn crear_opp_ra_batch_handler(
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
            "/mappings/opp-ra/batch",
            &[],
            Some(&token),
            Some(&body.into_inner()),
        )
        .await;

    responder(resultado, "Error al crear mappings OPP-RA")
}

/// GET /api/mappings/eur-ace
/// La ruta pública conserva el nombre corto; el recurso real del backend
/// es `ra-eur-ace`.
pub async fn listar_eur_ace_handler(
    cliente: web::Data<BackendClient>,
    req: HttpRequest,
    query: web::Query<Vec<(String, String)>>,
) -> impl Responder {
    let Some(token) = token_de(&req) else {
        return sin_token();
    };

    let resultado = cliente
        .forward(
            Method::GET,
            "/mappings/ra-eur-ace",
            &query.into_inner(),
            Some(&token),
            None,
        )
        .await;

    responder(resultado, "Error al obtener mappings EUR-ACE")
}

/// POST /api/mappings/eur-ace/batch
pub async fn crear_eur_ace_batch_handler(
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
            "/mappings/ra-eur-ace/batch",
            &[],
            Some(&token),
            Some(&body.into_inner()),
        )
        .await;

    responder(resultado, "Error al crear mapping EUR-ACE")
}

/// GET /api/mappings/raa-ra/matrix/{asignaturaId}/{carreraId}
pub async fn matriz_raa_ra_handler(
    cliente: web::Data<BackendClient>,
    req: HttpRequest,
    path: web::Path<(String, String)>,
) -> impl Responder {
    let Some(token) = token_de(&req) else {
        return sin_token();
    };

    let (asignatura_id, carrera_id) = path.into_inner();
    let resultado = cliente
        .forward(
            Method::GET,
            &format!("/mappings/raa-ra/matrix/{}/{}", asignatura_id, carrera_id),
            &[],
            Some(&token),
            None,
        )
        .await;

    responder(resultado, "Error al obtener matriz RAA-RA")
}

/// GET /api/mappings/opp-ra/matrix/{carreraId}
pub async fn matriz_opp_ra_handler(
    cliente: web::Data<BackendClient>,
    req: HttpRequest,
    path: web::Path<String>,
) -> impl Responder {
    let Some(token) = token_de(&req) else {
        return sin_token();
    };

    let carrera_id = path.into_inner();
    let resultado = cliente
        .forward(
            Method::GET,
            &format!("/mappings/opp-ra/matrix/{}", carrera_id),
            &[],
            Some(&token),
            None,
        )
        .await;

    responder(resultado, "Error al obtener matriz OPP-RA")
}

/// GET /api/mappings/eur-ace/matrix/{carreraId} y
/// GET /api/mappings/ra-eur-ace/matrix/{carreraId}
/// Dos rutas públicas históricas sobre la misma matriz del backend.
pub async fn matriz_eur_ace_handler(
    cliente: web::Data<BackendClient>,
    req: HttpRequest,
    path: web::Path<String>,
) -> impl Responder {
    let Some(token) = token_de(&req) else {
        return sin_token();
    };

    let carrera_id = path.into_inner();
    let resultado = cliente
        .forward(
            Method::GET,
            &format!("/mappings/ra-eur-ace/matrix/{}", carrera_id),
            &[],
            Some(&token),
            None,
        )
        .await;

    responder(resultado, "Error al obtener matriz EUR-ACE")
}

/// GET /api/mappings/available-ras/raa/{raaId}
pub async fn ras_disponibles_raa_handler(
    cliente: web::Data<BackendClient>,
    req: HttpRequest,
    path: web::Path<String>,
    query: web::Query<HashMap<String, String>>,
) -> impl Responder {
    let Some(token) = token_de(&req) else {
        return sin_token();
    };

    let raa_id = path.into_inner();
    let mut params: Vec<(String, String)> = Vec::new();
    for clave in ["carreraId", "tipo"] {
        if let Some(valor) = query.get(clave) {
            params.push((clave.to_string(), valor.clone()));
        }
    }

    let resultado = cliente
        .forward(
            Method::GET,
            &format!("/mappings/available-ras/raa/{}", raa_id),
            &params,
            Some(&token),
            None,
        )
        .await;

    responder(resultado, "Error al obtener RAs disponibles")
}

/// GET /api/mappings/available-ras/opp/{id}
pub async fn ras_disponibles_opp_handler(
    cliente: web::Data<BackendClient>,
    req: HttpRequest,
    path: web::Path<String>,
) -> impl Responder {
    let Some(token) = token_de(&req) else {
        return sin_token();
    };

    let opp_id = path.into_inner();
    let resultado = cliente
        .forward(
            Method::GET,
            &format!("/mappings/available-ras/opp/{}", opp_id),
            &[],
            Some(&token),
            None,
        )
        .await;

    responder(resultado, "Error al obtener RAs disponibles")
}

/// GET /api/mappings/available-ras/eur-ace/{id}
pub async fn ras_disponibles_eur_ace_handler(
    cliente: web::Data<BackendClient>,
    req: HttpRequest,
    path: web::Path<String>,
    query: web::Query<HashMap<String, String>>,
) -> impl Responder {
    let Some(token) = token_de(&req) else {
        return sin_token();
    };

    let criterio_id = path.into_inner();
    let mut params: Vec<(String, String)> = Vec::new();
    if let Some(carrera_id) = query.get("carreraId") {
        params.push(("carreraId".to_string(), carrera_id.clone()));
    }

    let resultado = cliente
        .forward(
            Method::GET,
            &format!("/mappings/available-ras/eur-ace/{}", criterio_id),
            &params,
            Some(&token),
            None,
        )
        .await;

    responder(resultado, "Error al obtener RAs disponibles")
}

/// Borrado común: el backend a veces responde sin cuerpo, así que el éxito
/// se reduce a `{"success": true}`.
async fn eliminar_mapping(cliente: &BackendClient, path: &str, token: &str) -> HttpResponse {
    let relayed = match cliente
        .forward(Method::DELETE, path, &[], Some(token), None)
        .await
    {
        Ok(r) => r,
        Err(err) => return responder_error(err),
    };

    if !relayed.ok() {
        let mensaje = mensaje_backend(&relayed.body, "Error al eliminar mapping");
        return estado(relayed.status).json(json!({"error": mensaje}));
    }

    HttpResponse::Ok().json(json!({"success": true}))
}
