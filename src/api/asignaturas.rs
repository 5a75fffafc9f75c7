use std::collections::HashMap;

use actix_web::{web, HttpRequest, HttpResponse, Responder};
use reqwest::Method;
use serde_json::{json, Map, Value};

use crate::api::{estado, responder, responder_error, sin_token, token_de};
use crate::backend::{mensaje_backend, BackendClient};

/// Campos que el PATCH del backend acepta; todo lo demás (carreraIds,
/// estadoActivo, campos derivados de la UI) se descarta antes de reenviar.
const CAMPOS_PATCH: [&str; 8] = [
    "codigo",
    "nombre",
    "creditos",
    "descripcion",
    "tipoAsignatura",
    "unidadCurricular",
    "pensum",
    "nivelReferencial",
];

/// GET /api/asignaturas
/// El backend de asignaturas no acepta `page`: una sola llamada con los
/// filtros `carreraId`/`search` y normalización de la forma de respuesta.
pub async fn listar_handler(
    cliente: web::Data<BackendClient>,
    req: HttpRequest,
    query: web::Query<HashMap<String, String>>,
) -> impl Responder {
    let Some(token) = token_de(&req) else {
        return sin_token();
    };

    let qm = query.into_inner();
    let mut params: Vec<(String, String)> = Vec::new();
    if let Some(carrera_id) = qm.get("carreraId") {
        params.push(("carreraId".to_string(), carrera_id.clone()));
    }
    if let Some(search) = qm.get("search").filter(|s| !s.is_empty()) {
        params.push(("search".to_string(), search.clone()));
    }

    let relayed = match cliente
        .forward(Method::GET, "/asignaturas", &params, Some(&token), None)
        .await
    {
        Ok(r) => r,
        Err(err) => return responder_error(err),
    };

    if !relayed.ok() {
        let mensaje = mensaje_backend(&relayed.body, "Error al obtener asignaturas");
        return estado(relayed.status).json(json!({"error": mensaje}));
    }

    HttpResponse::Ok().json(normalizar_lista(relayed.body))
}

/// POST /api/asignaturas
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
            "/asignaturas",
            &[],
            Some(&token),
            Some(&body.into_inner()),
        )
        .await;

    responder(resultado, "Error al crear asignatura")
}

/// PATCH /api/asignaturas/{id}
/// Filtra el cuerpo al conjunto de campos permitidos antes de reenviar.
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
    let filtrado = filtrar_patch(&body.into_inner());

    let resultado = cliente
        .forward(
            Method::PATCH,
            &format!("/asignaturas/{}", id),
            &[],
            Some(&token),
            Some(&filtrado),
        )
        .await;

    responder(resultado, "Error al actualizar asignatura")
}

/// El backend devuelve un array directo o `{data, total}`; la UI siempre
/// recibe la segunda forma. Cualquier otra cosa se trata como conjunto vacío.
pub(crate) fn normalizar_lista(body: Value) -> Value {
    match body {
        Value::Array(items) => {
            let total = items.len();
            json!({"data": items, "total": total})
        }
        Value::Object(ref obj) if obj.get("data").map(Value::is_array).unwrap_or(false) => body,
        _ => json!({"data": [], "total": 0}),
    }
}

/// Conserva solo los campos del conjunto permitido del PATCH.
pub(crate) fn filtrar_patch(body: &Value) -> Value {
    let mut filtrado = Map::new();
    if let Some(obj) = body.as_object() {
        for campo in CAMPOS_PATCH {
            if let Some(valor) = obj.get(campo) {
                filtrado.insert(campo.to_string(), valor.clone());
            }
        }
    }
    Value::Object(filtrado)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filtrar_patch_descarta_campos_extra() {
        let body = json!({
            "codigo": "ISW-401",
            "nombre": "Ingeniería de Software",
            "creditos": 4,
            "carreraIds": [1, 2],
            "estadoActivo": true
        });
        let filtrado = filtrar_patch(&body);
        let obj = filtrado.as_object().unwrap();
        assert_eq!(obj.len(), 3);
        assert!(obj.contains_key("codigo"));
        assert!(obj.contains_key("nombre"));
        assert!(obj.contains_key("creditos"));
        assert!(!obj.contains_key("carreraIds"));
        assert!(!obj.contains_key("estadoActivo"));
    }

    #[test]
    fn test_filtrar_patch_acepta_los_ocho_campos() {
        let body = json!({
            "codigo": "A", "nombre": "B", "creditos": 3, "descripcion": "C",
            "tipoAsignatura": "OBLIGATORIA", "unidadCurricular": "BASICA",
            "pensum": "2020", "nivelReferencial": 5
        });
        let filtrado = filtrar_patch(&body);
        assert_eq!(filtrado.as_object().unwrap().len(), 8);
    }

    #[test]
    fn test_normalizar_lista_envuelve_array() {
        let normalizado = normalizar_lista(json!([{"id": 1}, {"id": 2}]));
        assert_eq!(normalizado["total"], 2);
        assert_eq!(normalizado["data"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_normalizar_lista_conserva_forma_paginada() {
        let body = json!({"data": [{"id": 1}], "total": 42});
        assert_eq!(normalizar_lista(body.clone()), body);
    }

    #[test]
    fn test_normalizar_lista_forma_desconocida() {
        let normalizado = normalizar_lista(json!({"mensaje": "ok"}));
        assert_eq!(normalizado, json!({"data": [], "total": 0}));
    }
}
