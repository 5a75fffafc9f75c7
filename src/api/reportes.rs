use actix_web::{web, HttpRequest, HttpResponse, Responder};
use reqwest::Method;
use serde_json::json;

use crate::api::{responder, sin_token, token_de};
use crate::backend::BackendClient;

/// GET /api/reportes/opp-ra-asignaturas/{carreraId}
/// `nivelesAporte` puede venir repetido (Alto/Medio/Bajo); se reenvía cada
/// ocurrencia.
pub async fn opp_ra_asignaturas_handler(
    cliente: web::Data<BackendClient>,
    req: HttpRequest,
    path: web::Path<String>,
    query: web::Query<Vec<(String, String)>>,
) -> impl Responder {
    let Some(token) = token_de(&req) else {
        return sin_token();
    };

    let carrera_id = path.into_inner();
    let niveles = niveles_aporte(query.into_inner());

    let resultado = cliente
        .forward(
            Method::GET,
            &format!("/reportes/opp-ra-asignaturas/{}", carrera_id),
            &niveles,
            Some(&token),
            None,
        )
        .await;

    responder(resultado, "Error al obtener reporte")
}

/// GET /api/reportes/trazabilidad-asignatura/{asignaturaId}
pub async fn trazabilidad_asignatura_handler(
    cliente: web::Data<BackendClient>,
    req: HttpRequest,
    path: web::Path<String>,
    query: web::Query<Vec<(String, String)>>,
) -> impl Responder {
    let Some(token) = token_de(&req) else {
        return sin_token();
    };

    let pares = query.into_inner();
    let carrera_id = pares
        .iter()
        .find(|(clave, _)| clave == "carreraId")
        .map(|(_, valor)| valor.clone());
    let Some(carrera_id) = carrera_id else {
        return HttpResponse::BadRequest().json(json!({"error": "carreraId es requerido"}));
    };

    let asignatura_id = path.into_inner();
    let mut params = niveles_aporte(pares);
    params.push(("carreraId".to_string(), carrera_id));

    let resultado = cliente
        .forward(
            Method::GET,
            &format!("/reportes/trazabilidad-asignatura/{}", asignatura_id),
            &params,
            Some(&token),
            None,
        )
        .await;

    responder(resultado, "Error al obtener trazabilidad")
}

fn niveles_aporte(pares: Vec<(String, String)>) -> Vec<(String, String)> {
    pares
        .into_iter()
        .filter(|(clave, _)| clave == "nivelesAporte")
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_niveles_aporte_conserva_repetidos() {
        let pares = vec![
            ("nivelesAporte".to_string(), "Alto".to_string()),
            ("carreraId".to_string(), "7".to_string()),
            ("nivelesAporte".to_string(), "Medio".to_string()),
        ];
        let niveles = niveles_aporte(pares);
        assert_eq!(niveles.len(), 2);
        assert_eq!(niveles[0].1, "Alto");
        assert_eq!(niveles[1].1, "Medio");
    }
}
