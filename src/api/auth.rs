use actix_web::{web, HttpResponse, Responder};
use reqwest::Method;
use serde_json::Value;

use crate::api::responder;
use crate::backend::BackendClient;

/// POST /api/auth/login
/// Único endpoint sin token: reenvía las credenciales y relaya la sesión
/// que entregue el backend.
pub async fn login_handler(
    cliente: web::Data<BackendClient>,
    body: web::Json<Value>,
) -> impl Responder {
    let resultado = cliente
        .forward(Method::POST, "/auth/login", &[], None, Some(&body.into_inner()))
        .await;

    responder(resultado, "Credenciales inválidas")
}
