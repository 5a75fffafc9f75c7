//! Cliente HTTP hacia el backend de acreditación.
//!
//! Todos los handlers del gateway pasan por aquí: reenvío simple de una
//! petición (`forward`) o agregación de un listado paginado completo
//! (`fetch_all_pages`). El backend devuelve páginas con la forma
//! `{data: [..], total: n}` o, para algunos recursos, un array directo.

use std::time::Duration;

use log::{error, info, warn};
use reqwest::Method;
use serde_json::Value;
use thiserror::Error;

/// Límite de seguridad de la agregación: nunca se piden más de 100 páginas,
/// aunque el backend nunca alcance el `total` que reporta.
pub const MAX_PAGINAS: u32 = 100;

const MENSAJE_PAGINA: &str = "Error al obtener datos del backend";

/// Fallos al hablar con el backend.
#[derive(Debug, Error)]
pub enum ProxyError {
    /// La petición no llegó o la respuesta no se pudo leer (red, DNS, timeout).
    #[error("error de red hacia el backend: {0}")]
    Transport(#[from] reqwest::Error),
    /// El backend respondió con un estado no exitoso; se conserva su código
    /// y el mensaje extraído del cuerpo para reenviarlos tal cual.
    #[error("backend respondió {status}: {message}")]
    Backend { status: u16, message: String },
}

/// Respuesta del backend lista para reenviar: código de estado más cuerpo
/// JSON ya parseado (`Null` si el cuerpo no era JSON).
#[derive(Debug, Clone)]
pub struct Relayed {
    pub status: u16,
    pub body: Value,
}

impl Relayed {
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Forma de una página de listado devuelta por el backend.
#[derive(Debug, PartialEq)]
pub(crate) enum Pagina {
    /// `{data: [..], total: n}`: fragmento de un conjunto mayor.
    Parcial { items: Vec<Value>, total: u64 },
    /// Array directo: el backend entregó el conjunto completo de una vez.
    Completa(Vec<Value>),
    /// Cualquier otra forma corta la iteración.
    Desconocida,
}

#[derive(Clone)]
pub struct BackendClient {
    base_url: String,
    http: reqwest::Client,
}

impl BackendClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("poliacredita-api/0.1")
            .build()
            .expect("no se pudo construir el cliente HTTP");

        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
        }
    }

    /// Reenvía una petición al backend y devuelve su estado y cuerpo sin
    /// interpretarlos. Solo los fallos de transporte son `Err`; un estado
    /// no exitoso del backend es una respuesta válida que el handler relaya.
    pub async fn forward(
        &self,
        method: Method,
        path: &str,
        query: &[(String, String)],
        token: Option<&str>,
        body: Option<&Value>,
    ) -> Result<Relayed, ProxyError> {
        let url = format!("{}{}", self.base_url, path);
        let mut peticion = self
            .http
            .request(method, &url)
            .header("Content-Type", "application/json");

        if !query.is_empty() {
            peticion = peticion.query(query);
        }
        if let Some(token) = token {
            peticion = peticion.header("Authorization", token);
        }
        if let Some(body) = body {
            peticion = peticion.json(body);
        }

        let respuesta = peticion.send().await?;
        let status = respuesta.status().as_u16();
        let body = respuesta.json::<Value>().await.unwrap_or(Value::Null);

        Ok(Relayed { status, body })
    }

    /// Agrega el listado completo de un recurso paginado.
    ///
    /// Pide `page=1,2,…` en secuencia y concatena `data` hasta acumular el
    /// `total` reportado. Un array directo se toma como conjunto completo y
    /// corta en la primera llamada. Una página no exitosa aborta con el
    /// estado y mensaje del backend. `page`/`limit` entrantes se descartan:
    /// la iteración es dueña de la paginación.
    pub async fn fetch_all_pages(
        &self,
        path: &str,
        query: &[(String, String)],
        token: &str,
    ) -> Result<Vec<Value>, ProxyError> {
        let base: Vec<(String, String)> = query
            .iter()
            .filter(|(clave, _)| clave != "page" && clave != "limit")
            .cloned()
            .collect();

        let mut acumulado: Vec<Value> = Vec::new();
        let mut pagina: u32 = 1;

        loop {
            let mut params = base.clone();
            params.push(("page".to_string(), pagina.to_string()));

            let relayed = self
                .forward(Method::GET, path, &params, Some(token), None)
                .await?;

            if !relayed.ok() {
                let message = mensaje_backend(&relayed.body, MENSAJE_PAGINA);
                error!(
                    "backend error en {} página {}: {} {}",
                    path, pagina, relayed.status, message
                );
                return Err(ProxyError::Backend {
                    status: relayed.status,
                    message,
                });
            }

            match clasificar_pagina(relayed.body) {
                Pagina::Parcial { mut items, total } => {
                    acumulado.append(&mut items);
                    info!(
                        "{} página {}: acumulado {}/{}",
                        path,
                        pagina,
                        acumulado.len(),
                        total
                    );
                    if acumulado.len() as u64 >= total {
                        break;
                    }
                }
                Pagina::Completa(items) => {
                    acumulado = items;
                    break;
                }
                Pagina::Desconocida => break,
            }

            pagina += 1;
            if pagina > MAX_PAGINAS {
                warn!("{}: límite de páginas alcanzado", path);
                break;
            }
        }

        Ok(acumulado)
    }
}

/// Decide la forma de una página de listado.
pub(crate) fn clasificar_pagina(body: Value) -> Pagina {
    match body {
        Value::Array(items) => Pagina::Completa(items),
        Value::Object(mut obj) => match obj.remove("data") {
            Some(Value::Array(items)) => {
                let total = obj.get("total").and_then(Value::as_u64).unwrap_or(0);
                Pagina::Parcial { items, total }
            }
            _ => Pagina::Desconocida,
        },
        _ => Pagina::Desconocida,
    }
}

/// Extrae el mensaje legible de un cuerpo de error del backend
/// (`error`, luego `message`, luego el texto de respaldo del recurso).
pub fn mensaje_backend(body: &Value, fallback: &str) -> String {
    body.get("error")
        .and_then(Value::as_str)
        .or_else(|| body.get("message").and_then(Value::as_str))
        .map(str::to_string)
        .unwrap_or_else(|| fallback.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_clasificar_pagina_con_data_y_total() {
        let body = json!({"data": [{"id": 1}, {"id": 2}], "total": 7});
        match clasificar_pagina(body) {
            Pagina::Parcial { items, total } => {
                assert_eq!(items.len(), 2);
                assert_eq!(total, 7);
            }
            otra => panic!("forma inesperada: {:?}", otra),
        }
    }

    #[test]
    fn test_clasificar_pagina_array_directo() {
        let body = json!([{"id": 1}, {"id": 2}, {"id": 3}]);
        assert_eq!(
            clasificar_pagina(body),
            Pagina::Completa(vec![json!({"id": 1}), json!({"id": 2}), json!({"id": 3})])
        );
    }

    #[test]
    fn test_clasificar_pagina_sin_total_asume_cero() {
        // Sin `total` la página cuenta como completa en la primera vuelta:
        // el acumulado siempre es >= 0.
        let body = json!({"data": [{"id": 1}]});
        match clasificar_pagina(body) {
            Pagina::Parcial { total, .. } => assert_eq!(total, 0),
            otra => panic!("forma inesperada: {:?}", otra),
        }
    }

    #[test]
    fn test_clasificar_pagina_desconocida() {
        assert_eq!(clasificar_pagina(json!({"ok": true})), Pagina::Desconocida);
        assert_eq!(clasificar_pagina(Value::Null), Pagina::Desconocida);
        assert_eq!(clasificar_pagina(json!("texto")), Pagina::Desconocida);
    }

    #[test]
    fn test_mensaje_backend_prefiere_error() {
        let body = json!({"error": "duplicado", "message": "otro"});
        assert_eq!(mensaje_backend(&body, "fallback"), "duplicado");
    }

    #[test]
    fn test_mensaje_backend_usa_message() {
        let body = json!({"message": "ya existe una facultad con ese nombre"});
        assert_eq!(
            mensaje_backend(&body, "fallback"),
            "ya existe una facultad con ese nombre"
        );
    }

    #[test]
    fn test_mensaje_backend_fallback() {
        assert_eq!(mensaje_backend(&Value::Null, "Error al crear asignatura"),
            "Error al crear asignatura");
        assert_eq!(mensaje_backend(&json!({"error": 42}), "fallback"), "fallback");
    }
}
