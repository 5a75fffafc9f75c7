//! Configuración del gateway leída del entorno.
//!
//! El origen del backend dejó de ser un literal repetido por handler: se
//! resuelve una sola vez aquí, con el despliegue conocido como valor por
//! defecto para entornos de prueba.

use std::env;

/// Origen por defecto del backend de acreditación (despliegue de prueba).
pub const BACKEND_URL_POR_DEFECTO: &str = "https://backprueba-production-fdf6.up.railway.app";

/// Resuelve la URL base del backend. Se aceptan las tres variables que el
/// frontend histórico usaba, en este orden de precedencia:
/// `BACKEND_URL`, `NEXT_PUBLIC_BACKEND_URL`, `NEXT_PUBLIC_API_URL`.
pub fn backend_url() -> String {
    let origen = env::var("BACKEND_URL")
        .or_else(|_| env::var("NEXT_PUBLIC_BACKEND_URL"))
        .or_else(|_| env::var("NEXT_PUBLIC_API_URL"))
        .unwrap_or_else(|_| BACKEND_URL_POR_DEFECTO.to_string());

    normalizar_origen(&origen)
}

/// Dirección de escucha del gateway (`HOST`/`PORT`, por defecto local).
pub fn bind_addr() -> String {
    let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port = env::var("PORT").unwrap_or_else(|_| "8080".to_string());
    format!("{}:{}", host, port)
}

/// `NEXT_PUBLIC_API_URL` históricamente incluía un sufijo `/api` que los
/// proxies quitaban antes de llamar al backend; se quita aquí junto con
/// cualquier `/` final.
fn normalizar_origen(origen: &str) -> String {
    let limpio = origen.trim_end_matches('/');
    limpio.strip_suffix("/api").unwrap_or(limpio).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalizar_origen_quita_sufijo_api() {
        assert_eq!(
            normalizar_origen("https://backend.example.com/api"),
            "https://backend.example.com"
        );
    }

    #[test]
    fn test_normalizar_origen_quita_barra_final() {
        assert_eq!(
            normalizar_origen("https://backend.example.com/"),
            "https://backend.example.com"
        );
    }

    #[test]
    fn test_normalizar_origen_sin_cambios() {
        assert_eq!(
            normalizar_origen("http://127.0.0.1:9000"),
            "http://127.0.0.1:9000"
        );
    }
}
