use std::collections::HashMap;

use actix_web::{web, HttpRequest, HttpResponse, Responder};
use reqwest::Method;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::api::{estado, responder, responder_error, sin_token, token_de};
use crate::backend::{mensaje_backend, BackendClient};

const ROL_POR_DEFECTO: &str = "PROFESOR";

#[derive(Debug, Deserialize)]
pub struct CambioContrasena {
    #[serde(rename = "contrasenaActual")]
    pub contrasena_actual: Option<String>,
    #[serde(rename = "contrasenaNueva")]
    pub contrasena_nueva: Option<String>,
    #[serde(rename = "confirmarContrasena")]
    pub confirmar_contrasena: Option<String>,
}

/// GET /api/usuarios
/// Listado completo con filtros `rol`/`estadoActivo`/`search`; cada usuario
/// sale con un campo `rol` principal resuelto.
pub async fn listar_handler(
    cliente: web::Data<BackendClient>,
    req: HttpRequest,
    query: web::Query<HashMap<String, String>>,
) -> impl Responder {
    let Some(token) = token_de(&req) else {
        return sin_token();
    };

    let params = filtros_usuarios(&query);
    match cliente.fetch_all_pages("/usuarios", &params, &token).await {
        Ok(usuarios) => {
            let procesados: Vec<Value> = usuarios.into_iter().map(normalizar_rol).collect();
            let total = procesados.len();
            HttpResponse::Ok().json(json!({"data": procesados, "total": total}))
        }
        Err(err) => responder_error(err),
    }
}

/// POST /api/usuarios
pub async fn crear_handler(
    cliente: web::Data<BackendClient>,
    req: HttpRequest,
    body: web::Json<Value>,
) -> impl Responder {
    let Some(token) = token_de(&req) else {
        return sin_token();
    };

    let relayed = match cliente
        .forward(
            Method::POST,
            "/usuarios",
            &[],
            Some(&token),
            Some(&body.into_inner()),
        )
        .await
    {
        Ok(r) => r,
        Err(err) => return responder_error(err),
    };

    if !relayed.ok() {
        let mensaje = mensaje_backend(&relayed.body, "Error al crear usuario");
        return estado(relayed.status).json(json!({"error": mensaje}));
    }

    HttpResponse::Created().json(relayed.body)
}

/// POST /api/usuarios/multi-rol
/// Alta con varios roles a la vez; este endpoint reporta sus errores bajo
/// la clave `message` (contrato histórico de la pantalla de usuarios).
pub async fn crear_multi_rol_handler(
    cliente: web::Data<BackendClient>,
    req: HttpRequest,
    body: web::Json<Value>,
) -> impl Responder {
    let Some(token) = token_de(&req) else {
        return HttpResponse::Unauthorized()
            .json(json!({"message": "Token de autorización requerido"}));
    };

    let relayed = match cliente
        .forward(
            Method::POST,
            "/usuarios/multi-rol",
            &[],
            Some(&token),
            Some(&body.into_inner()),
        )
        .await
    {
        Ok(r) => r,
        Err(err) => {
            log::error!("error de red en usuarios multi-rol: {}", err);
            return HttpResponse::InternalServerError()
                .json(json!({"message": "Error interno del servidor"}));
        }
    };

    if !relayed.ok() {
        let mensaje = mensaje_backend(&relayed.body, "Error al crear usuario");
        return estado(relayed.status).json(json!({"message": mensaje}));
    }

    HttpResponse::Created().json(relayed.body)
}

/// GET /api/usuarios/with-roles
/// Igual que el listado estándar pero garantizando un array `roles` por
/// usuario, para las pantallas que trabajan con roles múltiples.
pub async fn listar_con_roles_handler(
    cliente: web::Data<BackendClient>,
    req: HttpRequest,
    query: web::Query<HashMap<String, String>>,
) -> impl Responder {
    let Some(token) = token_de(&req) else {
        return sin_token();
    };

    let params = filtros_usuarios(&query);
    let relayed = match cliente
        .forward(Method::GET, "/usuarios", &params, Some(&token), None)
        .await
    {
        Ok(r) => r,
        Err(err) => return responder_error(err),
    };

    if !relayed.ok() {
        let mensaje = mensaje_backend(&relayed.body, "Error al obtener usuarios");
        return estado(relayed.status).json(json!({"error": mensaje}));
    }

    let procesados = match extraer_usuarios(relayed.body) {
        Some(usuarios) => usuarios.into_iter().map(asegurar_roles).collect::<Vec<_>>(),
        None => return HttpResponse::Ok().json(Vec::<Value>::new()),
    };

    HttpResponse::Ok().json(procesados)
}

/// GET /api/usuarios/me
pub async fn perfil_handler(
    cliente: web::Data<BackendClient>,
    req: HttpRequest,
) -> impl Responder {
    let Some(token) = token_de(&req) else {
        return sin_token();
    };

    let relayed = match cliente
        .forward(Method::GET, "/usuarios/me", &[], Some(&token), None)
        .await
    {
        Ok(r) => r,
        Err(err) => return responder_error(err),
    };

    // Un 404 aquí significa que el backend aún no implementa el perfil; la
    // UI arma los datos del lado del cliente cuando ve esta marca.
    if relayed.status == 404 {
        return HttpResponse::NotFound().json(json!({
            "error": "Endpoint de perfil no implementado",
            "needsClientSideData": true
        }));
    }

    if !relayed.ok() {
        let mensaje = mensaje_backend(&relayed.body, "Error al obtener perfil de usuario");
        return estado(relayed.status).json(json!({"error": mensaje}));
    }

    HttpResponse::Ok().json(relayed.body)
}

/// GET /api/usuarios/me/roles-permissions
pub async fn roles_permisos_handler(
    cliente: web::Data<BackendClient>,
    req: HttpRequest,
) -> impl Responder {
    let Some(token) = token_de(&req) else {
        return sin_token();
    };

    let resultado = cliente
        .forward(
            Method::GET,
            "/usuarios/me/roles-permissions",
            &[],
            Some(&token),
            None,
        )
        .await;

    responder(resultado, "Error al obtener perfil con roles")
}

/// PUT /api/usuarios/me/password
/// Valida localmente antes de reenviar: los tres campos son obligatorios y
/// la confirmación debe coincidir.
pub async fn cambiar_contrasena_handler(
    cliente: web::Data<BackendClient>,
    req: HttpRequest,
    body: web::Json<CambioContrasena>,
) -> impl Responder {
    let Some(token) = token_de(&req) else {
        return sin_token();
    };

    let cambio = body.into_inner();
    if let Some(error) = validar_cambio(&cambio) {
        return HttpResponse::BadRequest().json(json!({"error": error}));
    }

    let payload = json!({
        "contrasenaActual": cambio.contrasena_actual,
        "contrasenaNueva": cambio.contrasena_nueva,
        "confirmarContrasena": cambio.confirmar_contrasena,
    });

    let relayed = match cliente
        .forward(
            Method::PUT,
            "/usuarios/me/password",
            &[],
            Some(&token),
            Some(&payload),
        )
        .await
    {
        Ok(r) => r,
        Err(err) => return responder_error(err),
    };

    if !relayed.ok() {
        let mensaje = mensaje_backend(&relayed.body, "Error al cambiar contraseña");
        return estado(relayed.status).json(json!({"error": mensaje}));
    }

    let mensaje = mensaje_backend(&relayed.body, "Contraseña actualizada exitosamente");
    HttpResponse::Ok().json(json!({"message": mensaje, "success": true}))
}

fn filtros_usuarios(query: &HashMap<String, String>) -> Vec<(String, String)> {
    let mut params: Vec<(String, String)> = Vec::new();
    for clave in ["rol", "estadoActivo", "search"] {
        if let Some(valor) = query.get(clave) {
            params.push((clave.to_string(), valor.clone()));
        }
    }
    params
}

/// Acepta tanto un array directo como `{data: [...]}`.
fn extraer_usuarios(body: Value) -> Option<Vec<Value>> {
    match body {
        Value::Array(usuarios) => Some(usuarios),
        Value::Object(mut obj) => match obj.remove("data") {
            Some(Value::Array(usuarios)) => Some(usuarios),
            _ => None,
        },
        _ => None,
    }
}

/// Resuelve el rol principal de un usuario con roles múltiples:
/// `rolPrincipal`, luego `rol`, luego el primero de `roles`, y el rol por
/// defecto como último recurso.
pub(crate) fn normalizar_rol(mut usuario: Value) -> Value {
    let Some(obj) = usuario.as_object_mut() else {
        return usuario;
    };
    if !obj.get("roles").map(Value::is_array).unwrap_or(false) {
        return usuario;
    }

    let principal = obj
        .get("rolPrincipal")
        .and_then(Value::as_str)
        .or_else(|| obj.get("rol").and_then(Value::as_str))
        .map(str::to_string)
        .or_else(|| {
            obj.get("roles")
                .and_then(Value::as_array)
                .and_then(|roles| roles.first())
                .and_then(|rol| rol.get("rol"))
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .unwrap_or_else(|| ROL_POR_DEFECTO.to_string());

    obj.insert("rol".to_string(), Value::String(principal));
    usuario
}

/// Garantiza un array `roles` no vacío, derivado del rol principal si el
/// usuario viene del sistema antiguo de rol único.
pub(crate) fn asegurar_roles(mut usuario: Value) -> Value {
    let Some(obj) = usuario.as_object_mut() else {
        return usuario;
    };
    let tiene_roles = obj
        .get("roles")
        .and_then(Value::as_array)
        .map(|roles| !roles.is_empty())
        .unwrap_or(false);
    if tiene_roles {
        return usuario;
    }

    let rol = obj
        .get("rol")
        .and_then(Value::as_str)
        .unwrap_or(ROL_POR_DEFECTO)
        .to_string();
    obj.insert(
        "roles".to_string(),
        json!([{"rol": rol, "observaciones": ""}]),
    );
    usuario
}

fn validar_cambio(cambio: &CambioContrasena) -> Option<&'static str> {
    let vacio = |campo: &Option<String>| campo.as_deref().map(str::is_empty).unwrap_or(true);
    if vacio(&cambio.contrasena_actual)
        || vacio(&cambio.contrasena_nueva)
        || vacio(&cambio.confirmar_contrasena)
    {
        return Some("Todos los campos son requeridos");
    }
    if cambio.contrasena_nueva != cambio.confirmar_contrasena {
        return Some("Las contraseñas no coinciden");
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalizar_rol_prefiere_rol_principal() {
        let usuario = json!({
            "id": 1,
            "rolPrincipal": "DECANO",
            "roles": [{"rol": "PROFESOR"}, {"rol": "DECANO"}]
        });
        assert_eq!(normalizar_rol(usuario)["rol"], "DECANO");
    }

    #[test]
    fn test_normalizar_rol_usa_primer_rol_de_la_lista() {
        let usuario = json!({"id": 2, "roles": [{"rol": "COORDINADOR"}]});
        assert_eq!(normalizar_rol(usuario)["rol"], "COORDINADOR");
    }

    #[test]
    fn test_normalizar_rol_por_defecto() {
        let usuario = json!({"id": 3, "roles": []});
        assert_eq!(normalizar_rol(usuario)["rol"], "PROFESOR");
    }

    #[test]
    fn test_normalizar_rol_sin_lista_no_toca_nada() {
        let usuario = json!({"id": 4, "rol": "DGIP"});
        let normalizado = normalizar_rol(usuario.clone());
        assert_eq!(normalizado, usuario);
    }

    #[test]
    fn test_asegurar_roles_conserva_existentes() {
        let usuario = json!({"id": 1, "roles": [{"rol": "CEI", "observaciones": "x"}]});
        let procesado = asegurar_roles(usuario.clone());
        assert_eq!(procesado, usuario);
    }

    #[test]
    fn test_asegurar_roles_deriva_del_rol_unico() {
        let usuario = json!({"id": 2, "rol": "DECANO"});
        let procesado = asegurar_roles(usuario);
        assert_eq!(procesado["roles"], json!([{"rol": "DECANO", "observaciones": ""}]));
    }

    #[test]
    fn test_asegurar_roles_por_defecto() {
        let procesado = asegurar_roles(json!({"id": 3}));
        assert_eq!(procesado["roles"][0]["rol"], "PROFESOR");
    }

    #[test]
    fn test_validar_cambio_campos_requeridos() {
        let cambio = CambioContrasena {
            contrasena_actual: Some("a".into()),
            contrasena_nueva: None,
            confirmar_contrasena: Some("b".into()),
        };
        assert_eq!(validar_cambio(&cambio), Some("Todos los campos son requeridos"));
    }

    #[test]
    fn test_validar_cambio_confirmacion_distinta() {
        let cambio = CambioContrasena {
            contrasena_actual: Some("vieja".into()),
            contrasena_nueva: Some("nueva1".into()),
            confirmar_contrasena: Some("nueva2".into()),
        };
        assert_eq!(validar_cambio(&cambio), Some("Las contraseñas no coinciden"));
    }

    #[test]
    fn test_validar_cambio_correcto() {
        let cambio = CambioContrasena {
            contrasena_actual: Some("vieja".into()),
            contrasena_nueva: Some("nueva".into()),
            confirmar_contrasena: Some("nueva".into()),
        };
        assert_eq!(validar_cambio(&cambio), None);
    }
}
