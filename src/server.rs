use actix_cors::Cors;
use actix_web::{web, App, HttpResponse, HttpServer, Responder};
use serde_json::json;

use crate::api;
use crate::backend::BackendClient;

/// GET /
async fn raiz_handler() -> impl Responder {
    HttpResponse::Ok().json(json!({
        "servicio": "poliacredita-api",
        "descripcion": "Gateway HTTP hacia el backend de acreditación académica"
    }))
}

/// Registra todas las rutas del gateway. Separado de `run_server` para que
/// los tests monten la misma App contra un backend simulado.
pub fn configurar_rutas(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(raiz_handler))
        // Autenticación
        .route("/api/auth/login", web::post().to(api::auth::login_handler))
        // Facultades y carreras
        .route("/api/facultades", web::get().to(api::facultades::listar_handler))
        .route("/api/facultades", web::post().to(api::facultades::crear_handler))
        .route("/api/carreras", web::get().to(api::carreras::listar_handler))
        .route("/api/carreras", web::post().to(api::carreras::crear_handler))
        .route("/api/carreras/{id}", web::get().to(api::carreras::obtener_handler))
        // Asignaturas
        .route("/api/asignaturas", web::get().to(api::asignaturas::listar_handler))
        .route("/api/asignaturas", web::post().to(api::asignaturas::crear_handler))
        .route("/api/asignaturas/{id}", web::patch().to(api::asignaturas::actualizar_handler))
        // Resultados de aprendizaje (RA carrera y RAA asignatura)
        .route("/api/learning-outcomes", web::get().to(api::learning_outcomes::listar_handler))
        .route("/api/learning-outcomes", web::post().to(api::learning_outcomes::crear_handler))
        .route("/api/raa", web::get().to(api::raa::listar_handler))
        .route("/api/raa", web::post().to(api::raa::crear_handler))
        // Objetivos y criterios
        .route("/api/program-objectives", web::get().to(api::program_objectives::listar_handler))
        .route("/api/program-objectives", web::post().to(api::program_objectives::crear_handler))
        .route("/api/eur-ace-criteria", web::get().to(api::eur_ace::listar_handler))
        .route("/api/eur-ace-criteria", web::post().to(api::eur_ace::crear_handler))
        // Mapeos
        .route("/api/mappings/raa-ra", web::get().to(api::mappings::listar_raa_ra_handler))
        .route("/api/mappings/raa-ra", web::post().to(api::mappings::crear_raa_ra_handler))
        .route(
            "/api/mappings/raa-ra/matrix/{asignaturaId}/{carreraId}",
            web::get().to(api::mappings::matriz_raa_ra_handler),
        )
        .route("/api/mappings/raa-ra/{id}", web::patch().to(api::mappings::actualizar_raa_ra_handler))
        .route("/api/mappings/raa-ra/{id}", web::delete().to(api::mappings::eliminar_raa_ra_handler))
        .route("/api/mappings/opp-ra", web::get().to(api::mappings::listar_opp_ra_handler))
        .route("/api/mappings/opp-ra/batch", web::post().to(api::mappings::crear_opp_ra_batch_handler))
        .route(
            "/api/mappings/opp-ra/matrix/{carreraId}",
            web::get().to(api::mappings::matriz_opp_ra_handler),
        )
        .route("/api/mappings/eur-ace", web::get().to(api::mappings::listar_eur_ace_handler))
        .route("/api/mappings/eur-ace/batch", web::post().to(api::mappings::crear_eur_ace_batch_handler))
        .route(
            "/api/mappings/eur-ace/matrix/{carreraId}",
            web::get().to(api::mappings::matriz_eur_ace_handler),
        )
        .route(
            "/api/mappings/ra-eur-ace/matrix/{carreraId}",
            web::get().to(api::mappings::matriz_eur_ace_handler),
        )
        .route(
            "/api/mappings/available-ras/raa/{raaId}",
            web::get().to(api::mappings::ras_disponibles_raa_handler),
        )
        .route(
            "/api/mappings/available-ras/opp/{id}",
            web::get().to(api::mappings::ras_disponibles_opp_handler),
        )
        .route(
            "/api/mappings/available-ras/eur-ace/{id}",
            web::get().to(api::mappings::ras_disponibles_eur_ace_handler),
        )
        .route("/api/mappings/{id}", web::put().to(api::mappings::actualizar_handler))
        .route("/api/mappings/{id}", web::delete().to(api::mappings::eliminar_handler))
        // Usuarios y roles
        .route("/api/usuarios", web::get().to(api::usuarios::listar_handler))
        .route("/api/usuarios", web::post().to(api::usuarios::crear_handler))
        .route("/api/usuarios/multi-rol", web::post().to(api::usuarios::crear_multi_rol_handler))
        .route("/api/usuarios/with-roles", web::get().to(api::usuarios::listar_con_roles_handler))
        .route("/api/usuarios/me", web::get().to(api::usuarios::perfil_handler))
        .route(
            "/api/usuarios/me/roles-permissions",
            web::get().to(api::usuarios::roles_permisos_handler),
        )
        .route(
            "/api/usuarios/me/password",
            web::put().to(api::usuarios::cambiar_contrasena_handler),
        )
        .route("/api/roles", web::get().to(api::roles::listar_handler))
        // Dashboard y reportes
        .route("/api/dashboard/activity", web::get().to(api::dashboard::actividad_handler))
        .route(
            "/api/reportes/opp-ra-asignaturas/{carreraId}",
            web::get().to(api::reportes::opp_ra_asignaturas_handler),
        )
        .route(
            "/api/reportes/trazabilidad-asignatura/{asignaturaId}",
            web::get().to(api::reportes::trazabilidad_asignatura_handler),
        );
}

pub async fn run_server(bind_addr: &str, backend_url: String) -> std::io::Result<()> {
    let cliente = web::Data::new(BackendClient::new(backend_url));

    HttpServer::new(move || {
        App::new()
            .app_data(cliente.clone())
            .wrap(Cors::permissive())
            .configure(configurar_rutas)
    })
    .bind(bind_addr)?
    .run()
    .await
}
