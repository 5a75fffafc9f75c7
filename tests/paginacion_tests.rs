//! Tests de la agregación paginada: el gateway debe juntar todas las
//! páginas del backend, respetar las formas alternativas de respuesta y
//! cortar en el límite de seguridad.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use actix_web::{test, web, App, HttpResponse, HttpServer};
use serde_json::{json, Value};

use poliacredita_api::backend::BackendClient;
use poliacredita_api::server::configurar_rutas;

const TAMANO_PAGINA: usize = 10;

/// Levanta un backend simulado en un puerto libre y devuelve su origen.
async fn backend_simulado<F>(configure: F) -> String
where
    F: Fn(&mut web::ServiceConfig) + Send + Clone + 'static,
{
    let server = HttpServer::new(move || App::new().configure(configure.clone()))
        .workers(1)
        .disable_signals()
        .bind(("127.0.0.1", 0))
        .expect("no se pudo abrir el backend simulado");
    let addr = server.addrs()[0];
    actix_web::rt::spawn(server.run());
    format!("http://{}", addr)
}

fn peticion_con_token(uri: &str) -> actix_web::test::TestRequest {
    test::TestRequest::get()
        .uri(uri)
        .insert_header(("Authorization", "Bearer token-de-prueba"))
}

/// Backend que sirve `total` elementos en páginas de `TAMANO_PAGINA`.
async fn pagina_de_facultades(
    query: web::Query<HashMap<String, String>>,
    llamadas: web::Data<Arc<AtomicUsize>>,
) -> HttpResponse {
    llamadas.fetch_add(1, Ordering::SeqCst);
    let total = 25usize;
    let page: usize = query
        .get("page")
        .and_then(|p| p.parse().ok())
        .unwrap_or(1);
    let inicio = (page - 1) * TAMANO_PAGINA;
    let fin = (inicio + TAMANO_PAGINA).min(total);
    let items: Vec<Value> = (inicio..fin)
        .map(|i| json!({"id": i, "nombre": format!("Facultad {}", i)}))
        .collect();

    HttpResponse::Ok().json(json!({"data": items, "total": total}))
}

#[actix_web::test]
async fn agrega_todas_las_paginas_sin_duplicados() {
    let llamadas = Arc::new(AtomicUsize::new(0));
    let contador = llamadas.clone();
    let origen = backend_simulado(move |cfg: &mut web::ServiceConfig| {
        cfg.app_data(web::Data::new(contador.clone()))
            .route("/facultades", web::get().to(pagina_de_facultades));
    })
    .await;

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(BackendClient::new(origen)))
            .configure(configurar_rutas),
    )
    .await;

    let resp = test::call_service(&app, peticion_con_token("/api/facultades").to_request()).await;
    assert!(resp.status().is_success());

    let cuerpo: Value = test::read_body_json(resp).await;
    assert_eq!(cuerpo["total"], 25);
    let data = cuerpo["data"].as_array().unwrap();
    assert_eq!(data.len(), 25);

    // 25 elementos en páginas de 10 -> 3 llamadas, ningún id repetido.
    assert_eq!(llamadas.load(Ordering::SeqCst), 3);
    let ids: HashSet<i64> = data.iter().map(|f| f["id"].as_i64().unwrap()).collect();
    assert_eq!(ids.len(), 25);
}

#[actix_web::test]
async fn array_directo_se_toma_como_conjunto_completo() {
    let llamadas = Arc::new(AtomicUsize::new(0));
    let contador = llamadas.clone();
    let origen = backend_simulado(move |cfg: &mut web::ServiceConfig| {
        let contador = contador.clone();
        cfg.route(
            "/learning-outcomes",
            web::get().to(move || {
                let contador = contador.clone();
                async move {
                    contador.fetch_add(1, Ordering::SeqCst);
                    HttpResponse::Ok()
                        .json(json!([{"id": 1}, {"id": 2}, {"id": 3}]))
                }
            }),
        );
    })
    .await;

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(BackendClient::new(origen)))
            .configure(configurar_rutas),
    )
    .await;

    let resp =
        test::call_service(&app, peticion_con_token("/api/learning-outcomes").to_request()).await;
    assert!(resp.status().is_success());

    let cuerpo: Value = test::read_body_json(resp).await;
    assert_eq!(cuerpo["total"], 3);
    assert_eq!(cuerpo["data"].as_array().unwrap().len(), 3);
    assert_eq!(llamadas.load(Ordering::SeqCst), 1);
}

#[actix_web::test]
async fn el_limite_de_paginas_corta_un_backend_que_nunca_termina() {
    // El backend miente: siempre un elemento más y un total inalcanzable.
    let llamadas = Arc::new(AtomicUsize::new(0));
    let contador = llamadas.clone();
    let origen = backend_simulado(move |cfg: &mut web::ServiceConfig| {
        let contador = contador.clone();
        cfg.route(
            "/eur-ace-criteria",
            web::get().to(move || {
                let contador = contador.clone();
                async move {
                    let n = contador.fetch_add(1, Ordering::SeqCst);
                    HttpResponse::Ok()
                        .json(json!({"data": [{"id": n}], "total": 100000}))
                }
            }),
        );
    })
    .await;

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(BackendClient::new(origen)))
            .configure(configurar_rutas),
    )
    .await;

    let resp =
        test::call_service(&app, peticion_con_token("/api/eur-ace-criteria").to_request()).await;
    assert!(resp.status().is_success());

    let cuerpo: Value = test::read_body_json(resp).await;
    assert_eq!(llamadas.load(Ordering::SeqCst), 100);
    assert_eq!(cuerpo["data"].as_array().unwrap().len(), 100);
}

#[actix_web::test]
async fn una_pagina_con_error_aborta_y_relaya_el_estado() {
    let origen = backend_simulado(|cfg: &mut web::ServiceConfig| {
        cfg.route(
            "/program-objectives",
            web::get().to(|| async {
                HttpResponse::Conflict().json(json!({"message": "Conflicto de datos"}))
            }),
        );
    })
    .await;

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(BackendClient::new(origen)))
            .configure(configurar_rutas),
    )
    .await;

    let resp = test::call_service(
        &app,
        peticion_con_token("/api/program-objectives").to_request(),
    )
    .await;
    assert_eq!(resp.status().as_u16(), 409);

    let cuerpo: Value = test::read_body_json(resp).await;
    assert_eq!(cuerpo["error"], "Conflicto de datos");
}

#[actix_web::test]
async fn los_filtros_se_reenvian_pero_page_es_del_bucle() {
    // El gateway descarta el `page` entrante: la iteración arranca en 1.
    let origen = backend_simulado(|cfg: &mut web::ServiceConfig| {
        cfg.route(
            "/carreras",
            web::get().to(|query: web::Query<HashMap<String, String>>| async move {
                assert_eq!(query.get("facultadId").map(String::as_str), Some("4"));
                assert_eq!(query.get("page").map(String::as_str), Some("1"));
                HttpResponse::Ok().json(json!({"data": [{"id": 1}], "total": 1}))
            }),
        );
    })
    .await;

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(BackendClient::new(origen)))
            .configure(configurar_rutas),
    )
    .await;

    let resp = test::call_service(
        &app,
        peticion_con_token("/api/carreras?facultadId=4&page=9&limit=50").to_request(),
    )
    .await;
    assert!(resp.status().is_success());

    let cuerpo: Value = test::read_body_json(resp).await;
    assert_eq!(cuerpo["total"], 1);
}
