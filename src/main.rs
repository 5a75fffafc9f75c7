// --- Poliacredita - Gateway de acreditación académica (API) ---

use poliacredita_api::{config, run_server};

#[tokio::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init();

    let bind = config::bind_addr();
    let backend = config::backend_url();
    println!("=== Poliacredita API (gateway) ===");
    println!("Iniciando servidor en http://{} -> backend {}", bind, backend);
    run_server(&bind, backend).await
}
