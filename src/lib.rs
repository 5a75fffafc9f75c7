// Biblioteca raíz del crate `poliacredita-api`.
// Reexporta los módulos principales y proporciona una función de conveniencia
// `run_server` que levanta el gateway HTTP.
pub mod api;
pub mod backend;
pub mod config;
pub mod server;

/// Ejecuta el servidor HTTP (reexport para facilitar uso desde `main`)
pub use server::run_server;
