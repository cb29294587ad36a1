//! Career Guidance Backend - Main Entry Point
//!
//! Starts the web server for the career quiz and mentor.

use career_guide::{api::run_server, ServerConfig};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env before the logger so RUST_LOG can live there too
    dotenv::dotenv().ok();

    // Initialize logging
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = ServerConfig::from_env();

    println!("╔════════════════════════════════════════════════╗");
    println!("║   Career Guide - Quiz & Mentor                 ║");
    println!("║   Answer → Predict → Explore                   ║");
    println!("╚════════════════════════════════════════════════╝");
    println!();

    run_server(config).await
}
