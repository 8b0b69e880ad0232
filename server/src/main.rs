use actix_web::{middleware::Logger, web, App, HttpServer};
use log::{info, warn};

mod config;
mod error;
mod gemini;
mod routes;

use config::Config;
use gemini::GeminiClient;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_env();
    if config.gemini.api_key.is_none() {
        warn!("GOOGLE_GEMINI_API_KEY not set - subtask requests will fail");
    }

    let gemini = GeminiClient::new(config.gemini.clone())
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
    info!("Listening on {} (model {})", config.bind, gemini.model());
    let gemini = web::Data::new(gemini);

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(gemini.clone())
            .configure(routes::configure)
    })
    .bind(&config.bind)?
    .run()
    .await
}
