use actix_cors::Cors;
use actix_web::middleware::{Condition, Logger};
use actix_web::{App, HttpServer, web};
use log::info;

use rs_nextword_core::model::engine::TextEngine;
use rs_nextword_core::storage::image::ImageStore;

mod config;
mod routes;
mod state;

use config::ServerConfig;
use state::AppState;

/// Main entry point for the server.
///
/// Loads the model once, opens the screenshot store and starts an
/// Actix-web HTTP server sharing both through `web::Data`.
///
/// # Notes
/// - A missing model only disables generation; the server still starts.
/// - Storage problems are logged here and reported by `/save_image`.
/// - Only a failure to bind the listening address stops the process.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
	env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

	let config = ServerConfig::from_env();
	info!("Configuration: {:?}", config);

	let engine = TextEngine::load(&config.model_dir);
	let images = ImageStore::open(&config.save_dir, &config.counter_file);
	info!("Saving screenshots to {} (last id {})", images.dir().display(), images.counter());

	let shared_state = web::Data::new(AppState {
		engine,
		images,
		max_words: config.max_words,
	});
	let payload_limit = config.max_payload_bytes;
	let cors = config.cors;

	info!("Starting server on {}:{}", config.host, config.port);
	HttpServer::new(move || {
		App::new()
			.wrap(Condition::new(cors, Cors::permissive()))
			.wrap(Logger::default())
			.app_data(shared_state.clone())
			.app_data(web::PayloadConfig::new(payload_limit))
			.app_data(web::FormConfig::default().limit(payload_limit))
			.configure(routes::configure)
	})
		.bind((config.host.as_str(), config.port))?
		.run()
		.await
}
