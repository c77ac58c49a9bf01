use rs_nextword_core::model::engine::TextEngine;
use rs_nextword_core::storage::image::ImageStore;

/// Read-only data shared by every worker.
///
/// Built once at startup and handed to actix inside `web::Data`.
/// The image counter carries its own lock.
pub struct AppState {
	pub engine: TextEngine,
	pub images: ImageStore,
	pub max_words: usize,
}
