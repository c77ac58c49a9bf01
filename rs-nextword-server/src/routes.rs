use actix_web::http::header::ContentType;
use actix_web::{HttpResponse, Responder, get, post, web};
use log::warn;
use serde::{Deserialize, Serialize};

use rs_nextword_core::model::request::{EMPTY_SEED_MESSAGE, GenerationRequest};
use rs_nextword_core::storage::image::decode_data_url;

use crate::state::AppState;

const INDEX_HTML: &str = include_str!("../static/index.html");

/// Form fields of `POST /generate`
#[derive(Deserialize)]
struct GenerateForm {
	start_seq: Option<String>,
	num_words: Option<String>,
}

/// JSON body of `POST /save_image`
#[derive(Deserialize)]
struct SaveImageRequest {
	image: Option<String>,
}

#[derive(Serialize, Debug, PartialEq)]
struct SaveImageResponse {
	success: bool,
	#[serde(skip_serializing_if = "Option::is_none")]
	filename: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	error: Option<String>,
}

impl SaveImageResponse {
	fn saved(filename: String) -> Self {
		Self { success: true, filename: Some(filename), error: None }
	}

	fn failed<E: ToString>(error: E) -> Self {
		Self { success: false, filename: None, error: Some(error.to_string()) }
	}
}

#[derive(Serialize)]
struct CounterResponse {
	counter: u64,
}

#[derive(Serialize)]
struct HealthResponse {
	model_loaded: bool,
	counter: u64,
}

fn plain_text(body: String) -> HttpResponse {
	HttpResponse::Ok().content_type(ContentType::plaintext()).body(body)
}

/// HTTP GET endpoint `/`
///
/// Serves the static demo page.
#[get("/")]
async fn index() -> impl Responder {
	HttpResponse::Ok().content_type(ContentType::html()).body(INDEX_HTML)
}

/// HTTP POST endpoint `/generate`
///
/// Extends `start_seq` by `num_words` words and returns plain text.
/// A body that is not a urlencoded form is treated as a missing seed.
/// Generation runs on the blocking pool.
#[post("/generate")]
async fn generate(data: web::Data<AppState>, form: Option<web::Form<GenerateForm>>) -> impl Responder {
	let request = form.and_then(|form| {
		let form = form.into_inner();
		GenerationRequest::from_form(form.start_seq.as_deref(), form.num_words.as_deref(), data.max_words)
	});
	let Some(request) = request else {
		return plain_text(EMPTY_SEED_MESSAGE.to_owned());
	};

	let state = data.clone();
	match web::block(move || state.engine.generate_text(&request.seed, request.num_words)).await {
		Ok(text) => plain_text(text),
		Err(e) => HttpResponse::InternalServerError().body(format!("Generation failed: {e}")),
	}
}

/// HTTP POST endpoint `/save_image`
///
/// Decodes a data-URL screenshot and stores it as `user_<N>.png`.
/// Every failure is reported in the JSON body with a 200 status.
#[post("/save_image")]
async fn save_image(data: web::Data<AppState>, body: web::Bytes) -> impl Responder {
	let image = match serde_json::from_slice::<SaveImageRequest>(&body) {
		Ok(SaveImageRequest { image: Some(image) }) => image,
		_ => return HttpResponse::Ok().json(SaveImageResponse::failed("Invalid image data")),
	};

	let bytes = match decode_data_url(&image) {
		Ok(bytes) => bytes,
		Err(e) => return HttpResponse::Ok().json(SaveImageResponse::failed(e)),
	};

	let state = data.clone();
	let response = match web::block(move || state.images.save(&bytes)).await {
		Ok(Ok(filename)) => SaveImageResponse::saved(filename),
		Ok(Err(e)) => {
			warn!("Screenshot could not be stored: {}", e);
			SaveImageResponse::failed(e)
		}
		Err(e) => SaveImageResponse::failed(e),
	};
	HttpResponse::Ok().json(response)
}

/// HTTP GET endpoint `/get_counter`
#[get("/get_counter")]
async fn get_counter(data: web::Data<AppState>) -> impl Responder {
	HttpResponse::Ok().json(CounterResponse { counter: data.images.counter() })
}

/// HTTP GET endpoint `/health`
///
/// Reports whether the model loaded and the current image counter.
#[get("/health")]
async fn health(data: web::Data<AppState>) -> impl Responder {
	HttpResponse::Ok().json(HealthResponse {
		model_loaded: data.engine.is_available(),
		counter: data.images.counter(),
	})
}

/// Registers every route of the service.
pub fn configure(cfg: &mut web::ServiceConfig) {
	cfg.service(index)
		.service(generate)
		.service(save_image)
		.service(get_counter)
		.service(health);
}
