use std::sync::Mutex;

use actix_cors::Cors;
use actix_web::{get, middleware, put, web, App, HttpResponse, HttpServer, Responder};
use clap::Parser;
use log::info;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use rs_bard_core::error::NoSuccessorError;
use rs_bard_core::io::list_files;
use rs_bard_core::model::generator::{generate_batch, generate_guaranteed};
use rs_bard_core::model::sample_params::SampleParams;
use rs_bard_core::model::text_model::TextModel;
use rs_bard_core::tag::HeuristicTagger;
use rs_bard_core::tokenizer::{PosTokenizer, Tokenizer, WordTokenizer};

/// Command-line options for the generation server.
#[derive(Parser)]
#[command(about = "HTTP front end for the pastiche sentence generator")]
struct Options {
	/// Directory containing the corpus .txt files
	#[arg(long, default_value = "./data")]
	data_dir: String,

	/// Address to bind
	#[arg(long, default_value = "127.0.0.1")]
	bind: String,

	/// Port to listen on
	#[arg(long, default_value_t = 5000)]
	port: u16,
}

/// Struct representing query parameters for the `/v1/generate` endpoint
#[derive(Deserialize)]
struct GenerateParams {
	variant: Option<String>, // "word" (default) or "pos"
	count: Option<usize>,
	max_tries: Option<usize>,
	max_chars: Option<usize>,
}

#[derive(Deserialize)]
struct LoadParams {
	names: Option<String>,
	order: Option<usize>,
}

struct SharedData {
	data_dir: String,
	word_model: Option<TextModel<WordTokenizer>>,
	pos_model: Option<TextModel<PosTokenizer<HeuristicTagger>>>,
}

/// Runs one batch against a model, honoring the query parameters.
///
/// With `max_chars` set, each slot first tries a strict short draw and only
/// then falls back to the guaranteed cascade; otherwise the cascade runs
/// directly.
fn run_batch<T: Tokenizer>(
	model: &TextModel<T>,
	query: &GenerateParams,
) -> Result<Vec<Option<String>>, NoSuccessorError> {
	let count = query.count.unwrap_or(1);
	let max_tries = query.max_tries.unwrap_or(100);
	let mut rng = rand::rng();

	match query.max_chars {
		None => generate_batch(model, count, max_tries, &mut rng),
		Some(budget) => {
			let params = SampleParams {
				max_attempts: max_tries,
				require_novel: true,
				max_chars: Some(budget),
			};
			let mut batch = Vec::with_capacity(count);
			for _ in 0..count {
				let sentence = match model.sample(&params, &mut rng)? {
					Some(s) => Some(s),
					None => generate_guaranteed(model, max_tries, &mut rng)?,
				};
				batch.push(sentence);
			}
			Ok(batch)
		}
	}
}

/// Renders a batch as a plain-text response, one sentence per line.
fn batch_response(batch: Result<Vec<Option<String>>, NoSuccessorError>) -> HttpResponse {
	match batch {
		Ok(sentences) => {
			let body = sentences
				.into_iter()
				.map(|slot| slot.unwrap_or_else(|| "(no sentence)".to_owned()))
				.collect::<Vec<_>>()
				.join("\n");
			HttpResponse::Ok().body(body)
		}
		Err(e) => HttpResponse::InternalServerError().body(e.to_string()),
	}
}

/// Loads and combines one tokenizer variant over the named corpora.
fn load_variant<T>(
	data_dir: &str,
	names: &[&str],
	order: usize,
	make_tokenizer: impl Fn() -> T,
) -> Result<TextModel<T>, Box<dyn std::error::Error>>
where
	T: Tokenizer + Serialize + DeserializeOwned,
{
	let mut combined: Option<TextModel<T>> = None;
	for name in names {
		let corpus_path = format!("{}/{}.txt", data_dir, name);
		let model = TextModel::from_corpus_file(&corpus_path, order, make_tokenizer())?;
		combined = Some(match combined.take() {
			Some(existing) => existing.combine(model)?,
			None => model,
		});
	}
	combined.ok_or_else(|| Box::from("No corpus names given".to_owned()))
}

/// HTTP GET endpoint `/v1/generate`
///
/// Generates one or more sentences from the loaded model selected by
/// `variant`. Returns plain text, one sentence per line; a slot the
/// cascade could not fill reads "(no sentence)".
#[get("/v1/generate")]
async fn get_generated(
	data: web::Data<Mutex<SharedData>>,
	query: web::Query<GenerateParams>,
) -> impl Responder {
	let shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};

	match query.variant.as_deref().unwrap_or("word") {
		"word" => match &shared_data.word_model {
			Some(model) => batch_response(run_batch(model, &query)),
			None => HttpResponse::BadRequest().body("No model loaded, PUT /v1/load_models first"),
		},
		"pos" => match &shared_data.pos_model {
			Some(model) => batch_response(run_batch(model, &query)),
			None => HttpResponse::BadRequest().body("No model loaded, PUT /v1/load_models first"),
		},
		_ => HttpResponse::BadRequest().body("Variant must be 'word' or 'pos'"),
	}
}

#[get("/v1/models")]
async fn get_models(data: web::Data<Mutex<SharedData>>) -> impl Responder {
	let shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};
	match list_files(&shared_data.data_dir, "txt") {
		Ok(files) => HttpResponse::Ok().body(files.join("\n").replace(".txt", "")),
		Err(_) => HttpResponse::InternalServerError().body("Failed to list corpora"),
	}
}

#[get("/v1/loaded_models")]
async fn get_loaded_models(data: web::Data<Mutex<SharedData>>) -> impl Responder {
	let shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};

	let describe = |names: Option<&[String]>| match names {
		Some(names) if !names.is_empty() => names.join(", "),
		_ => "(none)".to_owned(),
	};
	let body = format!(
		"word: {}\npos: {}",
		describe(shared_data.word_model.as_ref().map(|m| m.corpus_names())),
		describe(shared_data.pos_model.as_ref().map(|m| m.corpus_names())),
	);
	HttpResponse::Ok().body(body)
}

/// HTTP PUT endpoint `/v1/load_models`
///
/// Trains or reloads both tokenizer variants over the comma-separated
/// corpus names, replacing whatever was loaded before.
#[put("/v1/load_models")]
async fn put_models(
	data: web::Data<Mutex<SharedData>>,
	query: web::Query<LoadParams>,
) -> impl Responder {
	let mut shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};

	let query_names = match &query.names {
		Some(s) if !s.trim().is_empty() => s.trim(),
		_ => return HttpResponse::BadRequest().body("Missing or empty corpus name"),
	};
	let order = query.order.unwrap_or(3);

	let corpus_names: Vec<&str> = query_names
		.split(',')
		.map(|s| s.trim())
		.filter(|s| !s.is_empty())
		.collect();

	let word_model = match load_variant(&shared_data.data_dir, &corpus_names, order, || WordTokenizer) {
		Ok(m) => m,
		Err(e) => return HttpResponse::InternalServerError().body(format!("Failed to load corpus: {e}")),
	};
	let pos_model = match load_variant(&shared_data.data_dir, &corpus_names, order, || {
		PosTokenizer::new(HeuristicTagger::new())
	}) {
		Ok(m) => m,
		Err(e) => return HttpResponse::InternalServerError().body(format!("Failed to load corpus: {e}")),
	};

	shared_data.word_model = Some(word_model);
	shared_data.pos_model = Some(pos_model);

	HttpResponse::Ok().body("Models loaded successfully")
}

/// Main entry point for the server.
///
/// Starts with no model loaded; corpora are trained or reloaded through
/// `PUT /v1/load_models` and shared behind a `Mutex`.
///
/// # Notes
/// - Responses are plain text on every endpoint.
/// - CORS is fully permissive, the server is meant to sit behind a
///   local front end.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
	env_logger::init();
	let options = Options::parse();

	let shared_data = SharedData {
		data_dir: options.data_dir.clone(),
		word_model: None,
		pos_model: None,
	};
	let shared_model = web::Data::new(Mutex::new(shared_data));

	info!("Serving corpora from {} on {}:{}", options.data_dir, options.bind, options.port);

	HttpServer::new(move || {
		App::new()
			.app_data(shared_model.clone())
			.wrap(Cors::permissive())
			.wrap(middleware::Logger::default())
			.service(get_generated)
			.service(get_models)
			.service(put_models)
			.service(get_loaded_models)
	})
		.bind((options.bind.as_str(), options.port))?
		.run()
		.await
}
