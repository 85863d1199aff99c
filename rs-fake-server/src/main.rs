use std::fs::File;
use std::sync::{Arc, Mutex};

use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::{get, web, App, HttpResponse, HttpServer, Responder};
use clap::Parser;
use log::{info, warn};
use serde::Deserialize;

use rs_fake_core::dictionary::Dictionary;
use rs_fake_core::error::Error;
use rs_fake_core::generator::Generator;

mod config;

use config::CliArgs;

/// Query parameters for the `/v1/sentence` endpoint
#[derive(Deserialize)]
struct SentenceParams {
	count: Option<usize>,
}

/// Query parameters for the `/v1/paragraph` endpoint
#[derive(Deserialize)]
struct ParagraphParams {
	min: Option<usize>,
	max: Option<usize>,
}

struct SharedData {
	name: String,
	lines: usize,
	max_words: usize,
	generator: Generator<File>,
}

impl SharedData {
	/// Opens the configured dictionary and applies the generator modes.
	fn load(args: &CliArgs) -> rs_fake_core::Result<Self> {
		let dictionary = match args.lines {
			Some(lines) => Dictionary::with_lines(&args.dictionary, lines)?,
			None => Dictionary::open(&args.dictionary)?,
		};
		let name = dictionary.name().to_owned();
		let lines = dictionary.lines();

		let mut generator = dictionary.into_generator()?;
		generator.restart_each_call = args.restart_each_call;
		generator.bypass_error = args.bypass_error;

		Ok(Self { name, lines, max_words: args.max_words, generator })
	}
}

/// Maps argument errors to `400` and everything else to `500`.
fn error_response(e: Error) -> HttpResponse {
	if e.is_invalid_input() {
		HttpResponse::BadRequest().body(e.to_string())
	} else {
		HttpResponse::InternalServerError().body(e.to_string())
	}
}

/// Runs `f` on the shared generator and turns the result into a response.
///
/// Requests for more than `max_words` words are rejected before `f` runs.
fn with_generator<F>(data: &web::Data<Mutex<SharedData>>, words: usize, f: F) -> HttpResponse
where
	F: FnOnce(&mut Generator<File>) -> rs_fake_core::Result<String>,
{
	let mut shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Generator lock failed"),
	};

	if words > shared_data.max_words {
		return HttpResponse::BadRequest()
			.body(format!("At most {} words per request, got {}", shared_data.max_words, words));
	}

	match f(&mut shared_data.generator) {
		Ok(result) => HttpResponse::Ok().body(result),
		Err(e) => error_response(e),
	}
}

/// HTTP GET endpoint `/v1/word`
#[get("/v1/word")]
async fn get_word(data: web::Data<Mutex<SharedData>>) -> impl Responder {
	with_generator(&data, 1, |generator| generator.generate())
}

/// HTTP GET endpoint `/v1/sentence`
///
/// `count` defaults to 8 words.
#[get("/v1/sentence")]
async fn get_sentence(data: web::Data<Mutex<SharedData>>, query: web::Query<SentenceParams>) -> impl Responder {
	let count = query.count.unwrap_or(8);
	with_generator(&data, count, |generator| generator.sentence(count))
}

/// HTTP GET endpoint `/v1/paragraph`
///
/// `min` and `max` default to 4 and 16 words.
#[get("/v1/paragraph")]
async fn get_paragraph(data: web::Data<Mutex<SharedData>>, query: web::Query<ParagraphParams>) -> impl Responder {
	let min = query.min.unwrap_or(4);
	let max = query.max.unwrap_or(16);
	with_generator(&data, max, |generator| generator.paragraph(min, max))
}

/// HTTP GET endpoint `/v1/dictionary`, returns the name and the line count
#[get("/v1/dictionary")]
async fn get_dictionary(data: web::Data<Mutex<SharedData>>) -> impl Responder {
	let shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Generator lock failed"),
	};
	HttpResponse::Ok().body(format!("{}\n{}", shared_data.name, shared_data.lines))
}

/// Main entry point for the server.
///
/// Opens the dictionary, wraps the generator in a `Mutex`, and starts an
/// Actix-web HTTP server. The dictionary is closed once the server stops.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
	env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

	let args = CliArgs::parse();
	let shared_data = SharedData::load(&args).map_err(std::io::Error::other)?;
	info!(
		"serving dictionary '{}' ({} lines) on {}:{}",
		shared_data.name, shared_data.lines, args.host, args.port
	);

	let shared_generator = web::Data::new(Mutex::new(shared_data));
	let app_data = shared_generator.clone();

	let result = HttpServer::new(move || {
		App::new()
			.wrap(Logger::default())
			.wrap(Cors::default().allow_any_origin().allowed_methods(vec!["GET"]))
			.app_data(app_data.clone())
			.service(get_word)
			.service(get_sentence)
			.service(get_paragraph)
			.service(get_dictionary)
	})
		.workers(args.workers())
		.bind((args.host.as_str(), args.port))?
		.run()
		.await;

	if let Ok(shared_data) = Arc::try_unwrap(shared_generator.into_inner()) {
		if let Ok(shared_data) = shared_data.into_inner() {
			if let Err(e) = shared_data.generator.close() {
				warn!("{}", e);
			}
		}
	}

	result
}
