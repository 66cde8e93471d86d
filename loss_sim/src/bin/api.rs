use actix_web::{
    body::BoxBody,
    error, get,
    http::{header::ContentType, StatusCode},
    post, web, App, HttpResponse, HttpServer,
};
use clap::Parser;
use loss_sim::config::DEFAULT_RUN_COUNT;
use loss_sim::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::Mutex;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Serves blackjack simulation batches over HTTP.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(long, default_value = "127.0.0.1")]
    address: String,

    #[arg(short, long, default_value_t = 8080)]
    port: u16,
}

fn default_runs() -> usize {
    DEFAULT_RUN_COUNT
}

/// The body of a simulation request: the properties of the batch plus how many runs to play.
#[derive(Debug, Deserialize)]
struct SimulationRequest {
    #[serde(flatten)]
    properties: SimulationProperties,
    #[serde(default = "default_runs")]
    runs: usize,
}

/// The statistics of a finished batch, as returned to the caller.
#[derive(Debug, Serialize)]
struct SimulationResponse {
    runs: usize,
    statistics: Vec<StrategyStatistics>,
}

/// Keeps the statistics of the most recent batch so they can be fetched again.
type LastBatch = web::Data<Mutex<Option<SimulationResponse>>>;

/// An enum that will handle user facing errors
#[derive(Debug)]
enum UserError {
    InternalError,
    BadInput(String),
    NoSimulationRun,
}

impl std::fmt::Display for UserError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserError::InternalError => write!(f, "an internal error occured"),
            UserError::BadInput(s) => write!(f, "{}", s),
            UserError::NoSimulationRun => write!(f, "no simulation has been run yet"),
        }
    }
}

impl std::error::Error for UserError {}

impl error::ResponseError for UserError {
    fn error_response(&self) -> HttpResponse<BoxBody> {
        HttpResponse::build(self.status_code())
            .content_type(ContentType::plaintext())
            .body(self.to_string())
    }

    fn status_code(&self) -> StatusCode {
        match *self {
            UserError::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
            UserError::BadInput(_) => StatusCode::BAD_REQUEST,
            UserError::NoSimulationRun => StatusCode::NOT_FOUND,
        }
    }
}

impl From<SimulationError> for UserError {
    fn from(value: SimulationError) -> Self {
        match value {
            SimulationError::Config(e) => UserError::BadInput(e.to_string()),
            SimulationError::Run { .. } | SimulationError::Sink(_) => {
                error!(error = %value, "simulation failed");
                UserError::InternalError
            }
        }
    }
}

/// A handler that validates the requested properties, runs the batch on a blocking thread and returns the
/// statistics as JSON.
#[post("/simulations")]
async fn run_simulation(
    request: web::Json<SimulationRequest>,
    last_batch: LastBatch,
) -> Result<HttpResponse, UserError> {
    let SimulationRequest { properties, runs } = request.into_inner();
    properties
        .validate()
        .map_err(|e| UserError::BadInput(e.to_string()))?;

    let statistics = web::block(move || {
        let mut runner = SimulationRunner::new(MemoryStatisticsSink::new(), TracingReporter);
        runner.run(&properties, runs)
    })
    .await
    .map_err(|_| UserError::InternalError)??;

    let response = SimulationResponse { runs, statistics };
    let body = serde_json::to_string(&response).map_err(|_| UserError::InternalError)?;
    match last_batch.lock() {
        Ok(mut guard) => *guard = Some(response),
        Err(_) => return Err(UserError::InternalError),
    }
    Ok(HttpResponse::Ok()
        .content_type(ContentType::json())
        .body(body))
}

/// A handler that returns the statistics of the most recent batch.
#[get("/simulations/latest")]
async fn latest_simulation(last_batch: LastBatch) -> Result<HttpResponse, UserError> {
    let guard = last_batch.lock().map_err(|_| UserError::InternalError)?;
    match guard.as_ref() {
        Some(response) => Ok(HttpResponse::Ok().json(response)),
        None => Err(UserError::NoSimulationRun),
    }
}

/// A handler listing the strategy labels a request may use.
#[get("/strategies")]
async fn list_strategies() -> HttpResponse {
    HttpResponse::Ok().json(registered_strategies())
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    let args = Args::parse();
    info!(address = %args.address, port = args.port, "listening");

    let last_batch: LastBatch = web::Data::new(Mutex::new(None));

    HttpServer::new(move || {
        App::new()
            .app_data(last_batch.clone())
            .service(run_simulation)
            .service(latest_simulation)
            .service(list_strategies)
    })
    .bind((args.address.as_str(), args.port))?
    .run()
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{body::to_bytes, test};

    #[actix_web::test]
    async fn strategies_are_listed() {
        let app = test::init_service(App::new().service(list_strategies)).await;
        let request = test::TestRequest::get().uri("/strategies").to_request();
        let labels: Vec<String> = test::call_and_read_body_json(&app, request).await;
        assert_eq!(labels, vec!["BasicMinimum", "Martingale"]);
    }

    #[actix_web::test]
    async fn bad_properties_are_rejected() {
        let last_batch: LastBatch = web::Data::new(Mutex::new(None));
        let app = test::init_service(App::new().app_data(last_batch).service(run_simulation)).await;
        let request = test::TestRequest::post()
            .uri("/simulations")
            .set_json(serde_json::json!({
                "minimum_bet": 50,
                "maximum_bet": 10,
                "max_seats": 1,
                "deck_count": 4,
                "players": [{"strategy": "BasicMinimum", "starting_cash": 200}],
                "runs": 5
            }))
            .to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = to_bytes(response.into_body()).await.unwrap();
        assert!(String::from_utf8_lossy(&body).contains("maximum bet"));
    }

    #[actix_web::test]
    async fn starting_cash_below_minimum_is_bad_input() {
        let last_batch: LastBatch = web::Data::new(Mutex::new(None));
        let app = test::init_service(App::new().app_data(last_batch).service(run_simulation)).await;
        let request = test::TestRequest::post()
            .uri("/simulations")
            .set_json(serde_json::json!({
                "minimum_bet": 10,
                "maximum_bet": 100,
                "max_seats": 1,
                "deck_count": 4,
                "players": [{"strategy": "BasicMinimum", "starting_cash": 5}],
                "runs": 2
            }))
            .to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = to_bytes(response.into_body()).await.unwrap();
        assert!(String::from_utf8_lossy(&body).contains("cannot cover the minimum bet"));
    }

    #[actix_web::test]
    async fn batch_runs_and_is_kept() {
        let last_batch: LastBatch = web::Data::new(Mutex::new(None));
        let app = test::init_service(
            App::new()
                .app_data(last_batch)
                .service(run_simulation)
                .service(latest_simulation),
        )
        .await;
        let request = test::TestRequest::get().uri("/simulations/latest").to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let request = test::TestRequest::post()
            .uri("/simulations")
            .set_json(serde_json::json!({
                "minimum_bet": 10,
                "maximum_bet": 100,
                "max_seats": 1,
                "deck_count": 4,
                "players": [{"strategy": "BasicMinimum", "starting_cash": 200}],
                "seed": 3,
                "runs": 4
            }))
            .to_request();
        let response: serde_json::Value = test::call_and_read_body_json(&app, request).await;
        assert_eq!(response["runs"], 4);
        assert_eq!(response["statistics"][0]["strategy"], "BasicMinimum");

        let request = test::TestRequest::get().uri("/simulations/latest").to_request();
        let latest: serde_json::Value = test::call_and_read_body_json(&app, request).await;
        assert_eq!(latest, response);
    }
}
