use actix_cors::Cors;
use actix_web::error::{InternalError, JsonPayloadError};
use actix_web::middleware::Compress;
use actix_web::{web, App, HttpRequest, HttpResponse, HttpServer};
use actix_web_prometheus::PrometheusMetricsBuilder;
use serde::{Deserialize, Serialize};
use utoipa::{OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;

pub mod peticao;

pub use crate::peticao::handlers::AppState;

#[derive(Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub timestamp: String,
}

impl ErrorResponse {
    pub fn new(error_type: &str, message: &str) -> Self {
        Self {
            error: error_type.to_string(),
            message: message.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn bad_request(message: &str) -> Self {
        Self::new("BadRequest", message)
    }

    pub fn internal_error(message: &str) -> Self {
        Self::new("InternalServerError", message)
    }
}

/// Turn a malformed JSON request body into the service's JSON error shape
/// instead of actix's plain-text 400.
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let response = HttpResponse::BadRequest().json(ErrorResponse::bad_request(&err.to_string()));
    InternalError::from_response(err, response).into()
}

pub async fn run() -> std::io::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    #[derive(OpenApi)]
    #[openapi(
        paths(
            crate::peticao::handlers::generate_docx,
            crate::peticao::handlers::generate_pdf,
            crate::peticao::handlers::generate_both,
            crate::peticao::handlers::health,
        ),
        components(
            schemas(
                peticao::model::PeticaoRequest,
                peticao::model::Contract,
                peticao::model::Claimant,
                peticao::model::Respondent,
                peticao::model::Situacao,
                peticao::model::Copia,
                peticao::handlers::BothResponse,
                ErrorResponse,
            )
        ),
        tags(
            (name = "Petition Service", description = "Petition drafting endpoints.")
        )
    )]
    struct ApiDoc;

    dotenvy::dotenv().ok();

    let generator = match crate::peticao::PeticaoGenerator::from_env() {
        Ok(generator) => generator,
        Err(e) => {
            log::error!(
                "Failed to load the petition template. Check TEMPLATE_PATH in .env. Error: {e}"
            );
            std::process::exit(1);
        }
    };
    let app_state = web::Data::new(AppState { generator });

    let prometheus = PrometheusMetricsBuilder::new("peticao_server")
        .endpoint("/metrics")
        .build()
        .expect("Failed to create Prometheus metrics middleware");

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8013);

    log::info!("Starting server at http://0.0.0.0:{port}");

    HttpServer::new(move || {
        let app_state = app_state.clone();
        let prometheus = prometheus.clone();
        // The drafting UI is served elsewhere; the original service accepted
        // any origin.
        let cors = Cors::permissive();

        App::new()
            .wrap(Compress::default())
            .wrap(prometheus)
            .wrap(cors)
            .app_data(app_state)
            .app_data(web::JsonConfig::default().error_handler(json_error_handler))
            .service(
                web::scope("/api")
                    .service(
                        web::resource("/generate/docx")
                            .route(web::post().to(peticao::handlers::generate_docx)),
                    )
                    .service(
                        web::resource("/generate/pdf")
                            .route(web::post().to(peticao::handlers::generate_pdf)),
                    )
                    .service(
                        web::resource("/generate/both")
                            .route(web::post().to(peticao::handlers::generate_both)),
                    )
                    .service(
                        web::resource("/health").route(web::get().to(peticao::handlers::health)),
                    ),
            )
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await
}
