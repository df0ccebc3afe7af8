use actix_web::{web, HttpResponse, Responder};
use validator::Validate;
use crate::core::{CostSymmetry, CostTable, MatchResult, Matcher, MatrixRows, SinkhornParams};
use crate::error::Result as MatchingResult;
use crate::models::{ErrorResponse, HealthResponse, RunMatchingRequest, RunMatchingResponse};

/// Application state shared across all handlers
#[derive(Debug, Clone)]
pub struct AppState {
    pub defaults: SinkhornParams,
    pub symmetry: CostSymmetry,
    pub max_items: usize,
}

/// Configure all matching routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/matching/run", web::post().to(run_matching));
}

/// Health check endpoint
async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Run matching endpoint
///
/// POST /api/v1/matching/run
///
/// Request body:
/// ```json
/// {
///   "items": [{ "id": "a", "excludedIds": ["b"] }, { "id": "b" }],
///   "costs": [[null, 1.0], [1.0, null]],
///   "lambda": 1.0,
///   "maxIterations": 1000,
///   "tolerance": 1e-6,
///   "symmetry": "directed",
///   "includeMatrix": false
/// }
/// ```
async fn run_matching(
    state: web::Data<AppState>,
    req: web::Json<RunMatchingRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for run_matching request: field_errors={:?}", errors);
        return HttpResponse::BadRequest().json(ErrorResponse::bad_request(
            "Validation failed",
            errors.to_string(),
        ));
    }

    let req = req.into_inner();
    let n = req.items.len();
    if n > state.max_items {
        return HttpResponse::BadRequest().json(ErrorResponse::bad_request(
            "too_many_items",
            format!("At most {} items may be matched per request, got {}", state.max_items, n),
        ));
    }

    let params = req.params(&state.defaults);
    let symmetry = req.symmetry.unwrap_or(state.symmetry);

    // The solver is CPU-bound; keep it off the async workers
    let include_matrix = req.include_matrix;
    let result = web::block(move || -> MatchingResult<MatchResult> {
        let matcher = Matcher::new(params, symmetry)?;
        let table = CostTable::new(&req.items, req.costs)?;
        matcher.match_items(&req.items, &table)
    })
    .await;

    let result = match result {
        Ok(Ok(result)) => result,
        Ok(Err(e)) => {
            tracing::info!("Rejected matching request over {} items: {}", n, e);
            return HttpResponse::BadRequest().json(ErrorResponse::from(&e));
        }
        Err(e) => {
            tracing::error!("Matching task failed: {}", e);
            return HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Matching task failed".to_string(),
                message: e.to_string(),
                status_code: 500,
            });
        }
    };

    let response = RunMatchingResponse {
        run_id: uuid::Uuid::new_v4().to_string(),
        matches: result.matches,
        report: result.outcome.report,
        summary: result.summary,
        matrix: include_matrix.then_some(MatrixRows(result.outcome.matrix)),
        generated_at: chrono::Utc::now(),
    };

    tracing::info!(
        "Run {}: {} pairs from {} items (converged: {}, iterations: {})",
        response.run_id,
        response.matches.len(),
        n,
        response.report.converged,
        response.report.iterations_used
    );

    HttpResponse::Ok().json(response)
}
