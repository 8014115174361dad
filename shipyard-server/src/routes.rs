//! HTTP handlers for Shipyard server.

use std::collections::HashMap;
use std::sync::Arc;

use actix_web::error::BlockingError;
use actix_web::{HttpResponse, Responder, delete, get, post, web};
use serde::{Deserialize, Serialize};
use shipyard_core::{
    InMemoryShipStore, Ship, ShipDraft, ShipPatch, ShipService, ShipStore, ShipyardError,
    parse_ship_id,
};
use utoipa::{OpenApi, ToSchema};

use crate::openapi::ApiDoc;

/// Ship store shared across worker threads.
pub type SharedShipStore = Arc<dyn ShipStore + Send + Sync>;

#[derive(Clone)]
/// Shared application state for handlers.
pub struct AppState {
    /// Ship catalog operations.
    pub ships: Arc<ShipService<SharedShipStore>>,
}

impl AppState {
    /// Build state around any ship store.
    pub fn new(store: SharedShipStore) -> Self {
        Self {
            ships: Arc::new(ShipService::new(store)),
        }
    }

    /// Build state backed by a fresh in-memory store.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryShipStore::new()))
    }
}

/// Error response payload.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message.
    pub message: String,
}

fn error_response(err: &ShipyardError) -> HttpResponse {
    let body = ErrorResponse {
        message: err.to_string(),
    };
    match err {
        ShipyardError::InvalidArgument(_) | ShipyardError::MissingField(_) => {
            HttpResponse::BadRequest().json(body)
        }
        ShipyardError::NotFound(_) => HttpResponse::NotFound().json(body),
        ShipyardError::Storage(_) => {
            log::warn!("ship request failed: {err}");
            HttpResponse::InternalServerError().json(body)
        }
    }
}

fn respond<T>(
    result: Result<shipyard_core::Result<T>, BlockingError>,
    ok: impl FnOnce(T) -> HttpResponse,
) -> HttpResponse {
    match result {
        Ok(Ok(value)) => ok(value),
        Ok(Err(err)) => error_response(&err),
        Err(err) => HttpResponse::InternalServerError().json(ErrorResponse {
            message: format!("ship task failed: {err}"),
        }),
    }
}

/// Register ship routes; `count` must precede `{id}` so it is not read as an id.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(count_ships)
        .service(list_ships)
        .service(create_ship)
        .service(get_ship)
        .service(update_ship)
        .service(delete_ship)
        .service(openapi_json);
}

#[utoipa::path(
    get,
    path = "/rest/ships",
    params(
        ("name" = Option<String>, Query, description = "Name substring"),
        ("planet" = Option<String>, Query, description = "Planet substring"),
        ("shipType" = Option<String>, Query, description = "TRANSPORT, MILITARY, or MERCHANT"),
        ("after" = Option<i64>, Query, description = "Earliest production date (epoch ms, inclusive)"),
        ("before" = Option<i64>, Query, description = "Production date bound (epoch ms, exclusive)"),
        ("isUsed" = Option<bool>, Query, description = "Used flag"),
        ("minSpeed" = Option<f64>, Query, description = "Minimum speed"),
        ("maxSpeed" = Option<f64>, Query, description = "Maximum speed"),
        ("minCrewSize" = Option<i32>, Query, description = "Minimum crew size"),
        ("maxCrewSize" = Option<i32>, Query, description = "Maximum crew size"),
        ("minRating" = Option<f64>, Query, description = "Minimum rating"),
        ("maxRating" = Option<f64>, Query, description = "Maximum rating"),
        ("order" = Option<String>, Query, description = "ID, NAME, PLANET, DATE, SPEED, CREW_SIZE, or RATING"),
        ("pageNumber" = Option<u32>, Query, description = "Zero-based page index (default 0)"),
        ("pageSize" = Option<u32>, Query, description = "Ships per page (default 3)")
    ),
    responses(
        (status = 200, description = "Ships on the requested page", body = [Ship]),
        (status = 400, description = "Unparseable filter", body = ErrorResponse)
    ),
    tag = "ships"
)]
#[get("/rest/ships")]
/// List one page of ships matching the filters.
pub async fn list_ships(
    state: web::Data<AppState>,
    query: web::Query<HashMap<String, String>>,
) -> impl Responder {
    let params = query.into_inner();
    let ships = state.ships.clone();
    let result = web::block(move || ships.list(&params)).await;
    respond(result, |ships| HttpResponse::Ok().json(ships))
}

#[utoipa::path(
    get,
    path = "/rest/ships/count",
    responses(
        (status = 200, description = "Number of matching ships", body = i64),
        (status = 400, description = "Unparseable filter", body = ErrorResponse)
    ),
    tag = "ships"
)]
#[get("/rest/ships/count")]
/// Count ships matching the filters; paging and ordering are ignored.
pub async fn count_ships(
    state: web::Data<AppState>,
    query: web::Query<HashMap<String, String>>,
) -> impl Responder {
    let params = query.into_inner();
    let ships = state.ships.clone();
    let result = web::block(move || ships.count(&params)).await;
    respond(result, |count| HttpResponse::Ok().json(count))
}

#[utoipa::path(
    post,
    path = "/rest/ships",
    request_body = ShipDraft,
    responses(
        (status = 200, description = "Created ship", body = Ship),
        (status = 400, description = "Invalid ship", body = ErrorResponse)
    ),
    tag = "ships"
)]
#[post("/rest/ships")]
/// Create a ship.
pub async fn create_ship(
    state: web::Data<AppState>,
    payload: web::Json<ShipDraft>,
) -> impl Responder {
    let draft = payload.into_inner();
    let ships = state.ships.clone();
    let result = web::block(move || ships.create(draft)).await;
    respond(result, |ship| HttpResponse::Ok().json(ship))
}

#[utoipa::path(
    get,
    path = "/rest/ships/{id}",
    params(
        ("id" = i64, Path, description = "Ship identifier")
    ),
    responses(
        (status = 200, description = "Stored ship", body = Ship),
        (status = 400, description = "Invalid id", body = ErrorResponse),
        (status = 404, description = "No such ship", body = ErrorResponse)
    ),
    tag = "ships"
)]
#[get("/rest/ships/{id}")]
/// Fetch a ship by id.
pub async fn get_ship(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let id = match parse_ship_id(&path.into_inner()) {
        Ok(id) => id,
        Err(err) => return error_response(&err),
    };
    let ships = state.ships.clone();
    let result = web::block(move || ships.get(id)).await;
    respond(result, |ship| HttpResponse::Ok().json(ship))
}

#[utoipa::path(
    post,
    path = "/rest/ships/{id}",
    params(
        ("id" = i64, Path, description = "Ship identifier")
    ),
    request_body = ShipPatch,
    responses(
        (status = 200, description = "Updated ship", body = Ship),
        (status = 400, description = "Invalid id or ship", body = ErrorResponse),
        (status = 404, description = "No such ship", body = ErrorResponse)
    ),
    tag = "ships"
)]
#[post("/rest/ships/{id}")]
/// Update the provided fields of a ship.
pub async fn update_ship(
    state: web::Data<AppState>,
    path: web::Path<String>,
    payload: web::Json<ShipPatch>,
) -> impl Responder {
    let id = match parse_ship_id(&path.into_inner()) {
        Ok(id) => id,
        Err(err) => return error_response(&err),
    };
    let patch = payload.into_inner();
    let ships = state.ships.clone();
    let result = web::block(move || ships.update(id, patch)).await;
    respond(result, |ship| HttpResponse::Ok().json(ship))
}

#[utoipa::path(
    delete,
    path = "/rest/ships/{id}",
    params(
        ("id" = i64, Path, description = "Ship identifier")
    ),
    responses(
        (status = 200, description = "Ship deleted"),
        (status = 400, description = "Invalid id", body = ErrorResponse),
        (status = 404, description = "No such ship", body = ErrorResponse)
    ),
    tag = "ships"
)]
#[delete("/rest/ships/{id}")]
/// Delete a ship.
pub async fn delete_ship(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let id = match parse_ship_id(&path.into_inner()) {
        Ok(id) => id,
        Err(err) => return error_response(&err),
    };
    let ships = state.ships.clone();
    let result = web::block(move || ships.delete(id)).await;
    respond(result, |()| HttpResponse::Ok().finish())
}

#[utoipa::path(
    get,
    path = "/rest/openapi.json",
    responses(
        (status = 200, description = "OpenAPI document", body = serde_json::Value)
    ),
    tag = "system"
)]
#[get("/rest/openapi.json")]
/// Serve the OpenAPI document.
pub async fn openapi_json() -> impl Responder {
    HttpResponse::Ok().json(ApiDoc::openapi())
}
