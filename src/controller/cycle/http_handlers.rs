use actix_web::web::{self, Data};
use actix_web::{HttpRequest, HttpResponse, Responder};
use serde::Deserialize;
use serde_json::json;
use sql_middleware::middleware::ConfigAndPool;
use std::collections::HashMap;

use super::data_service;
use crate::controller::roles::role_from_request;
use crate::model::types::{Cycle, CycleTournament, PlayerRoundScore};

fn cycle_id_param(query: &HashMap<String, String>) -> Result<i64, HttpResponse> {
    query
        .get("cycle")
        .and_then(|s| s.trim().parse().ok())
        .ok_or_else(|| {
            HttpResponse::BadRequest().json(json!({"error": "cycle parameter is required"}))
        })
}

pub async fn cycles(abc: Data<ConfigAndPool>) -> impl Responder {
    match data_service::find_all_cycles(abc.get_ref()).await {
        Ok(cycles) => HttpResponse::Ok().json(cycles),
        Err(e) => e.to_response(),
    }
}

pub async fn cycle_add(
    req: HttpRequest,
    body: web::Json<Cycle>,
    abc: Data<ConfigAndPool>,
) -> impl Responder {
    let role = match role_from_request(&req) {
        Ok(role) => role,
        Err(e) => return e.to_response(),
    };

    match data_service::add_cycle(abc.get_ref(), role, &body).await {
        Ok(id) => HttpResponse::Ok().json(json!({ "id": id })),
        Err(e) => e.to_response(),
    }
}

pub async fn cycle_tournaments(
    query: web::Query<HashMap<String, String>>,
    abc: Data<ConfigAndPool>,
) -> impl Responder {
    let cycle_id = match cycle_id_param(&query) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match data_service::find_cycle_tournaments(abc.get_ref(), cycle_id).await {
        Ok(tournaments) => HttpResponse::Ok().json(tournaments),
        Err(e) => e.to_response(),
    }
}

pub async fn cycle_results(
    query: web::Query<HashMap<String, String>>,
    abc: Data<ConfigAndPool>,
) -> impl Responder {
    let cycle_id = match cycle_id_param(&query) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match data_service::find_cycle_results(abc.get_ref(), cycle_id).await {
        Ok(results) => HttpResponse::Ok().json(results),
        Err(e) => e.to_response(),
    }
}

#[derive(Deserialize)]
pub struct CycleTournamentRequest {
    pub tournament: CycleTournament,
    pub round_scores: Vec<PlayerRoundScore>,
}

pub async fn cycle_tournament_add(
    req: HttpRequest,
    body: web::Json<CycleTournamentRequest>,
    abc: Data<ConfigAndPool>,
) -> impl Responder {
    let role = match role_from_request(&req) {
        Ok(role) => role,
        Err(e) => return e.to_response(),
    };

    match data_service::add_cycle_tournament(
        abc.get_ref(),
        role,
        &body.tournament,
        &body.round_scores,
    )
    .await
    {
        Ok(id) => HttpResponse::Ok().json(json!({ "id": id })),
        Err(e) => e.to_response(),
    }
}

pub async fn cycle_tournament_remove_last(
    req: HttpRequest,
    query: web::Query<HashMap<String, String>>,
    abc: Data<ConfigAndPool>,
) -> impl Responder {
    let role = match role_from_request(&req) {
        Ok(role) => role,
        Err(e) => return e.to_response(),
    };
    let cycle_id = match cycle_id_param(&query) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match data_service::remove_last_cycle_tournament(abc.get_ref(), role, cycle_id).await {
        Ok(()) => HttpResponse::Ok().json(json!({"status": "ok"})),
        Err(e) => e.to_response(),
    }
}

pub async fn cycle_close(
    req: HttpRequest,
    query: web::Query<HashMap<String, String>>,
    abc: Data<ConfigAndPool>,
) -> impl Responder {
    let role = match role_from_request(&req) {
        Ok(role) => role,
        Err(e) => return e.to_response(),
    };
    let cycle_id = match cycle_id_param(&query) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match data_service::close_cycle(abc.get_ref(), role, cycle_id).await {
        Ok(()) => HttpResponse::Ok().json(json!({"status": "ok"})),
        Err(e) => e.to_response(),
    }
}

pub async fn cycle_delete(
    req: HttpRequest,
    query: web::Query<HashMap<String, String>>,
    abc: Data<ConfigAndPool>,
) -> impl Responder {
    let role = match role_from_request(&req) {
        Ok(role) => role,
        Err(e) => return e.to_response(),
    };
    let cycle_id = match cycle_id_param(&query) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match data_service::delete_cycle(abc.get_ref(), role, cycle_id).await {
        Ok(()) => HttpResponse::Ok().json(json!({"status": "ok"})),
        Err(e) => e.to_response(),
    }
}
