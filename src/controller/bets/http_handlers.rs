use actix_web::web::{self, Data};
use actix_web::{HttpRequest, HttpResponse, Responder};
use serde_json::json;
use sql_middleware::middleware::ConfigAndPool;
use std::collections::HashMap;

use super::data_service;
use crate::controller::roles::role_from_request;
use crate::model::types::{PlayerWinningHole, TournamentBet};

fn tournament_id_param(query: &HashMap<String, String>) -> Result<i64, HttpResponse> {
    query
        .get("tournament")
        .and_then(|s| s.trim().parse().ok())
        .ok_or_else(|| {
            HttpResponse::BadRequest().json(json!({"error": "tournament parameter is required"}))
        })
}

pub async fn tournament_bets(
    query: web::Query<HashMap<String, String>>,
    abc: Data<ConfigAndPool>,
) -> impl Responder {
    let tournament_id = match tournament_id_param(&query) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match data_service::get_tournament_bets(abc.get_ref(), tournament_id).await {
        Ok(bets) => HttpResponse::Ok().json(bets),
        Err(e) => e.to_response(),
    }
}

pub async fn tournament_bet_add(
    req: HttpRequest,
    body: web::Json<TournamentBet>,
    abc: Data<ConfigAndPool>,
) -> impl Responder {
    let role = match role_from_request(&req) {
        Ok(role) => role,
        Err(e) => return e.to_response(),
    };

    match data_service::add_tournament_bet(abc.get_ref(), role, &body).await {
        Ok(id) => HttpResponse::Ok().json(json!({ "id": id })),
        Err(e) => e.to_response(),
    }
}

pub async fn winning_hole_add(
    req: HttpRequest,
    body: web::Json<PlayerWinningHole>,
    abc: Data<ConfigAndPool>,
) -> impl Responder {
    let role = match role_from_request(&req) {
        Ok(role) => role,
        Err(e) => return e.to_response(),
    };

    match data_service::add_winning_hole(abc.get_ref(), role, &body).await {
        Ok(id) => HttpResponse::Ok().json(json!({ "id": id })),
        Err(e) => e.to_response(),
    }
}

pub async fn bet_game_results(
    query: web::Query<HashMap<String, String>>,
    abc: Data<ConfigAndPool>,
) -> impl Responder {
    let tournament_id = match tournament_id_param(&query) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match data_service::get_bet_game_results(abc.get_ref(), tournament_id).await {
        Ok(results) => HttpResponse::Ok().json(results),
        Err(e) => e.to_response(),
    }
}

pub async fn bet_game_settle(
    req: HttpRequest,
    query: web::Query<HashMap<String, String>>,
    abc: Data<ConfigAndPool>,
) -> impl Responder {
    let role = match role_from_request(&req) {
        Ok(role) => role,
        Err(e) => return e.to_response(),
    };
    let tournament_id = match tournament_id_param(&query) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match data_service::settle_bet_game(abc.get_ref(), role, tournament_id).await {
        Ok(results) => HttpResponse::Ok().json(results),
        Err(e) => e.to_response(),
    }
}

pub async fn tournament_bets_delete(
    req: HttpRequest,
    query: web::Query<HashMap<String, String>>,
    abc: Data<ConfigAndPool>,
) -> impl Responder {
    let role = match role_from_request(&req) {
        Ok(role) => role,
        Err(e) => return e.to_response(),
    };
    let tournament_id = match tournament_id_param(&query) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match data_service::delete_tournament_bets(abc.get_ref(), role, tournament_id).await {
        Ok(()) => HttpResponse::Ok().json(json!({"status": "ok"})),
        Err(e) => e.to_response(),
    }
}
