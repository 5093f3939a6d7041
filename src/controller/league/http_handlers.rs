use actix_web::web::{self, Data};
use actix_web::{HttpRequest, HttpResponse, Responder};
use serde_json::json;
use sql_middleware::middleware::ConfigAndPool;
use std::collections::HashMap;

use super::data_service;
use crate::controller::roles::role_from_request;
use crate::model::types::{League, LeagueMatch, LeaguePlayer};

fn league_id_param(query: &HashMap<String, String>) -> Result<i64, HttpResponse> {
    query
        .get("league")
        .and_then(|s| s.trim().parse().ok())
        .ok_or_else(|| {
            HttpResponse::BadRequest().json(json!({"error": "league parameter is required"}))
        })
}

fn id_param(query: &HashMap<String, String>, name: &str) -> Result<i64, HttpResponse> {
    query
        .get(name)
        .and_then(|s| s.trim().parse().ok())
        .ok_or_else(|| {
            HttpResponse::BadRequest().json(json!({"error": format!("{name} parameter is required")}))
        })
}

pub async fn leagues(abc: Data<ConfigAndPool>) -> impl Responder {
    match data_service::find_all_leagues(abc.get_ref()).await {
        Ok(leagues) => HttpResponse::Ok().json(leagues),
        Err(e) => e.to_response(),
    }
}

pub async fn league_add(body: web::Json<League>, abc: Data<ConfigAndPool>) -> impl Responder {
    match data_service::add_league(abc.get_ref(), &body).await {
        Ok(id) => HttpResponse::Ok().json(json!({ "id": id })),
        Err(e) => e.to_response(),
    }
}

pub async fn league_players(
    query: web::Query<HashMap<String, String>>,
    abc: Data<ConfigAndPool>,
) -> impl Responder {
    let league_id = match league_id_param(&query) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match data_service::get_league_players(abc.get_ref(), league_id).await {
        Ok(players) => HttpResponse::Ok().json(players),
        Err(e) => e.to_response(),
    }
}

pub async fn league_player_add(
    req: HttpRequest,
    body: web::Json<LeaguePlayer>,
    abc: Data<ConfigAndPool>,
) -> impl Responder {
    let role = match role_from_request(&req) {
        Ok(role) => role,
        Err(e) => return e.to_response(),
    };

    match data_service::add_league_player(abc.get_ref(), role, &body).await {
        Ok(()) => HttpResponse::Ok().json(json!({"status": "ok"})),
        Err(e) => e.to_response(),
    }
}

pub async fn league_player_delete(
    req: HttpRequest,
    query: web::Query<HashMap<String, String>>,
    abc: Data<ConfigAndPool>,
) -> impl Responder {
    let role = match role_from_request(&req) {
        Ok(role) => role,
        Err(e) => return e.to_response(),
    };
    let league_id = match league_id_param(&query) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let player_id = match id_param(&query, "player") {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match data_service::delete_league_player(abc.get_ref(), role, league_id, player_id).await {
        Ok(()) => HttpResponse::Ok().json(json!({"status": "ok"})),
        Err(e) => e.to_response(),
    }
}

pub async fn league_players_delete(
    req: HttpRequest,
    query: web::Query<HashMap<String, String>>,
    abc: Data<ConfigAndPool>,
) -> impl Responder {
    let role = match role_from_request(&req) {
        Ok(role) => role,
        Err(e) => return e.to_response(),
    };
    let league_id = match league_id_param(&query) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match data_service::delete_league_players(abc.get_ref(), role, league_id).await {
        Ok(()) => HttpResponse::Ok().json(json!({"status": "ok"})),
        Err(e) => e.to_response(),
    }
}

pub async fn league_close(
    req: HttpRequest,
    query: web::Query<HashMap<String, String>>,
    abc: Data<ConfigAndPool>,
) -> impl Responder {
    let role = match role_from_request(&req) {
        Ok(role) => role,
        Err(e) => return e.to_response(),
    };
    let league_id = match league_id_param(&query) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match data_service::close_league(abc.get_ref(), role, league_id).await {
        Ok(()) => HttpResponse::Ok().json(json!({"status": "ok"})),
        Err(e) => e.to_response(),
    }
}

pub async fn league_matches(
    query: web::Query<HashMap<String, String>>,
    abc: Data<ConfigAndPool>,
) -> impl Responder {
    let league_id = match league_id_param(&query) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match data_service::get_league_matches(abc.get_ref(), league_id).await {
        Ok(matches) => HttpResponse::Ok().json(matches),
        Err(e) => e.to_response(),
    }
}

pub async fn league_match_add(
    req: HttpRequest,
    body: web::Json<LeagueMatch>,
    abc: Data<ConfigAndPool>,
) -> impl Responder {
    let role = match role_from_request(&req) {
        Ok(role) => role,
        Err(e) => return e.to_response(),
    };

    match data_service::add_league_match(abc.get_ref(), role, &body).await {
        Ok(()) => HttpResponse::Ok().json(json!({"status": "ok"})),
        Err(e) => e.to_response(),
    }
}

pub async fn league_match_delete(
    req: HttpRequest,
    query: web::Query<HashMap<String, String>>,
    abc: Data<ConfigAndPool>,
) -> impl Responder {
    let role = match role_from_request(&req) {
        Ok(role) => role,
        Err(e) => return e.to_response(),
    };
    let league_id = match league_id_param(&query) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let winner_id = match id_param(&query, "winner") {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let looser_id = match id_param(&query, "looser") {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match data_service::delete_league_match(abc.get_ref(), role, league_id, winner_id, looser_id)
        .await
    {
        Ok(()) => HttpResponse::Ok().json(json!({"status": "ok"})),
        Err(e) => e.to_response(),
    }
}
