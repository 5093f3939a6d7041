use actix_web::web::{self, Data};
use actix_web::{HttpRequest, HttpResponse, Responder};
use serde::Deserialize;
use serde_json::json;
use sql_middleware::middleware::ConfigAndPool;
use std::collections::HashMap;

use crate::cache::PlayerCacheMap;
use crate::controller::roles::role_from_request;
use crate::model::player;

#[derive(Deserialize)]
pub struct PlayerWhsRequest {
    pub player_id: i64,
    pub whs: f32,
}

pub async fn player_get(
    query: web::Query<HashMap<String, String>>,
    abc: Data<ConfigAndPool>,
    cache_map: Data<PlayerCacheMap>,
) -> impl Responder {
    let Some(player_id) = query.get("player").and_then(|s| s.trim().parse().ok()) else {
        return HttpResponse::BadRequest().json(json!({"error": "player parameter is required"}));
    };

    match player::get_player(abc.get_ref(), cache_map.get_ref(), player_id).await {
        Ok(player) => HttpResponse::Ok().json(player),
        Err(e) => e.to_response(),
    }
}

pub async fn player_whs_update(
    req: HttpRequest,
    body: web::Json<PlayerWhsRequest>,
    abc: Data<ConfigAndPool>,
    cache_map: Data<PlayerCacheMap>,
) -> impl Responder {
    let role = match role_from_request(&req) {
        Ok(role) => role,
        Err(e) => return e.to_response(),
    };

    match player::update_player_whs(
        abc.get_ref(),
        cache_map.get_ref(),
        role,
        body.player_id,
        body.whs,
    )
    .await
    {
        Ok(()) => HttpResponse::Ok().json(json!({"status": "ok"})),
        Err(e) => e.to_response(),
    }
}
