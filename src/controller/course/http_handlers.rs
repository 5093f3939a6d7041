use actix_web::web::{self, Data};
use actix_web::{HttpRequest, HttpResponse, Responder};
use serde::Deserialize;
use serde_json::json;
use sql_middleware::middleware::ConfigAndPool;
use std::collections::HashMap;

use super::data_service;
use crate::controller::roles::role_from_request;
use crate::model::types::{Course, CourseTee, Hole};

#[derive(Deserialize)]
pub struct CourseAddRequest {
    pub course: Course,
    #[serde(default)]
    pub holes: Vec<Hole>,
    #[serde(default)]
    pub tees: Vec<CourseTee>,
}

fn course_id_param(query: &HashMap<String, String>) -> Result<i64, HttpResponse> {
    param(query, "course")
}

fn param(query: &HashMap<String, String>, name: &str) -> Result<i64, HttpResponse> {
    query
        .get(name)
        .and_then(|s| s.trim().parse().ok())
        .ok_or_else(|| {
            HttpResponse::BadRequest().json(json!({"error": format!("{name} parameter is required")}))
        })
}

pub async fn courses(
    query: web::Query<HashMap<String, String>>,
    abc: Data<ConfigAndPool>,
) -> impl Responder {
    let listing = match query.get("page").and_then(|s| s.trim().parse().ok()) {
        Some(page_no) => data_service::list_courses_page(abc.get_ref(), page_no).await,
        None => data_service::list_courses(abc.get_ref()).await,
    };

    match listing {
        Ok(courses) => HttpResponse::Ok().json(courses),
        Err(e) => e.to_response(),
    }
}

pub async fn course_get(
    query: web::Query<HashMap<String, String>>,
    abc: Data<ConfigAndPool>,
) -> impl Responder {
    let course_id = match course_id_param(&query) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match data_service::get_course(abc.get_ref(), course_id).await {
        Ok(course) => HttpResponse::Ok().json(course),
        Err(e) => e.to_response(),
    }
}

pub async fn course_search(
    query: web::Query<HashMap<String, String>>,
    abc: Data<ConfigAndPool>,
) -> impl Responder {
    let Some(name) = query.get("name") else {
        return HttpResponse::BadRequest().json(json!({"error": "name parameter is required"}));
    };

    match data_service::search_for_courses(abc.get_ref(), name.trim()).await {
        Ok(courses) => HttpResponse::Ok().json(courses),
        Err(e) => e.to_response(),
    }
}

pub async fn course_add(
    body: web::Json<CourseAddRequest>,
    abc: Data<ConfigAndPool>,
) -> impl Responder {
    match data_service::add_course(abc.get_ref(), &body.course, &body.holes, &body.tees).await {
        Ok(id) => HttpResponse::Ok().json(json!({ "id": id })),
        Err(e) => e.to_response(),
    }
}

pub async fn course_delete(
    req: HttpRequest,
    query: web::Query<HashMap<String, String>>,
    abc: Data<ConfigAndPool>,
) -> impl Responder {
    let role = match role_from_request(&req) {
        Ok(role) => role,
        Err(e) => return e.to_response(),
    };
    let course_id = match course_id_param(&query) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match data_service::delete_course(abc.get_ref(), role, course_id).await {
        Ok(()) => HttpResponse::Ok().json(json!({"status": "ok"})),
        Err(e) => e.to_response(),
    }
}

pub async fn course_move_to_history(
    req: HttpRequest,
    query: web::Query<HashMap<String, String>>,
    abc: Data<ConfigAndPool>,
) -> impl Responder {
    let role = match role_from_request(&req) {
        Ok(role) => role,
        Err(e) => return e.to_response(),
    };
    let course_id = match course_id_param(&query) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match data_service::move_course_to_history(abc.get_ref(), role, course_id).await {
        Ok(()) => HttpResponse::Ok().json(json!({"status": "ok"})),
        Err(e) => e.to_response(),
    }
}

pub async fn course_holes(
    query: web::Query<HashMap<String, String>>,
    abc: Data<ConfigAndPool>,
) -> impl Responder {
    let course_id = match course_id_param(&query) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match data_service::get_holes(abc.get_ref(), course_id).await {
        Ok(holes) => HttpResponse::Ok().json(holes),
        Err(e) => e.to_response(),
    }
}

pub async fn course_tees(
    query: web::Query<HashMap<String, String>>,
    abc: Data<ConfigAndPool>,
) -> impl Responder {
    let course_id = match course_id_param(&query) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match data_service::get_tees(abc.get_ref(), course_id).await {
        Ok(tees) => HttpResponse::Ok().json(tees),
        Err(e) => e.to_response(),
    }
}

pub async fn course_tee_get(
    query: web::Query<HashMap<String, String>>,
    abc: Data<ConfigAndPool>,
) -> impl Responder {
    let tee_id = match param(&query, "tee") {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match data_service::get_tee(abc.get_ref(), tee_id).await {
        Ok(tee) => HttpResponse::Ok().json(tee),
        Err(e) => e.to_response(),
    }
}

pub async fn course_tee_add(body: web::Json<CourseTee>, abc: Data<ConfigAndPool>) -> impl Responder {
    match data_service::add_tee(abc.get_ref(), &body, body.course_id).await {
        Ok(id) => HttpResponse::Ok().json(json!({ "id": id })),
        Err(e) => e.to_response(),
    }
}

pub async fn course_favourites(
    query: web::Query<HashMap<String, String>>,
    abc: Data<ConfigAndPool>,
) -> impl Responder {
    let player_id = match param(&query, "player") {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match data_service::list_favourites(abc.get_ref(), player_id).await {
        Ok(courses) => HttpResponse::Ok().json(courses),
        Err(e) => e.to_response(),
    }
}

pub async fn course_favourite_add(
    req: HttpRequest,
    query: web::Query<HashMap<String, String>>,
    abc: Data<ConfigAndPool>,
) -> impl Responder {
    let role = match role_from_request(&req) {
        Ok(role) => role,
        Err(e) => return e.to_response(),
    };
    let player_id = match param(&query, "player") {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let course_id = match course_id_param(&query) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match data_service::add_to_favourites(abc.get_ref(), role, player_id, course_id).await {
        Ok(()) => HttpResponse::Ok().json(json!({"status": "ok"})),
        Err(e) => e.to_response(),
    }
}

pub async fn course_favourite_delete(
    req: HttpRequest,
    query: web::Query<HashMap<String, String>>,
    abc: Data<ConfigAndPool>,
) -> impl Responder {
    let role = match role_from_request(&req) {
        Ok(role) => role,
        Err(e) => return e.to_response(),
    };
    let player_id = match param(&query, "player") {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let course_id = match course_id_param(&query) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match data_service::delete_from_favourites(abc.get_ref(), role, player_id, course_id).await {
        Ok(removed) => HttpResponse::Ok().json(json!({ "removed": removed })),
        Err(e) => e.to_response(),
    }
}
