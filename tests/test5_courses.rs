mod common;

use rusty_clubhouse::controller::course::data_service;
use rusty_clubhouse::controller::roles::Role;
use rusty_clubhouse::error::ServiceError;
use rusty_clubhouse::model::types::{Course, CourseTee, Hole};

const FIXTURE: &str = r"
INSERT INTO player (id, nick, whs, role) VALUES (1, 'boss', 10.0, 'admin');
INSERT INTO player (id, nick, whs, role) VALUES (2, 'bob', 18.4, 'player');
INSERT INTO course (id, name, par, hole_nbr, historical) VALUES (1, 'Lisia Polana', 72, 18, 0);
INSERT INTO course (id, name, par, hole_nbr, historical) VALUES (2, 'Amber Baltic', 72, 18, 1);
INSERT INTO course (id, name, par, hole_nbr, historical) VALUES (3, 'Binowo Park', 72, 18, 0);
";

fn course(name: &str) -> Course {
    Course {
        id: None,
        name: name.to_string(),
        par: 72,
        hole_nbr: 18,
        historical: false,
    }
}

fn tee(tee: &str, tee_type: i64, sex: bool) -> CourseTee {
    CourseTee {
        id: None,
        course_id: 0,
        tee: tee.to_string(),
        cr: 71.5,
        sr: 125,
        tee_type,
        sex,
    }
}

fn eighteen_holes() -> Vec<Hole> {
    (1..=18)
        .map(|number| Hole {
            id: None,
            course_id: 0,
            number,
            par: 4,
            si: number,
        })
        .collect()
}

#[tokio::test]
async fn listing_hides_historical_courses() -> Result<(), Box<dyn std::error::Error>> {
    let ctx = common::setup_test_context(FIXTURE).await?;

    let courses = data_service::list_courses(&ctx.config_and_pool).await?;
    assert_eq!(courses.len(), 2);
    assert_eq!(courses[0].name, "Binowo Park");
    assert_eq!(courses[1].name, "Lisia Polana");
    Ok(())
}

#[tokio::test]
async fn paged_listing_stays_within_page_size() -> Result<(), Box<dyn std::error::Error>> {
    let ctx = common::setup_test_context(FIXTURE).await?;

    let first_page = data_service::list_courses_page(&ctx.config_and_pool, 0).await?;
    assert_eq!(first_page.len(), 2);

    let second_page = data_service::list_courses_page(&ctx.config_and_pool, 1).await?;
    assert!(second_page.is_empty());
    Ok(())
}

#[tokio::test]
async fn add_course_stores_holes_and_tees() -> Result<(), Box<dyn std::error::Error>> {
    let ctx = common::setup_test_context(FIXTURE).await?;

    let course_id = data_service::add_course(
        &ctx.config_and_pool,
        &course("Modry Las"),
        &eighteen_holes(),
        &[tee("yellow", CourseTee::TEE_TYPE_18, false)],
    )
    .await?;

    let stored = data_service::get_course(&ctx.config_and_pool, course_id).await?;
    assert_eq!(stored.name, "Modry Las");
    assert!(!stored.historical);

    let holes = data_service::get_holes(&ctx.config_and_pool, course_id).await?;
    assert_eq!(holes.len(), 18);
    assert_eq!(holes[0].number, 1);
    assert_eq!(holes[17].number, 18);

    let tees = data_service::get_tees(&ctx.config_and_pool, course_id).await?;
    assert_eq!(tees.len(), 1);
    assert_eq!(tees[0].tee, "yellow");

    let by_id = data_service::get_tee(&ctx.config_and_pool, tees[0].id.unwrap()).await?;
    assert_eq!(by_id.course_id, course_id);
    Ok(())
}

#[tokio::test]
async fn duplicate_tee_is_rejected() -> Result<(), Box<dyn std::error::Error>> {
    let ctx = common::setup_test_context(FIXTURE).await?;

    data_service::add_tee(
        &ctx.config_and_pool,
        &tee("yellow", CourseTee::TEE_TYPE_18, false),
        1,
    )
    .await?;

    let err = data_service::add_tee(
        &ctx.config_and_pool,
        &tee("yellow", CourseTee::TEE_TYPE_18, false),
        1,
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ServiceError::TeeAlreadyExists));

    // same colour for the other sex or another layout is a different tee
    data_service::add_tee(
        &ctx.config_and_pool,
        &tee("yellow", CourseTee::TEE_TYPE_18, true),
        1,
    )
    .await?;
    data_service::add_tee(
        &ctx.config_and_pool,
        &tee("yellow", CourseTee::TEE_TYPE_FIRST_9, false),
        1,
    )
    .await?;
    Ok(())
}

#[tokio::test]
async fn tee_needs_an_existing_course() -> Result<(), Box<dyn std::error::Error>> {
    let ctx = common::setup_test_context(FIXTURE).await?;

    let err = data_service::add_tee(
        &ctx.config_and_pool,
        &tee("red", CourseTee::TEE_TYPE_18, true),
        99,
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));
    Ok(())
}

#[tokio::test]
async fn search_needs_three_characters() -> Result<(), Box<dyn std::error::Error>> {
    let ctx = common::setup_test_context(FIXTURE).await?;

    let err = data_service::search_for_courses(&ctx.config_and_pool, "li")
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::SearchStringTooShort));
    Ok(())
}

#[tokio::test]
async fn search_matches_substrings_and_skips_historical()
-> Result<(), Box<dyn std::error::Error>> {
    let ctx = common::setup_test_context(FIXTURE).await?;

    let hits = data_service::search_for_courses(&ctx.config_and_pool, "lisia").await?;
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].name, "Lisia Polana");

    // Amber Baltic is historical
    let hits = data_service::search_for_courses(&ctx.config_and_pool, "amber").await?;
    assert!(hits.is_empty());
    Ok(())
}

#[tokio::test]
async fn favourites_round_trip() -> Result<(), Box<dyn std::error::Error>> {
    let ctx = common::setup_test_context(FIXTURE).await?;

    data_service::add_to_favourites(&ctx.config_and_pool, Role::Player(2), 2, 1).await?;
    data_service::add_to_favourites(&ctx.config_and_pool, Role::Player(2), 2, 3).await?;

    let favourites = data_service::list_favourites(&ctx.config_and_pool, 2).await?;
    assert_eq!(favourites.len(), 2);
    assert_eq!(favourites[0].name, "Binowo Park");

    let removed =
        data_service::delete_from_favourites(&ctx.config_and_pool, Role::Player(2), 2, 1).await?;
    assert_eq!(removed, 1);
    let removed =
        data_service::delete_from_favourites(&ctx.config_and_pool, Role::Player(2), 2, 1).await?;
    assert_eq!(removed, 0);

    let favourites = data_service::list_favourites(&ctx.config_and_pool, 2).await?;
    assert_eq!(favourites.len(), 1);
    Ok(())
}

#[tokio::test]
async fn favourites_belong_to_their_player() -> Result<(), Box<dyn std::error::Error>> {
    let ctx = common::setup_test_context(FIXTURE).await?;

    let err = data_service::add_to_favourites(&ctx.config_and_pool, Role::Player(2), 1, 1)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Unauthorized(_)));

    // an admin may edit anyone's list
    data_service::add_to_favourites(&ctx.config_and_pool, Role::Admin, 2, 1).await?;
    Ok(())
}

#[tokio::test]
async fn move_to_history_hides_course_and_clears_favourites()
-> Result<(), Box<dyn std::error::Error>> {
    let ctx = common::setup_test_context(FIXTURE).await?;

    data_service::add_to_favourites(&ctx.config_and_pool, Role::Player(2), 2, 1).await?;

    let err = data_service::move_course_to_history(&ctx.config_and_pool, Role::Player(2), 1)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Unauthorized(_)));

    data_service::move_course_to_history(&ctx.config_and_pool, Role::Admin, 1).await?;

    let courses = data_service::list_courses(&ctx.config_and_pool).await?;
    assert_eq!(courses.len(), 1);
    assert_eq!(courses[0].name, "Binowo Park");

    // still readable directly, just flagged
    let stored = data_service::get_course(&ctx.config_and_pool, 1).await?;
    assert!(stored.historical);

    assert!(
        data_service::list_favourites(&ctx.config_and_pool, 2)
            .await?
            .is_empty()
    );
    Ok(())
}

#[tokio::test]
async fn delete_course_is_admin_only_and_cascades() -> Result<(), Box<dyn std::error::Error>> {
    let ctx = common::setup_test_context(FIXTURE).await?;

    data_service::add_tee(
        &ctx.config_and_pool,
        &tee("white", CourseTee::TEE_TYPE_18, false),
        1,
    )
    .await?;
    data_service::add_to_favourites(&ctx.config_and_pool, Role::Player(2), 2, 1).await?;

    let err = data_service::delete_course(&ctx.config_and_pool, Role::Player(2), 1)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Unauthorized(_)));

    data_service::delete_course(&ctx.config_and_pool, Role::Admin, 1).await?;

    let err = data_service::get_course(&ctx.config_and_pool, 1)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));
    assert!(
        data_service::get_tees(&ctx.config_and_pool, 1)
            .await?
            .is_empty()
    );
    assert!(
        data_service::list_favourites(&ctx.config_and_pool, 2)
            .await?
            .is_empty()
    );
    Ok(())
}
