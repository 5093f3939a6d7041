use deadpool_postgres::{ManagerConfig, RecyclingMethod};
use rusty_clubhouse::args;
use rusty_clubhouse::cache::new_player_cache;
use rusty_clubhouse::controller::{bets, course, cycle, league, player};
use rusty_clubhouse::model::database::{create_tables, execute_batch_sql};
use sql_middleware::middleware::{ConfigAndPool, DatabaseType};

use actix_web::web::Data;
use actix_web::{App, HttpResponse, HttpServer, web};

#[actix_web::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = args::args_checks();

    let cfg = deadpool_postgres::Config::new();
    let config_and_pool: ConfigAndPool;
    if args.db_type == DatabaseType::Postgres {
        let mut postgres_config = cfg;
        postgres_config.dbname = Some(args.db_name);
        postgres_config.host = args.db_host;
        postgres_config.port = args.db_port;
        postgres_config.user = args.db_user;
        postgres_config.password = args.db_password;
        postgres_config.manager = Some(ManagerConfig {
            recycling_method: RecyclingMethod::Fast,
        });
        config_and_pool = ConfigAndPool::new_postgres(postgres_config).await?;
    } else {
        match ConfigAndPool::new_sqlite(args.db_name).await {
            Ok(a) => {
                config_and_pool = a;
            }
            Err(e) => {
                eprintln!(
                    "Error: {}\nBacktrace: {:?}",
                    e,
                    std::backtrace::Backtrace::capture()
                );
                std::process::exit(1);
            }
        }
        create_tables(&config_and_pool).await?;
    }

    if args.db_startup_script.is_some() {
        execute_batch_sql(&config_and_pool, &args.combined_sql_script).await?;
    }

    let cache_map = new_player_cache();

    HttpServer::new(move || {
        App::new()
            .app_data(Data::new(config_and_pool.clone()))
            .app_data(Data::new(cache_map.clone()))
            .route("/health", web::get().to(HttpResponse::Ok))
            .route("/player", web::get().to(player::player_get))
            .route("/player/whs", web::put().to(player::player_whs_update))
            .route("/cycles", web::get().to(cycle::cycles))
            .route("/cycles", web::post().to(cycle::cycle_add))
            .route("/cycles", web::delete().to(cycle::cycle_delete))
            .route("/cycles/close", web::post().to(cycle::cycle_close))
            .route("/cycles/results", web::get().to(cycle::cycle_results))
            .route("/cycles/tournaments", web::get().to(cycle::cycle_tournaments))
            .route(
                "/cycles/tournaments",
                web::post().to(cycle::cycle_tournament_add),
            )
            .route(
                "/cycles/tournaments/last",
                web::delete().to(cycle::cycle_tournament_remove_last),
            )
            .route("/leagues", web::get().to(league::leagues))
            .route("/leagues", web::post().to(league::league_add))
            .route("/leagues/close", web::post().to(league::league_close))
            .route("/leagues/players", web::get().to(league::league_players))
            .route(
                "/leagues/players",
                web::post().to(league::league_player_add),
            )
            .route(
                "/leagues/players",
                web::delete().to(league::league_player_delete),
            )
            .route(
                "/leagues/players/all",
                web::delete().to(league::league_players_delete),
            )
            .route("/leagues/matches", web::get().to(league::league_matches))
            .route(
                "/leagues/matches",
                web::post().to(league::league_match_add),
            )
            .route(
                "/leagues/matches",
                web::delete().to(league::league_match_delete),
            )
            .route("/courses", web::get().to(course::courses))
            .route("/courses", web::post().to(course::course_add))
            .route("/courses", web::delete().to(course::course_delete))
            .route("/courses/one", web::get().to(course::course_get))
            .route("/courses/search", web::get().to(course::course_search))
            .route(
                "/courses/history",
                web::post().to(course::course_move_to_history),
            )
            .route("/courses/holes", web::get().to(course::course_holes))
            .route("/courses/tees", web::get().to(course::course_tees))
            .route("/courses/tees", web::post().to(course::course_tee_add))
            .route("/courses/tee", web::get().to(course::course_tee_get))
            .route(
                "/courses/favourites",
                web::get().to(course::course_favourites),
            )
            .route(
                "/courses/favourites",
                web::post().to(course::course_favourite_add),
            )
            .route(
                "/courses/favourites",
                web::delete().to(course::course_favourite_delete),
            )
            .route("/bets", web::get().to(bets::tournament_bets))
            .route("/bets", web::post().to(bets::tournament_bet_add))
            .route("/bets", web::delete().to(bets::tournament_bets_delete))
            .route("/bets/holes", web::post().to(bets::winning_hole_add))
            .route("/bets/results", web::get().to(bets::bet_game_results))
            .route("/bets/settle", web::post().to(bets::bet_game_settle))
    })
    .bind("0.0.0.0:8081")?
    .run()
    .await?;
    Ok(())
}
