use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Player {
    pub id: Option<i64>,
    pub nick: String,
    pub whs: f32,
    pub role: String,
}

/// A season-long aggregation of tournament scores into one ranking per player.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Cycle {
    pub id: Option<i64>,
    pub name: String,
    pub status: i64,
    pub player_id: i64,
    pub best_rounds: i64,
    pub max_whs: f32,
}

impl Cycle {
    pub const STATUS_OPEN: i64 = 1;
    pub const STATUS_CLOSE: i64 = 0;
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct CycleTournament {
    pub id: Option<i64>,
    pub cycle_id: i64,
    pub name: String,
    pub rounds: i64,
    pub best_of: bool,
}

/// One row per player per cycle. `results` holds four slots per tournament,
/// in tournament order.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct CycleResult {
    pub id: Option<i64>,
    pub cycle_id: i64,
    pub player_name: String,
    pub whs: f32,
    pub results: Vec<i32>,
    pub cycle_score: i32,
    pub total: i32,
}

/// A player's 4-slot score breakdown for a single tournament, as reported by
/// the scoring frontend when the tournament is added to a cycle.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct PlayerRoundScore {
    pub player_name: String,
    pub whs: f32,
    pub r: [i32; 4],
}

/// A course in the catalog. Historical courses stay in the database for old
/// scorecards but drop out of listings and search.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Course {
    pub id: Option<i64>,
    pub name: String,
    pub par: i64,
    pub hole_nbr: i64,
    pub historical: bool,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Hole {
    pub id: Option<i64>,
    pub course_id: i64,
    pub number: i64,
    pub par: i64,
    pub si: i64,
}

/// Tee set for a course. `(sex, tee, tee_type)` identifies a tee; a second
/// tee with the same triple is rejected.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct CourseTee {
    pub id: Option<i64>,
    pub course_id: i64,
    pub tee: String,
    pub cr: f32,
    pub sr: i64,
    pub tee_type: i64,
    pub sex: bool,
}

impl CourseTee {
    pub const TEE_TYPE_18: i64 = 0;
    pub const TEE_TYPE_FIRST_9: i64 = 1;
    pub const TEE_TYPE_LAST_9: i64 = 2;
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct TournamentBet {
    pub id: Option<i64>,
    pub tournament_id: i64,
    pub bet_amount: i64,
    pub bet_game: String,
    pub is_skin_game: bool,
    pub is_ctp_game: bool,
}

/// One row per hole a player won in a side-game. Written during tournament
/// play; read-only afterwards except for settlement ownership transfer and
/// cascade deletion.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct PlayerWinningHole {
    pub id: Option<i64>,
    pub player_id: i64,
    pub round_id: i64,
    pub tournament_id: i64,
    pub hole_id: i64,
    pub is_skin_hole: bool,
    pub is_ctp_hole: bool,
    pub skin_amount: f32,
    pub ctp_amount: f32,
}

/// Per-player settlement summary for a tournament's side-games. Owns the
/// winning-hole rows that produced it.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct BetGameResult {
    pub id: Option<i64>,
    pub tournament_id: i64,
    pub player_id: i64,
    pub skins_count: i64,
    pub ctp_count: i64,
    pub total_skins_amount: f32,
    pub total_ctp_amount: f32,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct League {
    pub id: Option<i64>,
    pub name: String,
    pub status: i64,
    pub player_id: i64,
}

impl League {
    pub const STATUS_OPEN: i64 = 1;
    pub const STATUS_CLOSE: i64 = 0;
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct LeaguePlayer {
    pub id: Option<i64>,
    pub league_id: i64,
    pub player_id: i64,
    pub nick: String,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct LeagueMatch {
    pub id: Option<i64>,
    pub league_id: i64,
    pub winner_id: i64,
    pub looser_id: i64,
    pub result: String,
}
