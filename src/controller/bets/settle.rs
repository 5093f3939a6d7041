use std::collections::BTreeMap;

use crate::model::types::{BetGameResult, PlayerWinningHole};

/// Fold raw per-hole winning markers into one settlement summary per player.
/// A hole flagged for both games pays its winner in each game independently.
/// Holes are never double-counted or dropped: summing `skins_count`
/// (resp. `ctp_count`) over the output equals the number of skin-marked
/// (resp. ctp-marked) input rows.
pub fn aggregate_winning_holes(
    tournament_id: i64,
    holes: &[PlayerWinningHole],
) -> Vec<BetGameResult> {
    let mut by_player: BTreeMap<i64, BetGameResult> = BTreeMap::new();

    for hole in holes {
        let entry = by_player
            .entry(hole.player_id)
            .or_insert_with(|| BetGameResult {
                id: None,
                tournament_id,
                player_id: hole.player_id,
                skins_count: 0,
                ctp_count: 0,
                total_skins_amount: 0.0,
                total_ctp_amount: 0.0,
            });
        if hole.is_skin_hole {
            entry.skins_count += 1;
            entry.total_skins_amount += hole.skin_amount;
        }
        if hole.is_ctp_hole {
            entry.ctp_count += 1;
            entry.total_ctp_amount += hole.ctp_amount;
        }
    }

    by_player.into_values().collect()
}
