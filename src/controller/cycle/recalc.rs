/// Fixed slot group per tournament in a result row: one entry per scoring
/// category of the 4-part breakdown reported by the scoring frontend.
pub const RESULT_SLOTS: usize = 4;

pub struct RecalculatedResult {
    pub results: Vec<i32>,
    pub cycle_score: i32,
    pub total: i32,
}

/// Per-tournament subtotals, in tournament order.
pub fn tournament_subtotals(results: &[i32]) -> Vec<i32> {
    results
        .chunks(RESULT_SLOTS)
        .map(|chunk| chunk.iter().sum())
        .collect()
}

pub fn total_score(results: &[i32]) -> i32 {
    results.iter().sum()
}

/// Aggregate used for ranking. With `best_rounds` at or above the number of
/// recorded tournaments this is just the total; otherwise only the
/// `best_rounds` lowest per-tournament subtotals count, earliest tournament
/// winning any tie (stable sort).
pub fn cycle_score(results: &[i32], best_rounds: i64) -> i32 {
    let subtotals = tournament_subtotals(results);
    let best_rounds = usize::try_from(best_rounds).unwrap_or(0);
    if best_rounds >= subtotals.len() {
        return subtotals.iter().sum();
    }

    let mut indexed: Vec<(usize, i32)> = subtotals.into_iter().enumerate().collect();
    // sort_by_key is stable, so the earliest tournament wins a tie
    indexed.sort_by_key(|&(_, subtotal)| subtotal);
    indexed
        .iter()
        .take(best_rounds)
        .map(|&(_, subtotal)| subtotal)
        .sum()
}

/// Drop the slots contributed by the most recently added tournament and
/// recompute the aggregates. `None` means the row is empty afterwards and
/// should be deleted.
pub fn strip_last_tournament(results: &[i32], best_rounds: i64) -> Option<RecalculatedResult> {
    let keep = results.len().saturating_sub(RESULT_SLOTS);
    if keep == 0 {
        return None;
    }

    let remaining = results[..keep].to_vec();
    Some(RecalculatedResult {
        cycle_score: cycle_score(&remaining, best_rounds),
        total: total_score(&remaining),
        results: remaining,
    })
}

/// Merge one tournament's breakdown into a player's history. Players who
/// missed earlier tournaments get zero slots so every row stays at
/// `RESULT_SLOTS` entries per tournament.
pub fn append_tournament(results: &mut Vec<i32>, tournaments_so_far: usize, breakdown: &[i32; 4]) {
    results.resize(tournaments_so_far * RESULT_SLOTS, 0);
    results.extend_from_slice(breakdown);
}
