use crate::model::types::Player;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Explicit in-process player cache. Callers decide when to `get`, `put`
/// and `invalidate`; there is no interception layer doing it for them.
pub type PlayerCacheMap = Arc<RwLock<HashMap<i64, Player>>>;

pub fn new_player_cache() -> PlayerCacheMap {
    Arc::new(RwLock::new(HashMap::new()))
}

pub async fn get(cache_map: &PlayerCacheMap, player_id: i64) -> Option<Player> {
    let map = cache_map.read().await;
    map.get(&player_id).cloned()
}

pub async fn put(cache_map: &PlayerCacheMap, player: Player) {
    if let Some(id) = player.id {
        let mut map = cache_map.write().await;
        map.insert(id, player);
    }
}

pub async fn invalidate(cache_map: &PlayerCacheMap, player_id: i64) {
    let mut map = cache_map.write().await;
    map.remove(&player_id);
}
