use web_sys::{window, Storage};
use shared::constants::{COINS_STORAGE_PREFIX, PLACE_ID_STORAGE_KEY};

fn local_storage() -> Option<Storage> {
    window().and_then(|w| w.local_storage().ok().flatten())
}

/// Business location the user scanned in, set by the feedback flow.
pub fn get_place_id() -> Option<String> {
    local_storage()
        .and_then(|s| s.get_item(PLACE_ID_STORAGE_KEY).ok().flatten())
        .filter(|id| !id.is_empty())
}

pub fn coins_key(place_id: &str) -> String {
    format!("{}{}", COINS_STORAGE_PREFIX, place_id)
}

pub fn get_cached_coins(place_id: &str) -> Option<i64> {
    local_storage()
        .and_then(|s| s.get_item(&coins_key(place_id)).ok().flatten())
        .and_then(|v| v.parse::<i64>().ok())
}

pub fn set_cached_coins(place_id: &str, coins: i64) {
    if let Some(storage) = local_storage() {
        let _ = storage.set_item(&coins_key(place_id), &coins.to_string());
    }
}
