use gloo_events::EventListener;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{window, CustomEvent};
use yew::prelude::*;
use shared::constants::COINS_UPDATE_EVENT;
use crate::storage::{get_cached_coins, set_cached_coins};

/// Coin balance for `(user, place)`, pushed by the realtime subscription as
/// `coinsUpdate` events. The wheel only ever reads it; spins debit server-side.
#[hook]
pub fn use_coins(place_id: Option<String>) -> UseStateHandle<i64> {
    let coins = {
        let place_id = place_id.clone();
        use_state(move || place_id.as_deref().and_then(get_cached_coins).unwrap_or(0))
    };

    {
        let coins = coins.clone();
        use_effect_with(place_id, move |place_id| {
            let place_id = place_id.clone();
            let listener = window().map(|window| {
                EventListener::new(&window, COINS_UPDATE_EVENT, move |event| {
                    let Some(event) = event.dyn_ref::<CustomEvent>() else {
                        return;
                    };
                    if let Some(balance) = read_balance(&event.detail(), place_id.as_deref()) {
                        if let Some(place_id) = place_id.as_deref() {
                            set_cached_coins(place_id, balance);
                        }
                        coins.set(balance);
                    }
                })
            });

            move || drop(listener)
        });
    }

    coins
}

// Detail is either the bare balance or `{ placeId, coins }`.
fn read_balance(detail: &JsValue, place_id: Option<&str>) -> Option<i64> {
    if let Some(total) = detail.as_f64() {
        return Some(total.max(0.0) as i64);
    }
    if !detail.is_object() {
        return None;
    }

    let event_place = js_sys::Reflect::get(detail, &JsValue::from_str("placeId"))
        .ok()
        .and_then(|v| v.as_string());
    if let (Some(event_place), Some(place_id)) = (event_place.as_deref(), place_id) {
        if event_place != place_id {
            return None;
        }
    }

    js_sys::Reflect::get(detail, &JsValue::from_str("coins"))
        .ok()
        .and_then(|v| v.as_f64())
        .map(|c| c.max(0.0) as i64)
}
