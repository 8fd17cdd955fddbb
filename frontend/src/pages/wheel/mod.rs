pub mod wheel_canvas;
pub mod wheel_utils;

use std::cell::RefCell;
use std::rc::Rc;
use yew::prelude::*;
use wasm_bindgen_futures::spawn_local;
use shared::constants::SECURITY_ERROR;
use shared::shared_wheel_game::{default_segments, Segment};
use shared::spin_flow::{OutcomeKind, SpinContext, SpinFailure, SpinFlow, SpinRejection};
use shared::wheel_motion::WheelError;
use crate::api::{fetch_wheel_data, spin_wheel, ApiError};
use crate::config::{hand_off, HandOff};
use crate::hooks::{use_coins, use_csrf_token, CsrfToken};
use crate::storage::get_place_id;
use crate::styles;

use wheel_canvas::{SpinOrder, WheelCanvas};
use wheel_utils::{ButtonState, CoinPill, SpinButton, StatusModal};

type SegmentTable = UseStateHandle<Rc<Vec<Segment>>>;

/// Claims the single refresh slot. False while another refresh is running.
fn try_begin_refresh(in_flight: &RefCell<bool>) -> bool {
    !in_flight.replace(true)
}

/// Table to show after a fetch, or `None` to keep the current one.
/// Only a failed first load falls back to the default wheel.
fn refreshed_table(current: &[Segment], fetched: Result<Vec<Segment>, ApiError>) -> Option<Vec<Segment>> {
    match fetched {
        Ok(table) => Some(table),
        Err(e) => {
            log::error!("Failed to load wheel data: {}", e);
            current.is_empty().then(default_segments)
        }
    }
}

/// Spins wait for the token, the first table and any refresh in flight.
pub fn is_loading(csrf: &CsrfToken, segments_loaded: bool, refreshing: bool) -> bool {
    matches!(csrf, CsrfToken::Pending) || !segments_loaded || refreshing
}

fn refresh_segments(
    place_id: String,
    csrf_token: String,
    segments: SegmentTable,
    loaded: UseStateHandle<bool>,
    in_flight: Rc<RefCell<bool>>,
    update: UseForceUpdateHandle,
) {
    if !try_begin_refresh(&in_flight) {
        log::debug!("Segment refresh already in flight, skipping");
        return;
    }

    spawn_local(async move {
        let fetched = fetch_wheel_data(&place_id, &csrf_token).await;
        if let Some(table) = refreshed_table(&segments, fetched) {
            log::debug!("Loaded {} segments for place {}", table.len(), place_id);
            segments.set(Rc::new(table));
        }
        loaded.set(true);
        *in_flight.borrow_mut() = false;
        update.force_update();
    });
}

pub fn button_state(loading: bool, busy: bool, coins: i64) -> ButtonState {
    if loading {
        ButtonState::Loading
    } else if busy {
        ButtonState::Spinning
    } else if coins <= 0 {
        ButtonState::NoCoins
    } else {
        ButtonState::Ready
    }
}

#[function_component(WheelPage)]
pub fn wheel_page() -> Html {
    let place_id = use_state(get_place_id);
    let coins = use_coins((*place_id).clone());
    let csrf = use_csrf_token();
    let segments = use_state(|| Rc::new(Vec::<Segment>::new()));
    let segments_loaded = use_state(|| false);
    let refreshing = use_mut_ref(|| false);
    let flow = use_mut_ref(SpinFlow::new);
    let spin_order = use_state(|| None::<SpinOrder>);
    let next_spin_id = use_mut_ref(|| 0u32);
    let update = use_force_update();

    let loading = is_loading(&csrf, *segments_loaded, *refreshing.borrow());

    // Drop any in-progress cycle when the page goes away
    {
        let flow = flow.clone();
        use_effect_with((), move |_| {
            move || flow.borrow_mut().reset()
        });
    }

    // Load the segment table once the token is known
    {
        let place_id = place_id.clone();
        let segments = segments.clone();
        let segments_loaded = segments_loaded.clone();
        let refreshing = refreshing.clone();
        let flow = flow.clone();
        let update = update.clone();
        use_effect_with((*csrf).clone(), move |token| {
            match (token, (*place_id).clone()) {
                (CsrfToken::Pending, _) => {}
                (CsrfToken::Ready(token), Some(place_id)) => {
                    refresh_segments(place_id, token.clone(), segments, segments_loaded, refreshing, update);
                }
                (CsrfToken::Ready(_), None) => {
                    log::warn!("No place id stored, showing the default wheel");
                    segments.set(Rc::new(default_segments()));
                    segments_loaded.set(true);
                }
                (CsrfToken::Failed, _) => {
                    flow.borrow_mut().report_error(SECURITY_ERROR);
                    segments.set(Rc::new(default_segments()));
                    segments_loaded.set(true);
                    update.force_update();
                }
            }
            || ()
        });
    }

    let on_spin = {
        let place_id = place_id.clone();
        let coins = coins.clone();
        let csrf = csrf.clone();
        let segments = segments.clone();
        let flow = flow.clone();
        let refreshing = refreshing.clone();
        let spin_order = spin_order.clone();
        let next_spin_id = next_spin_id.clone();
        let update = update.clone();
        Callback::from(move |_: MouseEvent| {
            let table = (*segments).clone();
            let ticket = flow.borrow_mut().request_spin(&SpinContext {
                coins: *coins,
                segments: &table,
                loading: loading || *refreshing.borrow(),
                csrf_token: csrf.as_deref(),
                place_id: place_id.as_deref(),
            });
            update.force_update();

            let ticket = match ticket {
                Ok(ticket) => ticket,
                Err(SpinRejection::AlreadySpinning) | Err(SpinRejection::Busy) => return,
                Err(reason) => {
                    log::info!("Spin not started: {}", reason);
                    return;
                }
            };

            let flow = flow.clone();
            let spin_order = spin_order.clone();
            let next_spin_id = next_spin_id.clone();
            let update = update.clone();
            spawn_local(async move {
                let response = spin_wheel(&ticket.place_id, &ticket.csrf_token)
                    .await
                    .map_err(|e| {
                        log::error!("Spin request failed: {}", e);
                        SpinFailure::from(e)
                    });

                let target = flow.borrow_mut().on_spin_response(response, &table);
                if let Some(target_index) = target {
                    let id = {
                        let mut next = next_spin_id.borrow_mut();
                        *next = next.wrapping_add(1);
                        *next
                    };
                    spin_order.set(Some(SpinOrder { id, target_index, segments: table }));
                }
                update.force_update();
            });
        })
    };

    let on_spin_complete = {
        let place_id = place_id.clone();
        let csrf = csrf.clone();
        let segments = segments.clone();
        let segments_loaded = segments_loaded.clone();
        let refreshing = refreshing.clone();
        let flow = flow.clone();
        let update = update.clone();
        Callback::from(move |_: ()| {
            let reveal = flow.borrow_mut().on_animation_complete();
            if reveal.outcome.kind == OutcomeKind::Win {
                log::info!("Spin won {:?}", reveal.outcome.prize);
            }
            if reveal.refresh_segments {
                if let (Some(place_id), Some(token)) = ((*place_id).clone(), csrf.as_deref()) {
                    refresh_segments(
                        place_id,
                        token.to_string(),
                        segments.clone(),
                        segments_loaded.clone(),
                        refreshing.clone(),
                        update.clone(),
                    );
                }
            }
            update.force_update();
        })
    };

    let on_spin_failed = {
        let flow = flow.clone();
        let update = update.clone();
        Callback::from(move |_: WheelError| {
            flow.borrow_mut().on_animation_failed();
            update.force_update();
        })
    };

    let on_dismiss = {
        let flow = flow.clone();
        let update = update.clone();
        Callback::from(move |target: Option<HandOff>| {
            flow.borrow_mut().dismiss();
            update.force_update();
            if let Some(target) = target {
                hand_off(target);
            }
        })
    };

    let (busy, outcome) = {
        let flow = flow.borrow();
        (flow.is_busy(), flow.outcome().clone())
    };
    let state = button_state(loading, busy, *coins);

    html! {
        <div class={styles::WHEEL_PAGE}>
            <h1 class={styles::WHEEL_TITLE}>{"Vinci fantastici Premi!"}</h1>

            <div class={styles::WHEEL_HEADER}>
                <CoinPill coins={*coins} />
                <span class={styles::WHEEL_RATE}>{"1 ReviuCoin = 1 Giro"}</span>
            </div>

            <div class={styles::WHEEL_STAGE}>
                <WheelCanvas
                    segments={(*segments).clone()}
                    spin={(*spin_order).clone()}
                    on_spin_complete={on_spin_complete}
                    on_spin_failed={on_spin_failed}
                />
                if segments.is_empty() {
                    <div class={styles::WHEEL_LOADING}>
                        <span>{"Caricamento ruota..."}</span>
                    </div>
                }
            </div>

            <SpinButton state={state} onclick={on_spin} />

            <StatusModal outcome={outcome} on_dismiss={on_dismiss} />
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::spin_flow::SpinPhase;

    fn table(n: usize) -> Vec<Segment> {
        (0..n).map(|i| Segment::new(i, format!("P{}", i), i == 1)).collect()
    }

    #[test]
    fn test_refresh_in_flight_blocks_spins() {
        let in_flight = RefCell::new(false);
        assert!(try_begin_refresh(&in_flight));
        assert!(!try_begin_refresh(&in_flight));

        let token = CsrfToken::Ready("token".to_string());
        let loading = is_loading(&token, true, *in_flight.borrow());
        assert!(loading);

        let segments = table(6);
        let mut flow = SpinFlow::new();
        let ctx = SpinContext {
            coins: 3,
            segments: &segments,
            loading,
            csrf_token: token.as_deref(),
            place_id: Some("place-1"),
        };
        assert_eq!(flow.request_spin(&ctx), Err(SpinRejection::Busy));
        assert_eq!(flow.phase(), SpinPhase::Ready);

        *in_flight.borrow_mut() = false;
        assert!(!is_loading(&token, true, *in_flight.borrow()));
        assert!(try_begin_refresh(&in_flight));
    }

    #[test]
    fn test_is_loading_inputs() {
        assert!(is_loading(&CsrfToken::Pending, true, false));
        assert!(is_loading(&CsrfToken::Failed, false, false));
        assert!(!is_loading(&CsrfToken::Failed, true, false));
    }

    #[test]
    fn test_refreshed_table() {
        let fresh = refreshed_table(&table(6), Ok(table(3))).unwrap_or_default();
        assert_eq!(fresh.len(), 3);

        // A failed refresh keeps what is on screen
        assert_eq!(refreshed_table(&table(6), Err(ApiError::Timeout)), None);

        // A failed first load shows the default wheel
        let fallback = refreshed_table(&[], Err(ApiError::Network("offline".into()))).unwrap_or_default();
        assert_eq!(fallback.len(), 12);
        assert!(fallback.iter().all(|s| !s.is_win && s.label == "RIPROVA"));
    }

    #[test]
    fn test_button_state_priority() {
        assert_eq!(button_state(true, true, 0), ButtonState::Loading);
        assert_eq!(button_state(false, true, 0), ButtonState::Spinning);
        assert_eq!(button_state(false, false, 0), ButtonState::NoCoins);
        assert_eq!(button_state(false, false, 2), ButtonState::Ready);
    }
}
