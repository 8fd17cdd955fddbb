#![cfg(target_arch = "wasm32")]

use frontend::config::HandOff;
use frontend::pages::wheel::wheel_canvas::{draw_wheel, WheelStyle, BASE_CANVAS_SIZE};
use frontend::pages::wheel::wheel_utils::{StatusModal, StatusModalProps};
use frontend::storage::{coins_key, get_cached_coins, set_cached_coins};
use gloo_timers::future::TimeoutFuture;
use shared::shared_wheel_game::{default_segments, Segment};
use shared::spin_flow::OutcomeStatus;
use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;
use web_sys::{window, CanvasRenderingContext2d, Element, HtmlCanvasElement};
use yew::Callback;

wasm_bindgen_test_configure!(run_in_browser);

fn create_canvas() -> HtmlCanvasElement {
    window()
        .and_then(|w| w.document())
        .and_then(|d| d.create_element("canvas").ok())
        .and_then(|e| e.dyn_into::<HtmlCanvasElement>().ok())
        .expect("canvas element")
}

fn mount_point() -> Element {
    let document = window().and_then(|w| w.document()).expect("document");
    let root = document.create_element("div").expect("div");
    document.body().expect("body").append_child(&root).expect("append");
    root
}

#[wasm_bindgen_test]
fn empty_table_draws_nothing() {
    let canvas = create_canvas();
    let (width, height) = (canvas.width(), canvas.height());

    draw_wheel(&canvas, &[], 45.0, 2.0, &WheelStyle::default()).expect("draw");

    assert_eq!(canvas.width(), width);
    assert_eq!(canvas.height(), height);
}

#[wasm_bindgen_test]
fn emptied_table_clears_previous_wheel() {
    let canvas = create_canvas();
    draw_wheel(&canvas, &default_segments(), 0.0, 1.0, &WheelStyle::default()).expect("draw");

    let context = canvas
        .get_context("2d")
        .ok()
        .flatten()
        .and_then(|c| c.dyn_into::<CanvasRenderingContext2d>().ok())
        .expect("2d context");
    let center = BASE_CANVAS_SIZE / 2.0;
    // A point on a segment, away from the hub and the separators
    let (x, y) = (center + 150.0, center - 60.0);
    let alpha = |ctx: &CanvasRenderingContext2d| ctx.get_image_data(x, y, 1.0, 1.0).expect("pixel").data()[3];
    assert!(alpha(&context) > 0);

    draw_wheel(&canvas, &[], 0.0, 1.0, &WheelStyle::default()).expect("clear");
    assert_eq!(alpha(&context), 0);
}

#[wasm_bindgen_test]
fn backing_store_scales_with_pixel_ratio() {
    let canvas = create_canvas();
    let segments = default_segments();

    draw_wheel(&canvas, &segments, 0.0, 2.0, &WheelStyle::default()).expect("draw");
    assert_eq!(canvas.width(), (BASE_CANVAS_SIZE * 2.0) as u32);

    draw_wheel(&canvas, &segments, 90.0, 1.0, &WheelStyle::default()).expect("redraw");
    assert_eq!(canvas.height(), BASE_CANVAS_SIZE as u32);
}

#[wasm_bindgen_test]
fn single_segment_wheel_draws() {
    let canvas = create_canvas();
    let segments = vec![Segment::new(0, "Caffè", true)];
    assert!(draw_wheel(&canvas, &segments, 720.0, 1.0, &WheelStyle::default()).is_ok());
}

#[wasm_bindgen_test]
fn hand_off_targets_stay_on_origin() {
    assert_eq!(HandOff::Share.path(), "/share");
    assert_eq!(HandOff::Feedback.path(), "/feedback");

    let origin = window().and_then(|w| w.location().origin().ok()).expect("origin");
    assert_eq!(HandOff::Share.url(), format!("{}/share", origin));
}

#[wasm_bindgen_test]
fn cached_coins_are_per_place() {
    set_cached_coins("place-a", 3);
    set_cached_coins("place-b", 0);

    assert_eq!(coins_key("place-a"), "coins:place-a");
    assert_eq!(get_cached_coins("place-a"), Some(3));
    assert_eq!(get_cached_coins("place-b"), Some(0));
    assert_eq!(get_cached_coins("place-missing"), None);
}

#[wasm_bindgen_test(async)]
async fn error_panel_shows_server_message() {
    let root = mount_point();
    let props = StatusModalProps {
        outcome: OutcomeStatus::error("Rate limit exceeded"),
        on_dismiss: Callback::noop(),
    };
    let _app = yew::Renderer::<StatusModal>::with_root_and_props(root.clone(), props).render();
    TimeoutFuture::new(20).await;

    let text = root.text_content().unwrap_or_default();
    assert!(text.contains("Ops..."));
    assert!(text.contains("Rate limit exceeded"));
    assert!(text.contains("Chiudi"));
}

#[wasm_bindgen_test(async)]
async fn hidden_outcome_renders_no_panel() {
    let root = mount_point();
    let props = StatusModalProps {
        outcome: OutcomeStatus::hidden(),
        on_dismiss: Callback::noop(),
    };
    let _app = yew::Renderer::<StatusModal>::with_root_and_props(root.clone(), props).render();
    TimeoutFuture::new(20).await;

    assert_eq!(root.child_element_count(), 0);
}
