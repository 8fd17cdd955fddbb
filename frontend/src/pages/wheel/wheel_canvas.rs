use std::cell::RefCell;
use std::f64::consts::PI;
use std::rc::Rc;
use gloo_events::EventListener;
use gloo_render::{request_animation_frame, AnimationFrame};
use gloo_timers::callback::Timeout;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{window, CanvasRenderingContext2d, HtmlCanvasElement};
use yew::prelude::*;
use shared::constants::SPIN_SETTLE_DELAY_MS;
use shared::shared_wheel_game::Segment;
use shared::wheel_motion::{random_extra_turns, segment_arc, Frame, SpinStart, WheelAnimation, WheelError};

// Drawn at high resolution, shown at a fixed CSS size
pub const BASE_CANVAS_SIZE: f64 = 800.0;
pub const DISPLAY_SIZE: f64 = 500.0;
const LABEL_RADIUS_RATIO: f64 = 0.68;
const HUB_COLOR: &str = "#FFFFFF";
const POINTER_COLOR: &str = "#1A1A1A";

#[derive(Clone, Debug, PartialEq)]
pub struct WheelStyle {
    pub outer_border_color: String,
    pub outer_border_width: f64,
    pub inner_radius: f64,
    pub inner_border_color: String,
    pub inner_border_width: f64,
    pub radius_line_color: String,
    pub radius_line_width: f64,
    pub font_size: f64,
    pub font_weight: String,
}

impl Default for WheelStyle {
    fn default() -> Self {
        Self {
            outer_border_color: "#FFFFFF".to_string(),
            outer_border_width: 4.0,
            inner_radius: 6.0,
            inner_border_color: "#FFFFFF".to_string(),
            inner_border_width: 20.0,
            radius_line_color: "#ffffff".to_string(),
            radius_line_width: 4.0,
            font_size: 18.0,
            font_weight: "bold".to_string(),
        }
    }
}

/// Request to land on `target_index` of `segments`, the table the server
/// result was resolved against. A new `id` starts a new spin.
#[derive(Clone, Debug, PartialEq)]
pub struct SpinOrder {
    pub id: u32,
    pub target_index: usize,
    pub segments: Rc<Vec<Segment>>,
}

/// Starts `order` on `animation`, sized by the order's own table so a
/// table swapped in by a refresh cannot move the landing segment.
pub fn start_spin(
    animation: &mut WheelAnimation,
    order: &SpinOrder,
    extra_turns: u32,
    now_ms: f64,
) -> Result<SpinStart, WheelError> {
    animation.spin_to(order.target_index, order.segments.len(), extra_turns, now_ms)
}

#[derive(Properties, PartialEq)]
pub struct WheelCanvasProps {
    pub segments: Rc<Vec<Segment>>,
    #[prop_or_default]
    pub spin: Option<SpinOrder>,
    pub on_spin_complete: Callback<()>,
    pub on_spin_failed: Callback<WheelError>,
    #[prop_or_default]
    pub style: WheelStyle,
}

pub fn device_pixel_ratio() -> f64 {
    window().map(|w| w.device_pixel_ratio()).filter(|r| *r > 0.0).unwrap_or(1.0)
}

fn now_ms() -> f64 {
    window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or_else(js_sys::Date::now)
}

/// Draws every segment at `rotation` degrees. An empty table draws nothing.
pub fn draw_wheel(
    canvas: &HtmlCanvasElement,
    segments: &[Segment],
    rotation: f64,
    pixel_ratio: f64,
    style: &WheelStyle,
) -> Result<(), JsValue> {
    let context = canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
        .dyn_into::<CanvasRenderingContext2d>()?;

    if segments.is_empty() {
        context.set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0)?;
        context.clear_rect(0.0, 0.0, canvas.width() as f64, canvas.height() as f64);
        return Ok(());
    }

    let backing_size = (BASE_CANVAS_SIZE * pixel_ratio).round() as u32;
    if canvas.width() != backing_size || canvas.height() != backing_size {
        canvas.set_width(backing_size);
        canvas.set_height(backing_size);
    }
    context.set_transform(pixel_ratio, 0.0, 0.0, pixel_ratio, 0.0, 0.0)?;

    let scale = BASE_CANVAS_SIZE / DISPLAY_SIZE;
    let center = BASE_CANVAS_SIZE / 2.0;
    let radius = center - style.outer_border_width * scale - 10.0 * scale;

    context.clear_rect(0.0, 0.0, BASE_CANVAS_SIZE, BASE_CANVAS_SIZE);
    context.save();

    // Rotate around the center
    context.translate(center, center)?;
    context.rotate(rotation.to_radians())?;
    context.translate(-center, -center)?;

    let count = segments.len();
    for (index, segment) in segments.iter().enumerate() {
        let (start, end, mid) = segment_arc(index, count);

        context.begin_path();
        context.move_to(center, center);
        context.arc(center, center, radius, start, end)?;
        context.close_path();
        context.set_fill_style_str(&segment.fill_color);
        context.fill();

        context.begin_path();
        context.move_to(center, center);
        context.line_to(center + radius * start.cos(), center + radius * start.sin());
        context.set_stroke_style_str(&style.radius_line_color);
        context.set_line_width(style.radius_line_width * scale);
        context.stroke();

        context.save();
        let text_radius = radius * LABEL_RADIUS_RATIO;
        context.translate(center + text_radius * mid.cos(), center + text_radius * mid.sin())?;
        context.rotate(mid)?;
        context.set_fill_style_str(&segment.text_color);
        context.set_font(&format!("{} {}px Inter, sans-serif", style.font_weight, style.font_size * scale));
        context.set_text_align("center");
        context.set_text_baseline("middle");
        context.set_image_smoothing_enabled(true);
        context.fill_text(&segment.label, 0.0, 0.0)?;
        context.restore();
    }

    context.begin_path();
    context.arc(center, center, radius, 0.0, 2.0 * PI)?;
    context.set_stroke_style_str(&style.outer_border_color);
    context.set_line_width(style.outer_border_width * scale);
    context.stroke();

    context.begin_path();
    context.arc(center, center, style.inner_radius * 8.0 * scale, 0.0, 2.0 * PI)?;
    context.set_fill_style_str(HUB_COLOR);
    context.fill();
    context.set_stroke_style_str(&style.inner_border_color);
    context.set_line_width(style.inner_border_width * scale);
    context.stroke();

    context.restore();
    Ok(())
}

/// One in-flight spin. Owns the frame loop and the single completion call.
struct SpinTask {
    canvas_ref: NodeRef,
    segments: Rc<Vec<Segment>>,
    style: WheelStyle,
    animation: Rc<RefCell<WheelAnimation>>,
    frame: Rc<RefCell<Option<AnimationFrame>>>,
    settle: Rc<RefCell<Option<Timeout>>>,
    completion: RefCell<Option<Callback<()>>>,
}

impl SpinTask {
    fn draw(&self, rotation: f64) {
        if let Some(canvas) = self.canvas_ref.cast::<HtmlCanvasElement>() {
            if let Err(e) = draw_wheel(&canvas, &self.segments, rotation, device_pixel_ratio(), &self.style) {
                log::error!("Failed to draw wheel: {:?}", e);
            }
        }
    }

    // Let the last frame paint before the caller opens any modal
    fn finish(&self) {
        let Some(on_complete) = self.completion.borrow_mut().take() else {
            return;
        };
        let timeout = Timeout::new(SPIN_SETTLE_DELAY_MS, move || on_complete.emit(()));
        *self.settle.borrow_mut() = Some(timeout);
    }
}

fn schedule_frame(task: Rc<SpinTask>) {
    let next = Rc::clone(&task);
    let handle = request_animation_frame(move |_| {
        let frame = next.animation.borrow_mut().tick(now_ms());
        next.draw(frame.rotation());
        match frame {
            Frame::Moving(_) => schedule_frame(Rc::clone(&next)),
            Frame::Settled(_) => next.finish(),
            Frame::Idle(_) => {}
        }
    });
    *task.frame.borrow_mut() = Some(handle);
}

#[function_component(WheelCanvas)]
pub fn wheel_canvas(props: &WheelCanvasProps) -> Html {
    let canvas_ref = use_node_ref();
    let animation = use_mut_ref(WheelAnimation::new);
    let frame = use_mut_ref(|| None::<AnimationFrame>);
    let settle = use_mut_ref(|| None::<Timeout>);
    let pixel_ratio = use_state(device_pixel_ratio);

    // Track device pixel ratio changes (zoom, moving between screens)
    {
        let pixel_ratio = pixel_ratio.clone();
        use_effect_with((), move |_| {
            let listener = window().map(|window| {
                EventListener::new(&window, "resize", move |_| pixel_ratio.set(device_pixel_ratio()))
            });
            move || drop(listener)
        });
    }

    // Stop the frame loop and any pending completion when unmounted
    {
        let frame = frame.clone();
        let settle = settle.clone();
        use_effect_with((), move |_| {
            move || {
                frame.borrow_mut().take();
                settle.borrow_mut().take();
            }
        });
    }

    // Redraw at rest whenever the inputs change; a running spin owns the canvas
    {
        let canvas_ref = canvas_ref.clone();
        let animation = animation.clone();
        use_effect_with(
            (props.segments.clone(), *pixel_ratio, props.style.clone()),
            move |(segments, pixel_ratio, style)| {
                let canvas = canvas_ref
                    .cast::<HtmlCanvasElement>()
                    .filter(|_| !animation.borrow().is_spinning());
                if let Some(canvas) = canvas {
                    let rotation = animation.borrow().rotation();
                    if let Err(e) = draw_wheel(&canvas, segments, rotation, *pixel_ratio, style) {
                        log::error!("Failed to draw wheel: {:?}", e);
                    }
                }
                || ()
            },
        );
    }

    {
        let canvas_ref = canvas_ref.clone();
        let style = props.style.clone();
        let on_spin_complete = props.on_spin_complete.clone();
        let on_spin_failed = props.on_spin_failed.clone();
        use_effect_with(props.spin.clone(), move |spin| {
            if let Some(order) = spin {
                let extra_turns = random_extra_turns(&mut rand::thread_rng());
                let started = start_spin(&mut animation.borrow_mut(), order, extra_turns, now_ms());

                match started {
                    Ok(SpinStart::Started { target_rotation }) => {
                        log::debug!(
                            "Spin {} to segment {} ({} extra turns, target {:.1}°)",
                            order.id, order.target_index, extra_turns, target_rotation
                        );
                        schedule_frame(Rc::new(SpinTask {
                            canvas_ref,
                            segments: order.segments.clone(),
                            style,
                            animation,
                            frame,
                            settle,
                            completion: RefCell::new(Some(on_spin_complete)),
                        }));
                    }
                    Ok(SpinStart::Ignored) => {
                        log::debug!("Spin {} ignored, wheel already spinning", order.id);
                    }
                    Err(e) => {
                        log::error!("Spin {} refused: {}", order.id, e);
                        on_spin_failed.emit(e);
                    }
                }
            }
            || ()
        });
    }

    html! {
        <div
            class="relative"
            style={format!("width: {0}px; height: {0}px;", DISPLAY_SIZE)}
        >
            <canvas
                ref={canvas_ref}
                style="width: 100%; height: 100%; image-rendering: auto;"
            />
            <svg
                class="absolute left-1/2 -translate-x-1/2 z-10"
                style="top: -10px; width: 26px; height: 26px;"
                viewBox="0 0 24 24"
                xmlns="http://www.w3.org/2000/svg"
            >
                <polygon points="12,24 24,0 0,0" fill={POINTER_COLOR} />
            </svg>
        </div>
    }
}
