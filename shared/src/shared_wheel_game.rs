use serde::{Serialize, Deserialize};
use serde_json::Value;
use crate::constants::*;

/// One wedge of the prize wheel, ready to draw.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Segment {
    pub label: String,
    pub is_win: bool,
    pub fill_color: String,
    pub text_color: String,
}

/// The backend's authoritative decision for a single spin.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SpinResult {
    pub success: bool,
    pub is_win: bool,
    pub prize_label: String,
    /// Raw index from the server. Not trusted until checked against the segment table.
    pub segment_index: i64,
}

// === API Types ===

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WheelSpinRequest {
    pub place_id: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct WheelSpinResponse {
    pub success: bool,
    #[serde(default)]
    pub is_win: bool,
    #[serde(default)]
    pub prize: Option<String>,
    #[serde(default)]
    pub prize_number: Option<i64>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Default)]
pub struct ErrorResponse {
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CsrfTokenResponse {
    pub csrf_token: String,
}

impl From<WheelSpinResponse> for SpinResult {
    fn from(resp: WheelSpinResponse) -> Self {
        Self {
            success: resp.success,
            is_win: resp.is_win,
            prize_label: resp.prize.unwrap_or_default(),
            // A missing index is as bad as an out-of-range one
            segment_index: resp.prize_number.unwrap_or(-1),
        }
    }
}

impl Segment {
    pub fn new(index: usize, label: impl Into<String>, is_win: bool) -> Self {
        let palette: &[&str] = if is_win { &WIN_SEGMENT_COLORS } else { &LOSE_SEGMENT_COLORS };
        Self {
            label: label.into(),
            is_win,
            fill_color: palette[index % palette.len()].to_string(),
            text_color: SEGMENT_TEXT_COLOR.to_string(),
        }
    }
}

/// Turns whatever the wheel-data endpoint returned into a drawable table.
///
/// Non-array or empty payloads become [`DEFAULT_SEGMENT_COUNT`] losing
/// "try again" wedges so the wheel always has something to render.
pub fn normalize_segments(data: &Value) -> Vec<Segment> {
    let entries: &[Value] = match data {
        Value::Array(items) if !items.is_empty() => items.as_slice(),
        Value::Array(_) => &[],
        other => {
            log::warn!("Wheel data is not an array ({}), using default segments", kind_of(other));
            &[]
        }
    };

    if entries.is_empty() {
        return default_segments();
    }

    entries
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let is_win = item.get("isWin").map(is_truthy).unwrap_or(false);
            let label = item
                .get("option")
                .and_then(display_label)
                .unwrap_or_else(|| DEFAULT_SEGMENT_LABEL.to_string());
            Segment::new(index, label, is_win)
        })
        .collect()
}

pub fn default_segments() -> Vec<Segment> {
    (0..DEFAULT_SEGMENT_COUNT)
        .map(|i| Segment::new(i, DEFAULT_SEGMENT_LABEL, false))
        .collect()
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(false, |f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

// Labels the backend sends as numbers or booleans are shown as text;
// empty or structured values fall back to the default label.
fn display_label(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                (i != 0).then(|| i.to_string())
            } else {
                n.as_f64().filter(|f| *f != 0.0).map(|f| f.to_string())
            }
        }
        Value::Bool(true) => Some("true".to_string()),
        _ => None,
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
