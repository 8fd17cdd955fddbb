use std::fmt;
use serde::{Serialize, Deserialize};
use crate::constants::*;
use crate::shared_wheel_game::{Segment, SpinResult};

/// Page-level spin cycle: `Ready -> Requesting -> Spinning -> Revealing -> Ready`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpinPhase {
    Ready,
    Requesting,
    Spinning,
    Revealing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutcomeKind {
    Hidden,
    Win,
    Lose,
    Error,
    InsufficientFunds,
}

/// What the outcome panel shows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutcomeStatus {
    pub kind: OutcomeKind,
    pub message: String,
    pub prize: Option<String>,
}

impl OutcomeStatus {
    pub fn hidden() -> Self {
        Self { kind: OutcomeKind::Hidden, message: String::new(), prize: None }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self { kind: OutcomeKind::Error, message: message.into(), prize: None }
    }

    pub fn insufficient_funds() -> Self {
        Self {
            kind: OutcomeKind::InsufficientFunds,
            message: INSUFFICIENT_FUNDS_MESSAGE.to_string(),
            prize: None,
        }
    }

    fn from_result(result: &SpinResult) -> Self {
        let prize = Some(result.prize_label.clone()).filter(|p| !p.is_empty());
        if result.is_win {
            Self { kind: OutcomeKind::Win, message: String::new(), prize }
        } else {
            Self { kind: OutcomeKind::Lose, message: String::new(), prize }
        }
    }

    pub fn is_visible(&self) -> bool {
        self.kind != OutcomeKind::Hidden
    }
}

/// Local reasons a spin never reaches the network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpinRejection {
    AlreadySpinning,
    Busy,
    NoCoins,
    NotLoaded,
    MissingToken,
    MissingPlace,
}

impl fmt::Display for SpinRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            SpinRejection::AlreadySpinning => "a spin is already in progress",
            SpinRejection::Busy => "page is still loading",
            SpinRejection::NoCoins => "no coins left",
            SpinRejection::NotLoaded => "segment table not loaded",
            SpinRejection::MissingToken => "anti-forgery token missing",
            SpinRejection::MissingPlace => "place id missing",
        };
        f.write_str(text)
    }
}

impl std::error::Error for SpinRejection {}

/// Why the spin round-trip did not produce a result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpinFailure {
    /// Non-2xx answer, with the server's `error` text if it sent one.
    Server { message: Option<String> },
    /// 2xx answer with `success: false`.
    Rejected { message: Option<String> },
    /// Request threw, timed out or could not be decoded.
    Transport,
}

impl SpinFailure {
    fn user_message(&self) -> String {
        match self {
            SpinFailure::Server { message } => message.clone().unwrap_or_else(|| SPIN_FAILED_ERROR.to_string()),
            SpinFailure::Rejected { message } => message.clone().unwrap_or_else(|| SPIN_REJECTED_ERROR.to_string()),
            SpinFailure::Transport => CONNECTION_ERROR.to_string(),
        }
    }
}

/// Snapshot of the page inputs a spin depends on.
#[derive(Debug, Clone, Copy)]
pub struct SpinContext<'a> {
    pub coins: i64,
    pub segments: &'a [Segment],
    pub loading: bool,
    pub csrf_token: Option<&'a str>,
    pub place_id: Option<&'a str>,
}

/// Everything needed to issue the spin request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpinTicket {
    pub place_id: String,
    pub csrf_token: String,
}

/// How the landing segment was chosen from a server result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetIndex {
    Authoritative(usize),
    LabelFallback(usize),
    Defaulted,
}

impl TargetIndex {
    pub fn index(self) -> usize {
        match self {
            TargetIndex::Authoritative(i) | TargetIndex::LabelFallback(i) => i,
            TargetIndex::Defaulted => 0,
        }
    }
}

/// Picks the segment the wheel must land on. The server index wins whenever it
/// is in range; matching the prize label is only a recovery path.
pub fn resolve_target_index(result: &SpinResult, segments: &[Segment]) -> TargetIndex {
    if let Ok(index) = usize::try_from(result.segment_index) {
        if index < segments.len() {
            return TargetIndex::Authoritative(index);
        }
    }

    if !result.prize_label.is_empty() {
        if let Some(index) = segments.iter().position(|s| s.label == result.prize_label) {
            log::warn!(
                "Server segment index {} outside {}-segment table, matched prize label {:?} at {}",
                result.segment_index, segments.len(), result.prize_label, index
            );
            return TargetIndex::LabelFallback(index);
        }
    }

    log::warn!(
        "Server segment index {} outside {}-segment table and prize {:?} not found, defaulting to 0",
        result.segment_index, segments.len(), result.prize_label
    );
    TargetIndex::Defaulted
}

/// What to do once the wheel has stopped.
#[derive(Debug, Clone, PartialEq)]
pub struct Reveal {
    pub outcome: OutcomeStatus,
    pub refresh_segments: bool,
}

/// Single owner of the spin cycle. The page forwards user input, network
/// answers and animation completion; the flow decides what is shown.
#[derive(Debug, Clone, PartialEq)]
pub struct SpinFlow {
    phase: SpinPhase,
    result: Option<SpinResult>,
    outcome: OutcomeStatus,
}

impl Default for SpinFlow {
    fn default() -> Self {
        Self::new()
    }
}

impl SpinFlow {
    pub fn new() -> Self {
        Self {
            phase: SpinPhase::Ready,
            result: None,
            outcome: OutcomeStatus::hidden(),
        }
    }

    pub fn phase(&self) -> SpinPhase {
        self.phase
    }

    pub fn outcome(&self) -> &OutcomeStatus {
        &self.outcome
    }

    pub fn result(&self) -> Option<&SpinResult> {
        self.result.as_ref()
    }

    pub fn is_spinning(&self) -> bool {
        self.phase == SpinPhase::Spinning
    }

    /// True while a spin cycle is in progress and new spins are inert.
    pub fn is_busy(&self) -> bool {
        matches!(self.phase, SpinPhase::Requesting | SpinPhase::Spinning)
    }

    pub fn request_spin(&mut self, ctx: &SpinContext<'_>) -> Result<SpinTicket, SpinRejection> {
        match self.phase {
            SpinPhase::Requesting => return Err(SpinRejection::Busy),
            SpinPhase::Spinning => return Err(SpinRejection::AlreadySpinning),
            SpinPhase::Revealing => return Err(SpinRejection::Busy),
            SpinPhase::Ready => {}
        }
        if ctx.loading {
            return Err(SpinRejection::Busy);
        }
        if ctx.coins <= 0 {
            self.outcome = OutcomeStatus::insufficient_funds();
            return Err(SpinRejection::NoCoins);
        }
        if ctx.segments.is_empty() {
            return Err(SpinRejection::NotLoaded);
        }
        let Some(csrf_token) = ctx.csrf_token.filter(|t| !t.is_empty()) else {
            self.outcome = OutcomeStatus::error(SECURITY_ERROR);
            return Err(SpinRejection::MissingToken);
        };
        let Some(place_id) = ctx.place_id.filter(|p| !p.is_empty()) else {
            self.outcome = OutcomeStatus::error(MISSING_PLACE_ERROR);
            return Err(SpinRejection::MissingPlace);
        };

        self.phase = SpinPhase::Requesting;
        self.result = None;
        self.outcome = OutcomeStatus::hidden();
        Ok(SpinTicket {
            place_id: place_id.to_string(),
            csrf_token: csrf_token.to_string(),
        })
    }

    /// Feeds the backend answer in. Returns the segment index the wheel must
    /// spin to, or `None` when the cycle ended without a spin.
    pub fn on_spin_response(
        &mut self,
        response: Result<SpinResult, SpinFailure>,
        segments: &[Segment],
    ) -> Option<usize> {
        if self.phase != SpinPhase::Requesting {
            log::warn!("Spin response arrived in phase {:?}, ignoring", self.phase);
            return None;
        }

        let failure = match response {
            Ok(result) if !result.success => SpinFailure::Rejected { message: None },
            Ok(result) if segments.is_empty() => {
                log::error!("Spin result {:?} arrived with no segments to land on", result);
                self.outcome = OutcomeStatus::error(MISSING_RESULT_ERROR);
                self.phase = SpinPhase::Ready;
                return None;
            }
            Ok(result) => {
                let target = resolve_target_index(&result, segments).index();
                if segments[target].is_win != result.is_win {
                    log::warn!(
                        "Segment {} ({:?}) has is_win={} but server says is_win={}, trusting the server",
                        target, segments[target].label, segments[target].is_win, result.is_win
                    );
                }
                self.result = Some(result);
                self.phase = SpinPhase::Spinning;
                return Some(target);
            }
            Err(failure) => failure,
        };

        log::warn!("Spin failed: {:?}", failure);
        self.outcome = OutcomeStatus::error(failure.user_message());
        self.phase = SpinPhase::Ready;
        None
    }

    /// The wheel stopped. Reveals the stored result, never what the wheel shows.
    pub fn on_animation_complete(&mut self) -> Reveal {
        let stored = match (self.phase, self.result.as_ref()) {
            (SpinPhase::Spinning, Some(result)) => Some(result),
            _ => None,
        };

        let Some(result) = stored else {
            log::error!("Wheel finished in phase {:?} without a spin result", self.phase);
            self.outcome = OutcomeStatus::error(MISSING_RESULT_ERROR);
            self.phase = SpinPhase::Ready;
            self.result = None;
            return Reveal { outcome: self.outcome.clone(), refresh_segments: false };
        };

        self.outcome = OutcomeStatus::from_result(result);
        let refresh_segments = result.is_win;
        self.phase = SpinPhase::Revealing;
        Reveal { outcome: self.outcome.clone(), refresh_segments }
    }

    /// The wheel refused to start (empty table or bad index).
    pub fn on_animation_failed(&mut self) {
        if self.phase != SpinPhase::Spinning {
            return;
        }
        self.outcome = OutcomeStatus::error(MISSING_RESULT_ERROR);
        self.phase = SpinPhase::Ready;
        self.result = None;
    }

    /// Surfaces an error that happened outside a spin (e.g. token fetch).
    pub fn report_error(&mut self, message: impl Into<String>) {
        if self.is_busy() {
            return;
        }
        self.outcome = OutcomeStatus::error(message);
    }

    pub fn dismiss(&mut self) {
        self.outcome = OutcomeStatus::hidden();
        if self.phase == SpinPhase::Revealing {
            self.phase = SpinPhase::Ready;
            self.result = None;
        }
    }

    /// Leaving the page drops any half-finished cycle.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}
