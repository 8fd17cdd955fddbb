use std::f64::consts::PI;
use std::fmt;
use rand::Rng;
use crate::constants::{EXTRA_TURN_SPREAD, MIN_EXTRA_TURNS, SPIN_DURATION_MS};

pub const FULL_TURN: f64 = 360.0;

#[derive(Debug, Clone, PartialEq)]
pub enum WheelError {
    EmptyWheel,
    IndexOutOfRange { index: usize, len: usize },
}

impl fmt::Display for WheelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WheelError::EmptyWheel => write!(f, "cannot spin a wheel without segments"),
            WheelError::IndexOutOfRange { index, len } => {
                write!(f, "segment {} is out of range for a {}-segment wheel", index, len)
            }
        }
    }
}

impl std::error::Error for WheelError {}

/// Degrees covered by each of `count` segments.
pub fn segment_angle(count: usize) -> f64 {
    FULL_TURN / count as f64
}

/// Rotation that puts the center of `target_index` under the pointer at 12 o'clock.
pub fn target_rotation(target_index: usize, count: usize) -> f64 {
    let per_segment = segment_angle(count);
    -(target_index as f64 * per_segment + per_segment / 2.0)
}

/// Same resting segment as [`target_rotation`], with `extra_turns` full turns on top.
pub fn spin_destination(target_index: usize, count: usize, extra_turns: u32) -> f64 {
    target_rotation(target_index, count) - extra_turns as f64 * FULL_TURN
}

pub fn random_extra_turns<R: Rng + ?Sized>(rng: &mut R) -> u32 {
    MIN_EXTRA_TURNS + rng.gen_range(0..EXTRA_TURN_SPREAD)
}

/// Cubic ease-out. Input is clamped to `[0, 1]`.
pub fn ease_out_cubic(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t).powi(3)
}

pub fn normalize_rotation(rotation: f64) -> f64 {
    rotation.rem_euclid(FULL_TURN)
}

/// Index of the segment currently under the pointer.
pub fn segment_under_pointer(rotation: f64, count: usize) -> Option<usize> {
    if count == 0 {
        return None;
    }
    let wheel_angle = normalize_rotation(-rotation);
    let index = (wheel_angle / segment_angle(count)).floor() as usize;
    Some(index.min(count - 1))
}

/// Canvas arc of a segment in radians: `(start, end, mid)`.
/// Segment 0 starts at 12 o'clock and segments proceed clockwise.
pub fn segment_arc(index: usize, count: usize) -> (f64, f64, f64) {
    let per_segment = 2.0 * PI / count as f64;
    let start = index as f64 * per_segment - PI / 2.0;
    (start, start + per_segment, start + per_segment / 2.0)
}

#[derive(Debug, Clone, PartialEq)]
pub enum SpinStart {
    Started { target_rotation: f64 },
    /// A spin is already in flight; nothing changed.
    Ignored,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Frame {
    Idle(f64),
    Moving(f64),
    /// Last frame of a spin. Returned exactly once per spin.
    Settled(f64),
}

impl Frame {
    pub fn rotation(&self) -> f64 {
        match *self {
            Frame::Idle(r) | Frame::Moving(r) | Frame::Settled(r) => r,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Flight {
    start_rotation: f64,
    target_rotation: f64,
    started_at_ms: f64,
    target_index: usize,
}

/// Rotation state of one wheel. Time is passed in by the caller so the
/// animation can be driven by animation frames or by tests alike.
#[derive(Debug, Clone, PartialEq)]
pub struct WheelAnimation {
    rotation: f64,
    flight: Option<Flight>,
}

impl Default for WheelAnimation {
    fn default() -> Self {
        Self::new()
    }
}

impl WheelAnimation {
    pub fn new() -> Self {
        Self {
            rotation: 0.0,
            flight: None,
        }
    }

    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    pub fn is_spinning(&self) -> bool {
        self.flight.is_some()
    }

    pub fn target_rotation(&self) -> Option<f64> {
        self.flight.as_ref().map(|f| f.target_rotation)
    }

    pub fn target_index(&self) -> Option<usize> {
        self.flight.as_ref().map(|f| f.target_index)
    }

    pub fn spin_to(
        &mut self,
        target_index: usize,
        segment_count: usize,
        extra_turns: u32,
        now_ms: f64,
    ) -> Result<SpinStart, WheelError> {
        if segment_count == 0 {
            return Err(WheelError::EmptyWheel);
        }
        if self.flight.is_some() {
            return Ok(SpinStart::Ignored);
        }
        if target_index >= segment_count {
            return Err(WheelError::IndexOutOfRange { index: target_index, len: segment_count });
        }

        let target_rotation = spin_destination(target_index, segment_count, extra_turns);
        self.flight = Some(Flight {
            start_rotation: self.rotation,
            target_rotation,
            started_at_ms: now_ms,
            target_index,
        });
        Ok(SpinStart::Started { target_rotation })
    }

    pub fn tick(&mut self, now_ms: f64) -> Frame {
        let Some(flight) = &self.flight else {
            return Frame::Idle(self.rotation);
        };

        let progress = ((now_ms - flight.started_at_ms) / SPIN_DURATION_MS).clamp(0.0, 1.0);
        if progress >= 1.0 {
            self.rotation = normalize_rotation(flight.target_rotation);
            self.flight = None;
            return Frame::Settled(self.rotation);
        }

        let eased = ease_out_cubic(progress);
        self.rotation = flight.start_rotation + (flight.target_rotation - flight.start_rotation) * eased;
        Frame::Moving(self.rotation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn run_to_end(wheel: &mut WheelAnimation, start_ms: f64) -> f64 {
        let mut now = start_ms;
        loop {
            now += 16.0;
            if let Frame::Settled(r) = wheel.tick(now) {
                return r;
            }
        }
    }

    #[test]
    fn test_three_segment_example() {
        assert_eq!(target_rotation(1, 3), -180.0);
        assert_eq!(normalize_rotation(spin_destination(1, 3, 5)), 180.0);
        assert_eq!(segment_under_pointer(-180.0, 3), Some(1));
    }

    #[test]
    fn test_lands_on_target_from_any_start() {
        for count in 1..=16 {
            for target in 0..count {
                for turns in 5..=7 {
                    let mut wheel = WheelAnimation::new();
                    // Start from wherever the previous spin left us
                    wheel.spin_to((target + 1) % count, count, 5, 0.0).unwrap();
                    run_to_end(&mut wheel, 0.0);

                    wheel.spin_to(target, count, turns, 10_000.0).unwrap();
                    let rest = run_to_end(&mut wheel, 10_000.0);

                    assert!((0.0..360.0).contains(&rest));
                    assert_eq!(segment_under_pointer(rest, count), Some(target));
                    let center = normalize_rotation(target_rotation(target, count));
                    assert!((rest - center).abs() < 1e-9);
                }
            }
        }
    }

    #[test]
    fn test_spin_while_spinning_is_ignored() {
        let mut wheel = WheelAnimation::new();
        let first = wheel.spin_to(2, 6, 6, 0.0).unwrap();
        let target = wheel.target_rotation();
        wheel.tick(1000.0);
        let mid = wheel.rotation();

        assert_eq!(wheel.spin_to(4, 6, 7, 1000.0), Ok(SpinStart::Ignored));
        assert_eq!(wheel.target_rotation(), target);
        assert_eq!(wheel.target_index(), Some(2));
        assert_eq!(wheel.rotation(), mid);
        assert!(matches!(first, SpinStart::Started { .. }));
    }

    #[test]
    fn test_settled_is_reported_once() {
        let mut wheel = WheelAnimation::new();
        wheel.spin_to(0, 4, 5, 0.0).unwrap();
        assert!(matches!(wheel.tick(4000.0), Frame::Settled(_)));
        assert!(matches!(wheel.tick(4016.0), Frame::Idle(_)));
        assert!(!wheel.is_spinning());
    }

    #[test]
    fn test_rejects_bad_input() {
        let mut wheel = WheelAnimation::new();
        assert_eq!(wheel.spin_to(0, 0, 5, 0.0), Err(WheelError::EmptyWheel));
        assert_eq!(
            wheel.spin_to(6, 6, 5, 0.0),
            Err(WheelError::IndexOutOfRange { index: 6, len: 6 })
        );
        assert!(!wheel.is_spinning());
    }

    #[test]
    fn test_easing_curve() {
        assert_eq!(ease_out_cubic(0.0), 0.0);
        assert_eq!(ease_out_cubic(1.0), 1.0);
        assert_eq!(ease_out_cubic(0.5), 0.875);
        assert_eq!(ease_out_cubic(2.0), 1.0);
        assert_eq!(ease_out_cubic(-1.0), 0.0);
    }

    #[test]
    fn test_rotation_follows_eased_progress() {
        let mut wheel = WheelAnimation::new();
        let SpinStart::Started { target_rotation } = wheel.spin_to(1, 3, 5, 100.0).unwrap() else {
            panic!("spin did not start");
        };
        assert_eq!(target_rotation, -180.0 - 1800.0);
        let frame = wheel.tick(2100.0);
        assert_eq!(frame, Frame::Moving(target_rotation * 0.875));
    }

    #[test]
    fn test_extra_turns_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let turns = random_extra_turns(&mut rng);
            assert!((5..=7).contains(&turns));
        }
    }

    #[test]
    fn test_segment_arc_starts_at_top() {
        let (start, end, mid) = segment_arc(0, 4);
        assert!((start + PI / 2.0).abs() < 1e-12);
        assert!(end.abs() < 1e-12);
        assert!((mid + PI / 4.0).abs() < 1e-12);
    }
}
