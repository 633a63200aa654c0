//! Periodic triangular envelopes driving the synthetic expressions.
//!
//! Each expression repeats every `interval` frames and is active for the
//! first `duration` frames of each cycle, rising linearly to a peak at
//! `duration / 2` and falling back. Pure functions of the frame index and
//! the run configuration.

use gf_core::config::{ExpressionTiming, FaceConfig};
use gf_core::face::AnimationState;

/// Closed set of synthetic expressions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Expression {
    /// Upper eyelids close toward the eye centre.
    Blink,
    /// Mouth corners move outward and up.
    Smile,
    /// Eyebrows translate upward.
    EyebrowRaise,
}

impl Expression {
    /// Every expression, in application order.
    pub const ALL: [Self; 3] = [Self::Blink, Self::Smile, Self::EyebrowRaise];

    /// Configured cycle of this expression.
    #[must_use]
    pub fn timing(self, face: &FaceConfig) -> ExpressionTiming {
        match self {
            Self::Blink => face.blink,
            Self::Smile => face.smile,
            Self::EyebrowRaise => face.eyebrow,
        }
    }

    /// Intensity at `frame_index` of a `total_frames` sequence, in [0, 1].
    ///
    /// # Example
    /// ```
    /// use gf_core::config::{ExpressionTiming, FaceConfig};
    /// use gf_face::waveform::Expression;
    ///
    /// let face = FaceConfig { smile: ExpressionTiming::new(10, 4), ..FaceConfig::default() };
    /// assert_eq!(Expression::Smile.intensity(2, 20, &face), 1.0);
    /// assert_eq!(Expression::Smile.intensity(5, 20, &face), 0.0);
    /// ```
    #[must_use]
    pub fn intensity(self, frame_index: usize, total_frames: usize, face: &FaceConfig) -> f32 {
        if frame_index >= total_frames {
            return 0.0;
        }
        envelope(frame_index, self.timing(face))
    }

    /// Read this expression's intensity from a state.
    #[must_use]
    pub fn of(self, state: &AnimationState) -> f32 {
        match self {
            Self::Blink => state.blink,
            Self::Smile => state.smile,
            Self::EyebrowRaise => state.eyebrow_raise,
        }
    }

    fn store(self, state: &mut AnimationState, value: f32) {
        match self {
            Self::Blink => state.blink = value,
            Self::Smile => state.smile = value,
            Self::EyebrowRaise => state.eyebrow_raise = value,
        }
    }
}

/// Triangular pulse for one cycle timing.
///
/// `phase = frame mod interval`; zero once `phase >= duration`, otherwise
/// `1 - |phase - duration/2| / (duration/2)` clamped to [0, 1].
#[must_use]
pub fn envelope(frame_index: usize, timing: ExpressionTiming) -> f32 {
    if timing.interval == 0 || timing.duration == 0 {
        return 0.0;
    }
    let phase = (frame_index as u64 % u64::from(timing.interval)) as f32;
    let duration = timing.duration as f32;
    if phase >= duration {
        return 0.0;
    }
    let half = duration / 2.0;
    (1.0 - (phase - half).abs() / half).clamp(0.0, 1.0)
}

/// Free-function form of [`Expression::intensity`].
#[must_use]
pub fn intensity(
    expression: Expression,
    frame_index: usize,
    total_frames: usize,
    face: &FaceConfig,
) -> f32 {
    expression.intensity(frame_index, total_frames, face)
}

/// Evaluate every expression for one frame.
///
/// # Example
/// ```
/// use gf_core::config::FaceConfig;
/// use gf_face::waveform::animation_state;
///
/// let state = animation_state(0, 10, &FaceConfig::default());
/// assert!(state.is_rest());
/// ```
#[must_use]
pub fn animation_state(frame_index: usize, total_frames: usize, face: &FaceConfig) -> AnimationState {
    let mut state = AnimationState::REST;
    for expression in Expression::ALL {
        expression.store(
            &mut state,
            expression.intensity(frame_index, total_frames, face),
        );
    }
    state
}

#[cfg(test)]
mod tests {
    use super::*;

    fn face_with(blink: ExpressionTiming) -> FaceConfig {
        FaceConfig {
            blink,
            ..FaceConfig::default()
        }
    }

    #[test]
    fn blink_interval_4_duration_2_over_10_frames() {
        let face = face_with(ExpressionTiming::new(4, 2));
        let got: Vec<f32> = (0..10)
            .map(|f| Expression::Blink.intensity(f, 10, &face))
            .collect();
        // Peak at phase duration/2 = 1, zero at the cycle edge.
        assert_eq!(got, vec![0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn bounded_and_zero_outside_window() {
        for interval in 1..=12u32 {
            for duration in 1..=14u32 {
                let timing = ExpressionTiming::new(interval, duration);
                for f in 0..60usize {
                    let v = envelope(f, timing);
                    assert!((0.0..=1.0).contains(&v), "{v} for {timing:?} f={f}");
                    if (f as u32 % interval) >= duration {
                        assert_eq!(v, 0.0, "{timing:?} f={f}");
                    }
                }
            }
        }
    }

    #[test]
    fn triangular_shape() {
        let timing = ExpressionTiming::new(8, 4);
        let got: Vec<f32> = (0..8).map(|f| envelope(f, timing)).collect();
        assert_eq!(got, vec![0.0, 0.5, 1.0, 0.5, 0.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn single_frame_duration_never_fires() {
        let timing = ExpressionTiming::new(3, 1);
        assert!((0..9).all(|f| envelope(f, timing) == 0.0));
    }

    #[test]
    fn deterministic() {
        let face = FaceConfig::default();
        for f in 0..300 {
            assert_eq!(animation_state(f, 300, &face), animation_state(f, 300, &face));
        }
    }

    #[test]
    fn expressions_are_independent_and_may_overlap() {
        let face = FaceConfig {
            blink: ExpressionTiming::new(6, 4),
            smile: ExpressionTiming::new(6, 4),
            eyebrow: ExpressionTiming::new(7, 2),
            ..FaceConfig::default()
        };
        let s = animation_state(2, 20, &face);
        assert_eq!(s.blink, 1.0);
        assert_eq!(s.smile, 1.0);
        assert_eq!(s.eyebrow_raise, 0.0);
        let s = animation_state(8, 20, &face);
        assert_eq!(s.eyebrow_raise, 1.0);
    }

    #[test]
    fn frame_outside_sequence_is_rest() {
        let face = face_with(ExpressionTiming::new(4, 2));
        assert_eq!(Expression::Blink.intensity(1, 1, &face), 0.0);
        assert_eq!(intensity(Expression::Blink, 1, 2, &face), 1.0);
    }
}
