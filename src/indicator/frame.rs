//! Presentation instructions computed from the shared state

use std::time::Duration;

use crate::state::{Expression, Presentation};

/// Eye color of the face indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EyeColor {
    Cyan,
    DeepSkyBlue,
    Yellow,
    Red,
}

impl EyeColor {
    pub fn name(self) -> &'static str {
        match self {
            EyeColor::Cyan => "cyan",
            EyeColor::DeepSkyBlue => "deep sky blue",
            EyeColor::Yellow => "yellow",
            EyeColor::Red => "red",
        }
    }
}

/// Mouth shape of the face indicator
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Mouth {
    Flat,
    Frown,
    /// Speaking; openness in `0.0..1.0`
    Talking(f32),
}

/// One rendering instruction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndicatorFrame {
    pub eyes: EyeColor,
    pub mouth: Mouth,
}

impl IndicatorFrame {
    /// Pure function of the snapshot and the time since the ticker started
    pub fn compute(presentation: Presentation, elapsed: Duration) -> Self {
        let eyes = match presentation.expression {
            Expression::Neutral => EyeColor::Cyan,
            Expression::Listening => EyeColor::DeepSkyBlue,
            Expression::Processing => EyeColor::Yellow,
            Expression::Error => EyeColor::Red,
        };

        let mouth = if presentation.is_active {
            // Opens and closes twenty times a second
            Mouth::Talking((elapsed.as_secs_f64() * 20.0).fract() as f32)
        } else if presentation.expression == Expression::Error {
            Mouth::Frown
        } else {
            Mouth::Flat
        };

        Self { eyes, mouth }
    }

    /// Same shape, ignoring the talking animation phase
    pub fn same_shape(&self, other: &Self) -> bool {
        self.eyes == other.eyes
            && std::mem::discriminant(&self.mouth) == std::mem::discriminant(&other.mouth)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn presentation(expression: Expression, is_active: bool) -> Presentation {
        Presentation {
            expression,
            is_active,
        }
    }

    #[test]
    fn test_eye_colors() {
        let cases = [
            (Expression::Neutral, EyeColor::Cyan),
            (Expression::Listening, EyeColor::DeepSkyBlue),
            (Expression::Processing, EyeColor::Yellow),
            (Expression::Error, EyeColor::Red),
        ];
        for (expression, eyes) in cases {
            let frame = IndicatorFrame::compute(presentation(expression, false), Duration::ZERO);
            assert_eq!(frame.eyes, eyes);
        }
    }

    #[test]
    fn test_error_frowns_unless_talking() {
        let idle = IndicatorFrame::compute(presentation(Expression::Error, false), Duration::ZERO);
        assert_eq!(idle.mouth, Mouth::Frown);

        let talking = IndicatorFrame::compute(presentation(Expression::Error, true), Duration::ZERO);
        assert!(matches!(talking.mouth, Mouth::Talking(_)));
    }

    #[test]
    fn test_talking_mouth_moves_with_time() {
        let speaking = presentation(Expression::Neutral, true);
        let a = IndicatorFrame::compute(speaking, Duration::from_millis(10));
        let b = IndicatorFrame::compute(speaking, Duration::from_millis(30));

        let (Mouth::Talking(x), Mouth::Talking(y)) = (a.mouth, b.mouth) else {
            panic!("expected talking mouths");
        };
        assert!((0.0..1.0).contains(&x));
        assert!((0.0..1.0).contains(&y));
        assert!(x != y);
        assert!(a.same_shape(&b));
    }

    #[test]
    fn test_talking_mouth_moves_after_long_uptime() {
        let speaking = presentation(Expression::Neutral, true);
        let ten_days = Duration::from_secs(10 * 24 * 60 * 60);

        let frame = IndicatorFrame::compute(speaking, ten_days + Duration::from_millis(25));
        let Mouth::Talking(openness) = frame.mouth else {
            panic!("expected a talking mouth");
        };
        assert!((openness - 0.5).abs() < 0.01, "openness {openness}");
    }

    #[test]
    fn test_frame_is_stateless() {
        let p = presentation(Expression::Processing, false);
        let t = Duration::from_millis(1234);
        assert_eq!(IndicatorFrame::compute(p, t), IndicatorFrame::compute(p, t));
    }
}
