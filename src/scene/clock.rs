//! Monotonic animation clock.

/// Elapsed scene time that never runs backwards
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AnimationClock {
    elapsed_s: f32,
}

impl AnimationClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn elapsed_s(&self) -> f32 {
        self.elapsed_s
    }

    /// Move to host time `t`; earlier or non-finite values are ignored
    pub fn advance_to(&mut self, t: f32) -> f32 {
        if t.is_finite() && t > self.elapsed_s {
            self.elapsed_s = t;
        }
        self.elapsed_s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_is_monotonic() {
        let mut clock = AnimationClock::new();
        assert_eq!(clock.advance_to(1.5), 1.5);
        assert_eq!(clock.advance_to(0.5), 1.5);
        assert_eq!(clock.advance_to(f32::NAN), 1.5);
        assert_eq!(clock.advance_to(f32::INFINITY), 1.5);
        assert_eq!(clock.advance_to(2.0), 2.0);
    }
}
