use std::time::Duration;

/// Damping ratio shared by every spring the overlay animations use.
pub const SPRING_DAMPING: f64 = 0.8;

/// Residual displacement at which a spring counts as settled.
const SPRING_SETTLE: f64 = 0.001;

/// Timing of a single animation: how long it runs and how it eases.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransitionConfig {
    pub duration: Duration,
    pub easing: Easing,
}

impl TransitionConfig {
    pub fn new(duration: Duration, easing: Easing) -> Self {
        Self { duration, easing }
    }

    /// Zero-duration timing. Animations with it complete on the next frame.
    pub fn instant() -> Self {
        Self::new(Duration::ZERO, Easing::Linear)
    }
}

/// Easing function for transitions.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum Easing {
    #[default]
    Linear,
    EaseIn,
    EaseOut,
    EaseInOut,
    /// Damped spring. `damping` is the damping ratio (1.0 = critical);
    /// `velocity` is the initial velocity in animated distances per second.
    Spring { damping: f64, velocity: f64 },
}

impl Easing {
    pub const fn spring(velocity: f64) -> Self {
        Self::Spring {
            damping: SPRING_DAMPING,
            velocity,
        }
    }

    /// Apply easing to progress (0.0 to 1.0).
    ///
    /// Springs read their velocity as distances per unit of progress here;
    /// use [`Easing::sample`] when the real duration is known.
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::EaseIn => t * t,
            Easing::EaseOut => 1.0 - (1.0 - t) * (1.0 - t),
            Easing::EaseInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
            Easing::Spring { damping, velocity } => spring(t, damping, velocity),
        }
    }

    /// Eased progress for an animation of the given duration.
    pub fn sample(self, t: f64, duration: Duration) -> f64 {
        match self {
            Easing::Spring { damping, velocity } => {
                Easing::Spring {
                    damping,
                    velocity: velocity * duration.as_secs_f64(),
                }
                .apply(t)
            }
            other => other.apply(t),
        }
    }

    pub const fn is_spring(self) -> bool {
        matches!(self, Easing::Spring { .. })
    }
}

/// Unit step response of a damped spring, scaled so that it settles by t = 1.
fn spring(t: f64, damping: f64, velocity: f64) -> f64 {
    if t >= 1.0 {
        return 1.0;
    }
    let damping = damping.max(0.05);
    // Natural frequency chosen so the envelope decays to SPRING_SETTLE at t = 1.
    let omega = -SPRING_SETTLE.ln() / damping.min(1.0);
    let decay = (-damping * omega * t).exp();

    if damping < 1.0 {
        let omega_d = omega * (1.0 - damping * damping).sqrt();
        let b = (damping * omega - velocity) / omega_d;
        1.0 - decay * ((omega_d * t).cos() + b * (omega_d * t).sin())
    } else {
        1.0 - decay * (1.0 + (omega - velocity) * t)
    }
}
