//! Animation policy table: what each show and dismiss variant does to the
//! container, for how long, and along which curve.

use std::collections::VecDeque;
use std::time::Duration;

use crate::animation::{Completion, Stage};
use crate::layout::{Rect, Size};
use crate::transitions::{Easing, TransitionConfig};
use crate::tree::{Pose, ViewId};
use crate::types::{DismissVariant, ShowVariant, Transform};
use crate::ui::Ui;

pub const STANDARD_DURATION: Duration = Duration::from_millis(150);
pub const LONG_DURATION: Duration = Duration::from_millis(300);
/// First phase of the bounce-out variants.
pub const BOUNCE_OUT_LEAD: Duration = Duration::from_millis(130);
/// Second phase of the bounce-out variants.
pub const BOUNCE_OUT_EXIT: Duration = Duration::from_millis(260);
/// Spring duration of the bounce-in variants.
pub const BOUNCE_IN_DURATION: Duration = Duration::from_millis(600);

pub const BOUNCE_IN_VELOCITY: f64 = 15.0;
pub const DIRECTIONAL_BOUNCE_IN_VELOCITY: f64 = 10.0;
/// Distance a directional bounce-out first moves against its exit direction.
pub const BOUNCE_OFFSET: f64 = 40.0;

pub const GROW_IN_SCALE: f64 = 0.85;
pub const SHRINK_IN_SCALE: f64 = 1.25;
pub const BOUNCE_IN_SCALE: f64 = 0.1;
pub const GROW_OUT_SCALE: f64 = 1.1;
pub const SHRINK_OUT_SCALE: f64 = 0.8;
pub const BOUNCE_OUT_PEAK_SCALE: f64 = 1.1;
pub const BOUNCE_OUT_END_SCALE: f64 = 0.1;

/// Timing of the backdrop fade on show (unmasked) and on dismiss.
pub fn backdrop_fade() -> TransitionConfig {
    TransitionConfig::new(STANDARD_DURATION, Easing::Linear)
}

/// How a show variant brings the container in: the pose applied at once,
/// then the stage animated to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShowPlan {
    pub start: Pose,
    pub stage: Stage,
}

/// How a dismiss variant takes the container out. Bounce variants run a
/// second stage after the first completes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DismissPlan {
    pub stage: Stage,
    pub settle: Option<Stage>,
}

impl DismissPlan {
    pub fn stages(&self) -> Vec<Stage> {
        std::iter::once(self.stage).chain(self.settle).collect()
    }
}

/// Frame moved so it sits just past one edge of `bounds`.
fn off_top(frame: Rect) -> Rect {
    Rect { y: -frame.height, ..frame }
}

fn off_bottom(frame: Rect, bounds: Size) -> Rect {
    Rect { y: bounds.height, ..frame }
}

fn off_left(frame: Rect) -> Rect {
    Rect { x: -frame.width, ..frame }
}

fn off_right(frame: Rect, bounds: Size) -> Rect {
    Rect { x: bounds.width, ..frame }
}

impl ShowVariant {
    pub fn duration(self) -> Duration {
        match self {
            ShowVariant::None => Duration::ZERO,
            ShowVariant::FadeIn | ShowVariant::GrowIn | ShowVariant::ShrinkIn => STANDARD_DURATION,
            ShowVariant::SlideInFromTop
            | ShowVariant::SlideInFromBottom
            | ShowVariant::SlideInFromLeft
            | ShowVariant::SlideInFromRight => LONG_DURATION,
            ShowVariant::BounceIn
            | ShowVariant::BounceInFromTop
            | ShowVariant::BounceInFromBottom
            | ShowVariant::BounceInFromLeft
            | ShowVariant::BounceInFromRight => BOUNCE_IN_DURATION,
        }
    }

    pub fn easing(self) -> Easing {
        match self {
            ShowVariant::None | ShowVariant::FadeIn => Easing::Linear,
            ShowVariant::GrowIn
            | ShowVariant::ShrinkIn
            | ShowVariant::SlideInFromTop
            | ShowVariant::SlideInFromBottom
            | ShowVariant::SlideInFromLeft
            | ShowVariant::SlideInFromRight => Easing::EaseOut,
            ShowVariant::BounceIn => Easing::spring(BOUNCE_IN_VELOCITY),
            ShowVariant::BounceInFromTop
            | ShowVariant::BounceInFromBottom
            | ShowVariant::BounceInFromLeft
            | ShowVariant::BounceInFromRight => Easing::spring(DIRECTIONAL_BOUNCE_IN_VELOCITY),
        }
    }

    /// Initial spring velocity, zero for non-spring variants.
    pub fn spring_velocity(self) -> f64 {
        match self.easing() {
            Easing::Spring { velocity, .. } => velocity,
            _ => 0.0,
        }
    }

    pub fn timing(self) -> TransitionConfig {
        TransitionConfig::new(self.duration(), self.easing())
    }

    /// Plan the show animation toward `frame` inside a surface of size
    /// `bounds`. `None` for [`ShowVariant::None`].
    pub fn plan(self, frame: Rect, bounds: Size) -> Option<ShowPlan> {
        let identity = Transform::IDENTITY;
        let (start, end) = match self {
            ShowVariant::None => return None,
            ShowVariant::FadeIn => (
                Pose::new().frame(frame).transform(identity).alpha(0.0),
                Pose::new().alpha(1.0),
            ),
            ShowVariant::GrowIn | ShowVariant::ShrinkIn | ShowVariant::BounceIn => {
                let scale = match self {
                    ShowVariant::GrowIn => GROW_IN_SCALE,
                    ShowVariant::ShrinkIn => SHRINK_IN_SCALE,
                    _ => BOUNCE_IN_SCALE,
                };
                (
                    Pose::new()
                        .frame(frame)
                        .transform(Transform::uniform(scale))
                        .alpha(0.0),
                    Pose::new().transform(identity).alpha(1.0),
                )
            }
            ShowVariant::SlideInFromTop
            | ShowVariant::SlideInFromBottom
            | ShowVariant::SlideInFromLeft
            | ShowVariant::SlideInFromRight
            | ShowVariant::BounceInFromTop
            | ShowVariant::BounceInFromBottom
            | ShowVariant::BounceInFromLeft
            | ShowVariant::BounceInFromRight => {
                let offscreen = match self {
                    ShowVariant::SlideInFromTop | ShowVariant::BounceInFromTop => off_top(frame),
                    ShowVariant::SlideInFromBottom | ShowVariant::BounceInFromBottom => {
                        off_bottom(frame, bounds)
                    }
                    ShowVariant::SlideInFromLeft | ShowVariant::BounceInFromLeft => off_left(frame),
                    _ => off_right(frame, bounds),
                };
                (
                    Pose::new().frame(offscreen).transform(identity).alpha(1.0),
                    Pose::new().frame(frame),
                )
            }
        };
        Some(ShowPlan {
            start,
            stage: Stage {
                timing: self.timing(),
                pose: end,
            },
        })
    }
}

impl DismissVariant {
    /// Duration of the first (for most variants, only) stage.
    pub fn duration(self) -> Duration {
        match self {
            DismissVariant::None => Duration::ZERO,
            DismissVariant::FadeOut | DismissVariant::GrowOut | DismissVariant::ShrinkOut => {
                STANDARD_DURATION
            }
            DismissVariant::SlideOutToTop
            | DismissVariant::SlideOutToBottom
            | DismissVariant::SlideOutToLeft
            | DismissVariant::SlideOutToRight => LONG_DURATION,
            DismissVariant::BounceOut
            | DismissVariant::BounceOutToTop
            | DismissVariant::BounceOutToBottom
            | DismissVariant::BounceOutToLeft
            | DismissVariant::BounceOutToRight => BOUNCE_OUT_LEAD,
        }
    }

    pub fn easing(self) -> Easing {
        match self {
            DismissVariant::None | DismissVariant::FadeOut => Easing::Linear,
            _ => Easing::EaseOut,
        }
    }

    /// Dismiss variants never spring.
    pub fn spring_velocity(self) -> f64 {
        0.0
    }

    pub fn is_bounce(self) -> bool {
        matches!(
            self,
            DismissVariant::BounceOut
                | DismissVariant::BounceOutToTop
                | DismissVariant::BounceOutToBottom
                | DismissVariant::BounceOutToLeft
                | DismissVariant::BounceOutToRight
        )
    }

    pub fn timing(self) -> TransitionConfig {
        TransitionConfig::new(self.duration(), self.easing())
    }

    /// Timing of the second stage, for bounce variants.
    pub fn settle_timing(self) -> Option<TransitionConfig> {
        self.is_bounce()
            .then(|| TransitionConfig::new(BOUNCE_OUT_EXIT, Easing::EaseIn))
    }

    /// Total time from the first stage starting to the last one ending.
    pub fn total_duration(self) -> Duration {
        self.duration() + self.settle_timing().map_or(Duration::ZERO, |t| t.duration)
    }

    /// Plan the dismiss animation for a container at `frame` inside a
    /// surface of size `bounds`. `None` for [`DismissVariant::None`].
    pub fn plan(self, frame: Rect, bounds: Size) -> Option<DismissPlan> {
        let faded = |scale: f64| Pose::new().transform(Transform::uniform(scale)).alpha(0.0);
        let (first, second) = match self {
            DismissVariant::None => return None,
            DismissVariant::FadeOut => (Pose::new().alpha(0.0), None),
            DismissVariant::GrowOut => (faded(GROW_OUT_SCALE), None),
            DismissVariant::ShrinkOut => (faded(SHRINK_OUT_SCALE), None),
            DismissVariant::SlideOutToTop => (Pose::new().frame(off_top(frame)), None),
            DismissVariant::SlideOutToBottom => (Pose::new().frame(off_bottom(frame, bounds)), None),
            DismissVariant::SlideOutToLeft => (Pose::new().frame(off_left(frame)), None),
            DismissVariant::SlideOutToRight => (Pose::new().frame(off_right(frame, bounds)), None),
            DismissVariant::BounceOut => (
                Pose::new().transform(Transform::uniform(BOUNCE_OUT_PEAK_SCALE)),
                Some(faded(BOUNCE_OUT_END_SCALE)),
            ),
            DismissVariant::BounceOutToTop => (
                Pose::new().frame(frame.offset(0.0, BOUNCE_OFFSET)),
                Some(Pose::new().frame(off_top(frame))),
            ),
            DismissVariant::BounceOutToBottom => (
                Pose::new().frame(frame.offset(0.0, -BOUNCE_OFFSET)),
                Some(Pose::new().frame(off_bottom(frame, bounds))),
            ),
            DismissVariant::BounceOutToLeft => (
                Pose::new().frame(frame.offset(BOUNCE_OFFSET, 0.0)),
                Some(Pose::new().frame(off_left(frame))),
            ),
            DismissVariant::BounceOutToRight => (
                Pose::new().frame(frame.offset(-BOUNCE_OFFSET, 0.0)),
                Some(Pose::new().frame(off_right(frame, bounds))),
            ),
        };
        let settle = second
            .zip(self.settle_timing())
            .map(|(pose, timing)| Stage { timing, pose });
        Some(DismissPlan {
            stage: Stage {
                timing: self.timing(),
                pose: first,
            },
            settle,
        })
    }
}

/// Run stages one after another on `view`. `completion` fires once, after
/// the last stage, with that stage's finished flag.
pub fn run_stages(ui: &Ui, view: ViewId, stages: Vec<Stage>, completion: Completion) {
    run_chain(ui, view, VecDeque::from(stages), completion);
}

fn run_chain(ui: &Ui, view: ViewId, mut stages: VecDeque<Stage>, completion: Completion) {
    let Some(stage) = stages.pop_front() else {
        completion(ui, true);
        return;
    };
    if stages.is_empty() {
        ui.animator().animate(ui, view, stage, Some(completion));
        return;
    }
    ui.animator().animate(
        ui,
        view,
        stage,
        Some(Box::new(move |ui, _finished| {
            run_chain(ui, view, stages, completion)
        })),
    );
}
