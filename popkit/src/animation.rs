//! Animation engine.
//!
//! Overlays never touch timing directly; they hand a target [`Pose`] and a
//! [`TransitionConfig`] to the [`Animator`] installed on the [`Ui`]. The
//! default [`Timeline`] interpolates on the run loop's clock. Hosts and tests
//! can install their own.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::time::Duration;

use crate::layout::lerp;
use crate::transitions::{Easing, TransitionConfig};
use crate::tree::{Pose, ViewId};
use crate::ui::Ui;

/// Called once when an animation ends. The flag is false when the animation
/// was cut short by another one on the same properties or the view went away.
pub type Completion = Box<dyn FnOnce(&Ui, bool)>;

/// One animation step: where a view should end up and how to get there.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stage {
    pub timing: TransitionConfig,
    pub pose: Pose,
}

impl Stage {
    pub fn new(duration: Duration, easing: Easing, pose: Pose) -> Self {
        Self {
            timing: TransitionConfig::new(duration, easing),
            pose,
        }
    }

    pub fn duration(&self) -> Duration {
        self.timing.duration
    }

    pub fn easing(&self) -> Easing {
        self.timing.easing
    }
}

/// Drives property animations on views.
///
/// Completions must never run synchronously inside [`Animator::animate`];
/// they run from a later tick, either deferred or from [`Animator::step`].
pub trait Animator {
    /// Animate `view` from its current values to `stage.pose`.
    fn animate(&self, ui: &Ui, view: ViewId, stage: Stage, completion: Option<Completion>);

    /// Apply a pose immediately.
    fn perform_without_animation(&self, ui: &Ui, view: ViewId, pose: &Pose) {
        ui.tree_mut().apply_pose(view, pose);
    }

    /// Advance running animations to `now`. Called once per tick.
    fn step(&self, _ui: &Ui, _now: Duration) {}

    fn is_animating(&self) -> bool {
        false
    }
}

struct Active {
    view: ViewId,
    from: Pose,
    to: Pose,
    start: Duration,
    timing: TransitionConfig,
    completion: Option<Completion>,
}

impl Active {
    fn progress(&self, now: Duration) -> f64 {
        if self.timing.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_sub(self.start);
        (elapsed.as_secs_f64() / self.timing.duration.as_secs_f64()).min(1.0)
    }

    fn interpolated(&self, eased: f64) -> Pose {
        Pose {
            frame: self
                .from
                .frame
                .zip(self.to.frame)
                .map(|(from, to)| from.lerp(&to, eased)),
            alpha: self
                .from
                .alpha
                .zip(self.to.alpha)
                .map(|(from, to)| lerp(from, to, eased)),
            transform: self
                .from
                .transform
                .zip(self.to.transform)
                .map(|(from, to)| from.lerp(&to, eased)),
        }
    }
}

/// Time-based animator driven by the run loop.
///
/// Starting an animation on properties that are already animating replaces
/// the old animation; it continues from the current values and the old
/// completion fires with `false`.
#[derive(Default)]
pub struct Timeline {
    active: RefCell<Vec<Active>>,
    reduced_motion: Cell<bool>,
}

impl fmt::Debug for Timeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Timeline")
            .field("active", &self.active.borrow().len())
            .field("reduced_motion", &self.reduced_motion.get())
            .finish()
    }
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable reduced motion (accessibility).
    /// When enabled, every animation jumps to its end values.
    pub fn set_reduced_motion(&self, enabled: bool) {
        self.reduced_motion.set(enabled);
    }

    pub fn reduced_motion(&self) -> bool {
        self.reduced_motion.get()
    }

    pub fn active_count(&self) -> usize {
        self.active.borrow().len()
    }

    /// Drop running animations on `view` that touch any property in `pose`,
    /// returning their completions.
    fn interrupt(&self, view: ViewId, pose: &Pose) -> Vec<Completion> {
        let mut active = self.active.borrow_mut();
        let mut interrupted = Vec::new();
        let mut i = 0;
        while i < active.len() {
            if active[i].view == view && active[i].to.overlaps(pose) {
                let removed = active.remove(i);
                interrupted.extend(removed.completion);
            } else {
                i += 1;
            }
        }
        interrupted
    }
}

fn defer_completions(ui: &Ui, completions: Vec<Completion>, finished: bool) {
    for completion in completions {
        ui.defer(move |ui| completion(ui, finished));
    }
}

impl Animator for Timeline {
    fn animate(&self, ui: &Ui, view: ViewId, stage: Stage, completion: Option<Completion>) {
        let interrupted = self.interrupt(view, &stage.pose);
        if !interrupted.is_empty() {
            log::debug!("[timeline] {} interrupted {} animation(s)", view, interrupted.len());
        }
        defer_completions(ui, interrupted, false);

        let current = ui.tree().pose(view);
        let Some(current) = current else {
            log::warn!("[timeline] animate on missing view {}", view);
            defer_completions(ui, completion.into_iter().collect(), false);
            return;
        };

        if self.reduced_motion.get() || stage.timing.duration.is_zero() {
            ui.tree_mut().apply_pose(view, &stage.pose);
            defer_completions(ui, completion.into_iter().collect(), true);
            return;
        }

        let from = Pose {
            frame: stage.pose.frame.and(current.frame),
            alpha: stage.pose.alpha.and(current.alpha),
            transform: stage.pose.transform.and(current.transform),
        };
        log::debug!(
            "[timeline] {} start {:?} {:?}",
            view,
            stage.timing.duration,
            stage.timing.easing
        );
        self.active.borrow_mut().push(Active {
            view,
            from,
            to: stage.pose,
            start: ui.now(),
            timing: stage.timing,
            completion,
        });
    }

    fn perform_without_animation(&self, ui: &Ui, view: ViewId, pose: &Pose) {
        let interrupted = self.interrupt(view, pose);
        defer_completions(ui, interrupted, false);
        ui.tree_mut().apply_pose(view, pose);
    }

    fn step(&self, ui: &Ui, now: Duration) {
        let mut finished: Vec<(Option<Completion>, bool)> = Vec::new();
        {
            let mut active = self.active.borrow_mut();
            let mut tree = ui.tree_mut();
            active.retain_mut(|animation| {
                if !tree.contains(animation.view) {
                    finished.push((animation.completion.take(), false));
                    return false;
                }
                let progress = animation.progress(now);
                if progress >= 1.0 {
                    tree.apply_pose(animation.view, &animation.to);
                    finished.push((animation.completion.take(), true));
                    return false;
                }
                let eased = animation
                    .timing
                    .easing
                    .sample(progress, animation.timing.duration);
                tree.apply_pose(animation.view, &animation.interpolated(eased));
                true
            });
        }
        for (completion, done) in finished {
            if let Some(completion) = completion {
                completion(ui, done);
            }
        }
    }

    fn is_animating(&self) -> bool {
        !self.active.borrow().is_empty()
    }
}

/// Animator that applies every pose at once and completes on the next tick.
#[derive(Debug, Default, Clone, Copy)]
pub struct Immediate;

impl Animator for Immediate {
    fn animate(&self, ui: &Ui, view: ViewId, stage: Stage, completion: Option<Completion>) {
        ui.tree_mut().apply_pose(view, &stage.pose);
        if let Some(completion) = completion {
            ui.defer(move |ui| completion(ui, true));
        }
    }
}
