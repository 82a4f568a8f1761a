#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use popkit::{
    Animator, Completion, Overlay, OverlayDelegate, Pose, Rect, Size, Stage, Ui, ViewId,
    WindowLevel,
};

pub const SCREEN: Size = Size::new(400.0, 800.0);

/// Screen-sized context with one normal window.
pub fn setup() -> (Rc<Ui>, ViewId) {
    let ui = Ui::new(SCREEN);
    let window = ui.add_window(WindowLevel::Normal);
    (ui, window)
}

/// Same, with a recording animator installed.
pub fn setup_recording() -> (Rc<Ui>, ViewId, Rc<RecordingAnimator>) {
    let animator = Rc::new(RecordingAnimator::default());
    let ui = Ui::with_animator(SCREEN, animator.clone());
    let window = ui.add_window(WindowLevel::Normal);
    (ui, window, animator)
}

pub fn content(ui: &Ui, width: f64, height: f64) -> ViewId {
    ui.tree_mut().add_view(Rect::new(0.0, 0.0, width, height))
}

pub fn ms(millis: u64) -> Duration {
    Duration::from_millis(millis)
}

/// Animator that applies every pose at once, completes on the next tick and
/// remembers what it was asked to do.
#[derive(Default)]
pub struct RecordingAnimator {
    animated: RefCell<Vec<(ViewId, Stage)>>,
    instant: RefCell<Vec<(ViewId, Pose)>>,
    completions: Rc<Cell<usize>>,
}

impl RecordingAnimator {
    pub fn animated(&self) -> Vec<(ViewId, Stage)> {
        self.animated.borrow().clone()
    }

    pub fn stages_for(&self, view: ViewId) -> Vec<Stage> {
        self.animated
            .borrow()
            .iter()
            .filter(|(v, _)| *v == view)
            .map(|(_, stage)| *stage)
            .collect()
    }

    pub fn instant_for(&self, view: ViewId) -> Vec<Pose> {
        self.instant
            .borrow()
            .iter()
            .filter(|(v, _)| *v == view)
            .map(|(_, pose)| *pose)
            .collect()
    }

    /// Completions the animator has invoked so far.
    pub fn completions(&self) -> usize {
        self.completions.get()
    }

    pub fn clear(&self) {
        self.animated.borrow_mut().clear();
        self.instant.borrow_mut().clear();
    }
}

impl Animator for RecordingAnimator {
    fn animate(&self, ui: &Ui, view: ViewId, stage: Stage, completion: Option<Completion>) {
        self.animated.borrow_mut().push((view, stage));
        ui.tree_mut().apply_pose(view, &stage.pose);
        if let Some(completion) = completion {
            let counter = Rc::clone(&self.completions);
            ui.defer(move |ui| {
                counter.set(counter.get() + 1);
                completion(ui, true);
            });
        }
    }

    fn perform_without_animation(&self, ui: &Ui, view: ViewId, pose: &Pose) {
        self.instant.borrow_mut().push((view, *pose));
        ui.tree_mut().apply_pose(view, pose);
    }
}

/// Delegate that logs every lifecycle callback.
#[derive(Default)]
pub struct Recorder {
    events: RefCell<Vec<&'static str>>,
}

impl Recorder {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn events(&self) -> Vec<&'static str> {
        self.events.borrow().clone()
    }

    pub fn count(&self, event: &str) -> usize {
        self.events.borrow().iter().filter(|e| **e == event).count()
    }
}

impl OverlayDelegate for Recorder {
    fn will_start_showing(&self, _overlay: &Overlay) {
        self.events.borrow_mut().push("will_start_showing");
    }

    fn did_finish_showing(&self, _overlay: &Overlay) {
        self.events.borrow_mut().push("did_finish_showing");
    }

    fn will_start_dismissing(&self, _overlay: &Overlay) {
        self.events.borrow_mut().push("will_start_dismissing");
    }

    fn did_finish_dismissing(&self, _overlay: &Overlay) {
        self.events.borrow_mut().push("did_finish_dismissing");
    }
}

/// Overlay around fresh content of the given size, with a recorder attached.
pub fn overlay_with_recorder(ui: &Rc<Ui>, width: f64, height: f64) -> (Overlay, Rc<Recorder>) {
    let content = content(ui, width, height);
    let overlay = Overlay::new(ui, content).expect("content exists");
    let recorder = Recorder::new();
    overlay.set_delegate(&recorder);
    (overlay, recorder)
}
