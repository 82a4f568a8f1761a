use std::fs::File;
use std::rc::Rc;
use std::time::Duration;

use popkit::{
    DismissVariant, Easing, KeyboardInfo, MaskVariant, Notification, Orientation, Overlay,
    OverlayConfig, OverlayDelegate, Point, Rect, ShowVariant, Size, Ui, WindowLevel,
};
use simplelog::{Config, LevelFilter, WriteLogger};

struct Printer;

impl OverlayDelegate for Printer {
    fn will_start_showing(&self, overlay: &Overlay) {
        println!("{} will start showing", overlay.view());
    }

    fn did_finish_showing(&self, overlay: &Overlay) {
        println!("{} did finish showing", overlay.view());
    }

    fn will_start_dismissing(&self, overlay: &Overlay) {
        println!("{} will start dismissing", overlay.view());
    }

    fn did_finish_dismissing(&self, overlay: &Overlay) {
        println!("{} did finish dismissing", overlay.view());
    }
}

fn main() -> std::io::Result<()> {
    let log_file = File::create("showcase.log")?;
    WriteLogger::init(LevelFilter::Debug, Config::default(), log_file)
        .expect("Failed to initialize logger");

    let ui = Ui::new(Size::new(390.0, 844.0));
    ui.add_window(WindowLevel::Normal);

    let content = ui.tree_mut().add_view(Rect::new(0.0, 0.0, 280.0, 160.0));
    let overlay = Overlay::new(&ui, content)
        .expect("content view exists")
        .with_config(
            OverlayConfig::new()
                .show(ShowVariant::BounceIn)
                .dismiss(DismissVariant::BounceOut)
                .mask(MaskVariant::Dimmed(0.6))
                .handles_keyboard(true),
        );
    let printer = Rc::new(Printer);
    overlay.set_delegate(&printer);

    // Bounce in, stay up for two seconds, bounce out.
    overlay.show_for(Duration::from_secs(2));
    for _ in 0..6 {
        ui.advance(Duration::from_millis(100));
        print_container(&ui, &overlay);
    }

    let keyboard = KeyboardInfo::new(
        Duration::from_millis(250),
        Easing::EaseOut,
        Rect::new(0.0, 544.0, 390.0, 300.0),
    );
    ui.post(Notification::KeyboardWillShow(keyboard));
    ui.advance(Duration::from_millis(300));
    ui.post(Notification::KeyboardDidShow(keyboard));
    print_container(&ui, &overlay);

    ui.post(Notification::KeyboardWillHide(keyboard));
    ui.post(Notification::KeyboardDidHide(keyboard));
    ui.set_orientation(Orientation::LandscapeLeft);
    ui.advance(Duration::from_millis(300));
    print_container(&ui, &overlay);
    ui.set_orientation(Orientation::Portrait);

    ui.settle();
    println!("state after auto-dismiss: {:?}", overlay.state());

    // Tap outside the content to dismiss.
    overlay.set_config(overlay.config().dismiss(DismissVariant::SlideOutToBottom));
    overlay.show();
    ui.settle();
    let hit = ui.hit_test(Point::new(10.0, 10.0));
    println!("tap on backdrop hit {:?}, state {:?}", hit, overlay.state());
    ui.settle();
    println!("state after tap: {:?}", overlay.state());

    Ok(())
}

fn print_container(ui: &Ui, overlay: &Overlay) {
    let tree = ui.tree();
    println!(
        "t={:>5}ms {:?} frame={:?} alpha={:?}",
        ui.now().as_millis(),
        overlay.state(),
        tree.visual_frame(overlay.container()),
        tree.alpha(overlay.container()),
    );
}
