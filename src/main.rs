use anyhow::Result;
use mariposa::core::geometry::{Offset, Point, Rect, Size};
use mariposa::core::positioner::{Anchor, ConstraintAdjustment, Gravity, Positioner};
use mariposa::platform::{HeadlessPlatform, Platform};

fn main() -> Result<()> {
    // Initialize logging
    // Set default log level to info
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info,mariposa=debug");
    }
    // Initialize logging with standardized format
    tracing_subscriber::fmt()
        .with_timer(tracing_subscriber::fmt::time::ChronoLocal::new(
            "%Y-%m-%d %H:%M:%S".to_string(),
        ))
        .with_ansi(false)
        .init();

    // Headless demo: one virtual 1920x1080 monitor at 1x scale
    let mut app = HeadlessPlatform::new(Rect::new(0, 0, 1920, 1080), 1.0);
    app.initialize()?;
    app.run()?;

    let manager = app.manager.clone();
    let main_window =
        manager.create_regular_window("Main window", Point::new(10, 10), Size::new(640, 640))?;
    manager.create_regular_window("window #1", Point::new(650, 10), Size::new(400, 300))?;
    manager.create_regular_window("window #2", Point::new(650, 320), Size::new(400, 300))?;

    // Anchor a popup under the bottom-right of a rectangle in the main
    // window, sliding back on-screen if it would leave the monitor.
    let positioner = Positioner {
        anchor_rect: Rect::new(500, 500, 100, 40),
        anchor: Anchor::BottomRight,
        gravity: Gravity::BottomRight,
        offset: Offset::new(0, 4),
        constraint_adjustment: ConstraintAdjustment::SLIDE_X | ConstraintAdjustment::SLIDE_Y,
    };
    manager.create_popup_window("popup", &positioner, Size::new(240, 120), Some(main_window))?;

    for (method, payload) in app.sink.take_messages() {
        tracing::info!("{}: {}", method, payload);
    }

    // Tearing down the main window cascades to every other window
    manager.destroy_window(main_window, true);
    tracing::info!("{} window(s) remaining", manager.window_count());

    Ok(())
}
