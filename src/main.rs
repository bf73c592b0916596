use desk_clock::app::ClockApp;
use desk_clock::config::{AppPaths, Config};
use desk_clock::constant;
use desk_clock::ui;
use tracing::error;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> eframe::Result {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        error!("Panic: {}", info);
        default_hook(info);
    }));

    let settings = Config::default().settings;
    let paths = AppPaths::resolve();
    let options = ui::viewport::build_viewport(&settings);

    eframe::run_native(
        constant::DEFAULT_WINDOW_TITLE,
        options,
        Box::new(|cc| Ok(Box::new(ClockApp::new(cc, settings, paths)))),
    )
}
