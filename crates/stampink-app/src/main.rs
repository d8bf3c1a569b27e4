//! Main application entry point.

fn main() {
    env_logger::init();
    log::info!("Starting StampInk");

    if let Err(e) = stampink_app::App::run() {
        log::error!("Event loop error: {e}");
        std::process::exit(1);
    }
}
