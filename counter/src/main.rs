use log::*;
use visit_counter::{display, Options, VisitCounter};

/// Counts one page load and prints the visitor label.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let options = Options::from_env()?;
    debug!("Starting with {options:?}");

    // The composition root owns the one counter for the process lifetime.
    let counter = VisitCounter::open(&options);

    info!("{}", display::LOADING_LABEL);
    let result = counter.record_visit().await;
    if let Some(e) = &result.error {
        warn!("Showing a made-up count: {e}");
    }
    println!("{}", display::render(&result, options.environment));

    if options.environment.is_development() {
        let health = counter.check_health().await;
        info!(
            "available = {}, count = {}, reason = {}",
            health.available, health.count, health.reason
        );
    }

    Ok(())
}
