//! Headless host of a voxsim world.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

pub mod config;
pub mod host;

use host::Host;


pub fn main() {

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let running = Arc::new(AtomicBool::new(true));
    let handler_running = Arc::clone(&running);
    if let Err(e) = ctrlc::set_handler(move || handler_running.store(false, Ordering::Relaxed)) {
        error!("failed to set ctrl-c handler: {e}");
        return;
    }

    let mut host = match Host::new() {
        Ok(host) => host,
        Err(e) => {
            error!("failed to open the save store: {e}");
            return;
        }
    };

    host.load_or_generate();
    info!("running, press ctrl-c to stop");

    while running.load(Ordering::Relaxed) {
        host.tick_padded();
    }

    info!("stopping...");
    host.stop();

}
