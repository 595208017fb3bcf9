//! Forwards SIGINT / SIGTERM to the ingestion loop.

use log::info;
use signal_hook::consts::SIGINT;
use signal_hook::consts::SIGTERM;
use signal_hook::iterator::Signals;
use std::sync::mpsc;
use std::sync::mpsc::Receiver;

/// Returns a receiver getting a message for every termination signal the process receives.
pub fn shutdown_channel() -> Result<Receiver<()>, std::io::Error> {
    let (tx, rx) = mpsc::channel();
    let mut signals = Signals::new([SIGINT, SIGTERM])?;

    std::thread::spawn(move || {
        for signal in signals.forever() {
            info!("Received signal {signal}, stopping after the current cycle");

            // Receiver is gone, i.e. the loop already returned
            if tx.send(()).is_err() {
                break;
            }
        }
    });

    Ok(rx)
}
