use crate::fetcher::ingestor::Ingestor;
use anyhow::Context;
use anyhow::Error;
use blobsync_lib::api::celenium::CeleniumClient;
use blobsync_lib::config::Config;
use blobsync_lib::database::handler::DatabaseClient;
use log::error;
use log::info;
use simplelog::CombinedLogger;
use simplelog::*;
use std::process::ExitCode;
use std::time::Duration;

mod fetcher;
mod signal;
extern crate log;
extern crate simplelog;

fn main() -> ExitCode {
    if let Err(why) = init_logger() {
        eprintln!("Could not initialize logger; {why:#}");
        return ExitCode::FAILURE;
    }

    ExitCode::from(report(run()))
}

fn init_logger() -> Result<(), Error> {
    CombinedLogger::init(vec![
        TermLogger::new(
            LevelFilter::max(),
            ConfigBuilder::new()
                .add_filter_allow_str("blobsync")
                .set_time_format_str("[%d.%m.%Y; %T]")
                .build(),
            TerminalMode::Mixed,
            ColorChoice::Auto,
        ),
        WriteLogger::new(
            LevelFilter::Debug,
            ConfigBuilder::new()
                .add_filter_allow_str("blobsync")
                .set_time_format_str("[%d.%m.%Y; %T]")
                .build(),
            std::fs::OpenOptions::new().create(true).append(true).open("blobsync.log")?,
        ),
    ])?;

    Ok(())
}

fn run() -> Result<(), Error> {
    // Without a working destination there is nothing meaningful to do, hence any startup error is fatal
    let (client, dbc, poll_interval) = startup()?;
    let shutdown = signal::shutdown_channel().context("Could not register signal handlers")?;

    info!("Polling every {} seconds", poll_interval.as_secs());
    Ingestor::new(client, dbc, poll_interval).run(&shutdown);
    info!("Stopped");

    Ok(())
}

fn startup() -> Result<(CeleniumClient, DatabaseClient, Duration), Error> {
    let config = Config::new().context("Could not read configuration")?;

    let dbc = DatabaseClient::new(&config.database).context("Could not connect to PostgreSQL")?;
    dbc.ping().context("Could not connect to PostgreSQL")?;
    dbc.ensure_schema().context("Could not create table")?;

    let client = CeleniumClient::new(&config.api).context("Could not create Celenium client")?;

    Ok((client, dbc, config.poll_interval))
}

/// Logs a fatal error exactly once and turns the result into the process exit status.
fn report(result: Result<(), Error>) -> u8 {
    match result {
        Ok(()) => 0,
        Err(why) => {
            error!("{why:#}");
            1
        }
    }
}
