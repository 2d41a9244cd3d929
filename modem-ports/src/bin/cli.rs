//! Command-line interface for modem-ports.
//!
//! Prints the name of each candidate USB modem device, one per line. Takes
//! no arguments; configuration comes from the environment (see
//! [`PortConfig::from_env`]).

use anyhow::{Context, Result};
use modem_ports::tracing::{self, prelude::*};
use modem_ports::{list_candidate_ports_with, PortConfig};

fn main() -> Result<()> {
    tracing::init_journald_or_stderr();

    let config = PortConfig::from_env().context("invalid configuration")?;
    let ports = list_candidate_ports_with(&config)?;
    if ports.is_empty() {
        debug!("No candidate ports in {}.", config.device_dir.display());
    }

    for port in ports {
        println!("{port}");
    }

    Ok(())
}
