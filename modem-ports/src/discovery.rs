//! Discovery of candidate serial devices.
//!
//! A candidate is any entry of the device directory whose name contains one
//! of the configured markers. Names come back in the order the directory
//! listing produced them; nothing is sorted or cached.

use crate::{
    config::PortConfig,
    error::{Error, Result},
    tracing::prelude::*,
};

/// List candidate devices in `/dev` whose names contain `tty.usbmodem`.
pub fn list_candidate_ports() -> Result<Vec<String>> {
    list_candidate_ports_with(&PortConfig::default())
}

/// List candidate devices using the given configuration.
///
/// Fails with [`Error::Scan`] if the directory can't be read. Entries whose
/// names aren't valid UTF-8 are skipped.
pub fn list_candidate_ports_with(config: &PortConfig) -> Result<Vec<String>> {
    let dir = &config.device_dir;
    debug!("Scanning {} for {:?}.", dir.display(), config.markers);

    let scan_err = |source| Error::Scan {
        dir: dir.clone(),
        source,
    };

    let mut names = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(scan_err)? {
        let entry = entry.map_err(scan_err)?;
        match entry.file_name().into_string() {
            Ok(name) => names.push(name),
            Err(name) => trace!("Skipping non-UTF-8 entry {name:?}."),
        }
    }

    let candidates = filter_candidates(names, config);
    debug!("Found {} candidate port(s).", candidates.len());
    Ok(candidates)
}

/// Keep the names `config` treats as candidates, preserving their order.
pub fn filter_candidates<I>(names: I, config: &PortConfig) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    names
        .into_iter()
        .filter(|name| config.is_candidate(name))
        .collect()
}
