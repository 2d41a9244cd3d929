//! Opening serial devices.
//!
//! [`open_port`] and [`open_port_with`] return `None` when the device can't
//! be opened, discarding the reason. [`try_open_port`] is the same operation
//! with the failure kept as an [`OpenError`]. Opened handles are owned by the
//! caller and closed when dropped.

use crate::{
    config::PortConfig,
    error::OpenError,
    tracing::prelude::*,
};
use tokio_serial::{SerialPort, SerialPortBuilder, SerialPortBuilderExt, SerialStream};

/// Open `/dev/<name>` at 115200 baud with a one-second read timeout.
///
/// Returns `None` if the device can't be opened for any reason.
pub fn open_port(name: &str) -> Option<Box<dyn SerialPort>> {
    open_port_with(&PortConfig::default(), name)
}

/// Open `<device_dir>/<name>` using the given configuration.
///
/// Returns `None` if the device can't be opened for any reason.
pub fn open_port_with(config: &PortConfig, name: &str) -> Option<Box<dyn SerialPort>> {
    try_open_port(config, name).ok()
}

/// Open `<device_dir>/<name>`, reporting why it failed.
///
/// The line is 8-N-1 without flow control. On Unix the device is locked
/// exclusively until the handle is dropped.
pub fn try_open_port(config: &PortConfig, name: &str) -> Result<Box<dyn SerialPort>, OpenError> {
    let path = config.device_path(name);
    debug!("Opening {} at {} baud.", path.display(), config.baud_rate);

    builder(config, name).open().map_err(|e| {
        let err = OpenError::new(path, e);
        debug!("{err}");
        err
    })
}

/// Open `<device_dir>/<name>` as a tokio stream.
///
/// # Panics
/// Panics if called outside of a tokio runtime.
pub fn open_port_async(config: &PortConfig, name: &str) -> Result<SerialStream, OpenError> {
    let path = config.device_path(name);
    debug!("Opening {} at {} baud (async).", path.display(), config.baud_rate);

    builder(config, name).open_native_async().map_err(|e| {
        let err = OpenError::new(path, e);
        debug!("{err}");
        err
    })
}

fn builder(config: &PortConfig, name: &str) -> SerialPortBuilder {
    let path = config.device_path(name);
    tokio_serial::new(path.to_string_lossy(), config.baud_rate).timeout(config.read_timeout())
}
