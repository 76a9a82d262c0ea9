//! Direct handles to the controlling terminal.

use std::fs::File;
use std::io;

/// Open the controlling terminal as (input, output).
#[cfg(unix)]
pub(super) fn open() -> io::Result<(File, File)> {
    let tty = File::options().read(true).write(true).open("/dev/tty")?;
    Ok((tty.try_clone()?, tty))
}

#[cfg(windows)]
pub(super) fn open() -> io::Result<(File, File)> {
    let input = File::options().read(true).write(true).open("CONIN$")?;
    let output = File::options().read(true).write(true).open("CONOUT$")?;
    Ok((input, output))
}

#[cfg(not(any(unix, windows)))]
pub(super) fn open() -> io::Result<(File, File)> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        "no controlling terminal on this platform",
    ))
}
