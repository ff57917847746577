use parking_lot::Mutex;

use crate::errors::{OrreryError, Result};

/// Opaque handle to the process-wide display connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayHandle(u64);

impl DisplayHandle {
    /// The raw platform value the opener produced.
    #[must_use]
    pub fn raw(self) -> u64 {
        self.0
    }
}

enum DisplayState {
    Closed,
    Open(DisplayHandle),
    TornDown,
}

// At most one display connection is ever opened per process. The coarse
// lock also serializes the lazy open itself, so two racing acquirers
// cannot both run the opener.
static DISPLAY: Mutex<DisplayState> = Mutex::new(DisplayState::Closed);

/// Returns the process-wide display connection, opening it on first use.
///
/// `open` runs at most once for the lifetime of the process; later calls
/// return the existing handle without invoking it. After
/// [`shutdown_display`] the connection is gone for good and this fails
/// with [`OrreryError::DisplayShutDown`].
pub fn acquire_display(open: impl FnOnce() -> std::result::Result<u64, String>) -> Result<DisplayHandle> {
    let mut state = DISPLAY.lock();
    match *state {
        DisplayState::Open(handle) => Ok(handle),
        DisplayState::TornDown => Err(OrreryError::DisplayShutDown),
        DisplayState::Closed => {
            let raw = open().map_err(OrreryError::DisplayOpenFailed)?;
            let handle = DisplayHandle(raw);
            *state = DisplayState::Open(handle);
            log::debug!("opened display connection {raw:#x}");
            Ok(handle)
        }
    }
}

/// True while the connection is open.
#[must_use]
pub fn display_is_open() -> bool {
    matches!(*DISPLAY.lock(), DisplayState::Open(_))
}

/// Tears the connection down, invoking `close` with the raw handle if one
/// was open. Teardown is final: the connection is never reopened, and
/// later [`acquire_display`] calls fail.
pub fn shutdown_display(close: impl FnOnce(u64)) {
    let mut state = DISPLAY.lock();
    if let DisplayState::Open(handle) = *state {
        close(handle.raw());
        log::debug!("closed display connection {:#x}", handle.raw());
    }
    *state = DisplayState::TornDown;
}
