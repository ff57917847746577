//! Display Connection Guard Tests
//!
//! The guard is process-wide state, so the whole lifecycle runs in a single
//! test: open-once, handle reuse, final teardown.

use std::sync::atomic::{AtomicUsize, Ordering};

use orrery::config::{acquire_display, display_is_open, shutdown_display};
use orrery::OrreryError;

static OPEN_CALLS: AtomicUsize = AtomicUsize::new(0);

#[test]
fn display_connection_opens_once_and_teardown_is_final() {
    assert!(!display_is_open());

    let first = acquire_display(|| {
        OPEN_CALLS.fetch_add(1, Ordering::SeqCst);
        Ok(0xD15_u64)
    })
    .unwrap();
    assert!(display_is_open());

    // Second acquire reuses the connection; the opener must not run again.
    let second = acquire_display(|| {
        OPEN_CALLS.fetch_add(1, Ordering::SeqCst);
        Err("must not reopen".to_owned())
    })
    .unwrap();
    assert_eq!(first, second);
    assert_eq!(OPEN_CALLS.load(Ordering::SeqCst), 1);

    let mut closed_with = None;
    shutdown_display(|raw| closed_with = Some(raw));
    assert_eq!(closed_with, Some(0xD15));
    assert!(!display_is_open());

    // Teardown is permanent.
    let reopened = acquire_display(|| Ok(1));
    assert!(matches!(reopened, Err(OrreryError::DisplayShutDown)));
    assert_eq!(OPEN_CALLS.load(Ordering::SeqCst), 1);
}
