//! Scripted transport for exercising the session logic without hardware.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::device::keyboard::Transport;
use crate::error::{KbdError, Result};
use crate::protocol::REPORT_LENGTH;

/// Transport that records every open and delivered report.
///
/// Optionally reports a short write for the first `short_writes` sends,
/// simulating a connection that went stale and recovers after a reopen.
pub(crate) struct MockTransport {
    short_writes: usize,
    fail_open: bool,
    opens: Arc<AtomicUsize>,
    sent: Arc<Mutex<Vec<[u8; REPORT_LENGTH]>>>,
}

pub(crate) struct MockHandle;

impl MockTransport {
    pub(crate) fn new() -> Self {
        Self {
            short_writes: 0,
            fail_open: false,
            opens: Arc::new(AtomicUsize::new(0)),
            sent: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Fail the first `n` sends with a short write.
    pub(crate) fn with_short_writes(mut self, n: usize) -> Self {
        self.short_writes = n;
        self
    }

    /// Transport whose open always fails, as if the keyboard were absent.
    pub(crate) fn failing_open() -> Self {
        Self {
            fail_open: true,
            ..Self::new()
        }
    }

    /// Shared open counter, usable after the transport moves into a session.
    pub(crate) fn opens(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.opens)
    }

    /// Shared log of completed reports.
    pub(crate) fn sent(&self) -> Arc<Mutex<Vec<[u8; REPORT_LENGTH]>>> {
        Arc::clone(&self.sent)
    }
}

impl Transport for MockTransport {
    type Handle = MockHandle;

    fn open(&mut self) -> Result<MockHandle> {
        if self.fail_open {
            return Err(KbdError::DeviceNotFound);
        }
        self.opens.fetch_add(1, Ordering::SeqCst);
        Ok(MockHandle)
    }

    fn send(&mut self, _handle: &mut MockHandle, report: &[u8; REPORT_LENGTH]) -> Result<usize> {
        if self.short_writes > 0 {
            self.short_writes -= 1;
            return Ok(REPORT_LENGTH - 1);
        }
        self.sent.lock().unwrap().push(*report);
        Ok(REPORT_LENGTH)
    }
}
