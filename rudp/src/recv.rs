//! The receive side: a sparse inbound byte buffer, a presence set of
//! delivered segment-begin offsets, a consumption cursor, and the single
//! outstanding "need this segment" request the listener wakes on arrival.

use std::collections::HashSet;
use std::sync::{Condvar, Mutex};

struct Inner {
    buf: Vec<u8>,
    recv_start: usize,
    /// Segment-begin offsets observed so far. Only segment-aligned offsets
    /// are ever queried, so a set of offsets stands in for the spec's
    /// per-byte presence bitmap.
    valid: HashSet<i32>,
    /// `None` when no request is outstanding (EMPTY); `Some((begin, end))`
    /// while the application thread is waiting on that segment (RECEIVING).
    /// Only the application thread moves EMPTY -> RECEIVING; only the
    /// listener moves RECEIVING -> EMPTY.
    pending: Option<(i32, i32)>,
}

/// The inbound half of an endpoint's byte stream.
pub(crate) struct Receiver {
    inner: Mutex<Inner>,
    wakeup: Condvar,
}

impl Receiver {
    pub fn new(initial_capacity: usize) -> Self {
        Receiver {
            inner: Mutex::new(Inner {
                buf: Vec::with_capacity(initial_capacity),
                recv_start: 0,
                valid: HashSet::new(),
                pending: None,
            }),
            wakeup: Condvar::new(),
        }
    }

    /// Called by the listener when a data segment arrives. A duplicate for
    /// an already-present offset is ignored, leaving the buffer untouched.
    pub fn deliver(&self, begin: i32, payload: &[u8]) {
        let mut inner = self.inner.lock().unwrap();

        if !inner.valid.contains(&begin) {
            if begin >= 0 {
                let start = begin as usize;
                let end = start + payload.len();
                if inner.buf.len() < end {
                    inner.buf.resize(end, 0);
                }
                inner.buf[start..end].copy_from_slice(payload);
            }
            inner.valid.insert(begin);
            trace!("delivered segment at offset {} ({} bytes)", begin, payload.len());
        }

        if let Some((pending_begin, _)) = inner.pending {
            if pending_begin == begin {
                trace!("awaited segment {} arrived, waking consumer", begin);
                inner.pending = None;
                self.wakeup.notify_all();
            }
        }
    }

    /// The listener's view of the outstanding request, used to re-emit the
    /// beacon on every idle poll.
    pub fn pending_request(&self) -> Option<(i32, i32)> {
        self.inner.lock().unwrap().pending
    }

    /// Blocks until the segment starting at `begin` is present, installing
    /// it as the pending request if it isn't already.
    fn wait_for(&self, begin: i32, end: i32) {
        let mut inner = self.inner.lock().unwrap();
        if inner.valid.contains(&begin) {
            return;
        }

        debug_assert!(inner.pending.is_none(), "at most one pending request at a time");
        inner.pending = Some((begin, end));
        while inner.pending.is_some() {
            inner = self.wakeup.wait(inner).unwrap();
        }
    }

    /// Waits until bytes `[recv_start, recv_start + n)` are all present,
    /// copies them out, and advances `recv_start` by `n`.
    pub fn consume(&self, n: usize, segment_size: usize) -> Vec<u8> {
        let recv_start = self.inner.lock().unwrap().recv_start;

        let mut offset = 0;
        while offset < n {
            let seg_end = (offset + segment_size).min(n);
            let begin = (recv_start + offset) as i32;
            let end = (recv_start + seg_end) as i32;
            self.wait_for(begin, end);
            offset = seg_end;
        }

        let mut inner = self.inner.lock().unwrap();
        let start = inner.recv_start;
        let result = inner.buf[start..start + n].to_vec();
        inner.recv_start = start + n;
        result
    }
}
