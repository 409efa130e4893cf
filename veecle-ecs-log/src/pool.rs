//! Reuse of per-record scratch buffers.
//!
//! Every record needs an output buffer and a working list of fields.
//! Instead of allocating both for each record, a handler checks a [`Scratch`] out of its pool,
//! uses it for exactly one record and returns it afterwards.
//! Scratch buffers that grew beyond a fixed capacity are dropped instead of returned so a single
//! huge record does not pin its memory for the lifetime of the handler.

use std::sync::Mutex;

use crate::resolve::Field;

/// Output buffers with a larger capacity are not pooled.
const MAX_OUTPUT_CAPACITY: usize = 4 << 10;

/// Field lists with a larger capacity are not pooled.
const MAX_FIELDS_CAPACITY: usize = 128;

/// Maximum number of idle scratch buffers kept.
const MAX_IDLE: usize = 64;

/// Buffers used while encoding one record.
#[derive(Debug, Default)]
pub(crate) struct Scratch {
    pub(crate) output: Vec<u8>,
    pub(crate) fields: Vec<Field<'static>>,
}

/// A size-capped free list of [`Scratch`] buffers.
#[derive(Debug, Default)]
pub(crate) struct Pool {
    idle: Mutex<Vec<Scratch>>,
}

impl Pool {
    /// Checks out an empty scratch buffer, reusing an idle one if available.
    pub(crate) fn take(&self) -> Scratch {
        // A poisoned lock falls back to allocating.
        self.idle
            .lock()
            .ok()
            .and_then(|mut idle| idle.pop())
            .unwrap_or_default()
    }

    /// Returns a scratch buffer once the record using it has been written.
    pub(crate) fn put(&self, mut scratch: Scratch) {
        if scratch.output.capacity() > MAX_OUTPUT_CAPACITY
            || scratch.fields.capacity() > MAX_FIELDS_CAPACITY
        {
            return;
        }

        scratch.output.clear();
        scratch.fields.clear();
        if let Ok(mut idle) = self.idle.lock()
            && idle.len() < MAX_IDLE
        {
            idle.push(scratch);
        }
    }

    #[cfg(test)]
    fn idle(&self) -> usize {
        self.idle.lock().map(|idle| idle.len()).unwrap_or(0)
    }
}

/// Empties a field list so it can hold fields with a different lifetime.
///
/// Keeping the allocation is best-effort: it relies on std collecting a `vec::IntoIter` in
/// place, which is not guaranteed. Without it the list is reallocated on first use.
pub(crate) fn recycle<'b>(mut fields: Vec<Field<'_>>) -> Vec<Field<'b>> {
    fields.clear();
    fields.into_iter().filter_map(|_| None).collect()
}
