//! Deferred work queues
//!
//! Lets other threads hand variable writes to the thread that owns the
//! registry's hot path. Writes are applied in `process_queued_sets`.

mod queue;

pub(crate) use queue::QueuedSets;
