//! Cross-thread variable writes
//!
//! Writers on other threads queue values here; the owning thread applies
//! them with [`Registry::process_queued_sets`], through the normal set path.

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};

use cvarkit_sdk::{ConVarRef, SplitScreenSlot};

use crate::error::QueueError;
use crate::registry::Registry;
use crate::types::Value;

/// A write waiting for the owning thread
#[derive(Debug, Clone)]
struct QueuedSet {
    cvar: ConVarRef,
    slot: SplitScreenSlot,
    value: Value,
}

/// Queued set channels
pub(crate) struct QueuedSets {
    sender: Sender<QueuedSet>,
    receiver: Receiver<QueuedSet>,
    capacity: usize,
}

impl QueuedSets {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let (sender, receiver) = bounded(capacity);
        Self {
            sender,
            receiver,
            capacity,
        }
    }
}

impl Registry {
    /// Queue a write to be applied by [`Registry::process_queued_sets`]
    ///
    /// The value is clamped now; a write equal to the current value is
    /// dropped without queueing. Safe to call from any thread.
    #[tracing::instrument(skip(self, value))]
    pub fn queue_set(
        &self,
        cvar: ConVarRef,
        value: Value,
        slot: SplitScreenSlot,
    ) -> Result<(), QueueError> {
        let Some(record) = self.convar_record(cvar) else {
            return Err(QueueError::InvalidHandle);
        };
        if value.var_type() != record.var_type {
            return Err(QueueError::InvalidHandle);
        }

        let mut value = value;
        {
            let state = record.state.lock();
            state.clamp(record.descriptor(), &mut value);
            if record.descriptor().equal(state.value_or_default(slot), &value) {
                return Ok(());
            }
        }

        match self.queued_sets.sender.try_send(QueuedSet { cvar, slot, value }) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(_)) => {
                tracing::warn!("Queued set full, dropping write to '{}'", record.name);
                Err(QueueError::Full)
            }
            Err(TrySendError::Disconnected(_)) => {
                tracing::error!("Queued set channel disconnected");
                Err(QueueError::Disconnected)
            }
        }
    }

    /// Apply queued writes in submission order
    ///
    /// Processes at most the queue capacity per call. Returns the number of
    /// writes applied.
    #[tracing::instrument(skip(self))]
    pub fn process_queued_sets(&self) -> usize {
        let mut count = 0;

        while let Ok(set) = self.queued_sets.receiver.try_recv() {
            self.set_value(set.cvar, set.value, set.slot);
            count += 1;

            if count >= self.queued_sets.capacity {
                break;
            }
        }

        count
    }

    /// Check how many writes are currently queued
    pub fn queued_set_count(&self) -> usize {
        self.queued_sets.receiver.len()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use cvarkit_sdk::VarType;

    use super::*;
    use crate::config::RegistryConfig;
    use crate::convars::ConVarSetup;

    #[test]
    fn test_queued_sets_apply_in_order() {
        let registry = Arc::new(Registry::default());
        let cvar = registry.register_convar(ConVarSetup::new("x", VarType::Int32).with_max(50i32));

        let writer = {
            let registry = registry.clone();
            std::thread::spawn(move || {
                for v in [10i32, 20, 99] {
                    registry
                        .queue_set(cvar, Value::Int32(v), SplitScreenSlot::DEFAULT)
                        .unwrap();
                }
            })
        };
        writer.join().unwrap();

        assert_eq!(registry.get_int(cvar, SplitScreenSlot::DEFAULT), 0);
        assert_eq!(registry.queued_set_count(), 3);
        assert_eq!(registry.process_queued_sets(), 3);
        assert_eq!(registry.get_int(cvar, SplitScreenSlot::DEFAULT), 50);
        assert_eq!(registry.times_changed(cvar), 3);
    }

    #[test]
    fn test_queue_set_skips_equal_value() {
        let registry = Registry::default();
        let cvar = registry.register_convar(ConVarSetup::new("x", VarType::Int32).with_default(5i32));
        registry
            .queue_set(cvar, Value::Int32(5), SplitScreenSlot::DEFAULT)
            .unwrap();
        assert_eq!(registry.queued_set_count(), 0);
    }

    #[test]
    fn test_queue_set_rejects_bad_handles() {
        let registry = Registry::default();
        let cvar = registry.register_convar(ConVarSetup::new("x", VarType::Int32));
        assert_eq!(
            registry.queue_set(ConVarRef::invalid(), Value::Int32(1), SplitScreenSlot::DEFAULT),
            Err(QueueError::InvalidHandle)
        );
        assert_eq!(
            registry.queue_set(cvar, Value::Bool(true), SplitScreenSlot::DEFAULT),
            Err(QueueError::InvalidHandle)
        );
    }

    #[test]
    fn test_queue_full() {
        let registry = Registry::new(RegistryConfig {
            queued_set_capacity: 2,
            ..Default::default()
        });
        let cvar = registry.register_convar(ConVarSetup::new("x", VarType::Int32));
        for v in 1..=2 {
            registry
                .queue_set(cvar, Value::Int32(v), SplitScreenSlot::DEFAULT)
                .unwrap();
        }
        assert_eq!(
            registry.queue_set(cvar, Value::Int32(3), SplitScreenSlot::DEFAULT),
            Err(QueueError::Full)
        );
        assert_eq!(registry.process_queued_sets(), 2);
        assert_eq!(registry.get_int(cvar, SplitScreenSlot::DEFAULT), 2);
    }
}
