//! Bulk resets to default
//!
//! Command-line enforced variables and unfilled references are never reset.
//! Matching records are collected first; the writes happen afterwards, with
//! no table lock held, through the normal set path.

use std::sync::Arc;

use cvarkit_sdk::{ConVarRef, SplitScreenSlot};

use super::Registry;
use crate::convars::flags::ConVarFlags;
use crate::convars::record::ConVarRecord;

const PROTECTED: ConVarFlags = ConVarFlags::COMMANDLINE_ENFORCED.union(ConVarFlags::REFERENCE);

impl Registry {
    /// Reset every variable carrying any flag in `mask`
    ///
    /// An empty mask matches nothing. Returns the number of variables reset.
    pub fn reset_to_default_by_flags(&self, mask: ConVarFlags) -> usize {
        self.reset_matching(|_, flags| flags.intersects(mask))
    }

    /// Reset every variable whose name starts with `prefix`
    pub fn reset_to_default_by_prefix(&self, prefix: &str) -> usize {
        self.reset_matching(|record, _| record.name.starts_with(prefix))
    }

    /// Reset every unprotected variable
    pub fn reset_all_to_defaults(&self) -> usize {
        self.reset_matching(|_, _| true)
    }

    fn reset_matching<F>(&self, matches: F) -> usize
    where
        F: Fn(&ConVarRecord, ConVarFlags) -> bool,
    {
        let targets: Vec<(ConVarRef, Arc<ConVarRecord>, usize)> = {
            let table = self.convars.read();
            table
                .records
                .iter()
                .enumerate()
                .filter_map(|(index, record)| {
                    let state = record.state.lock();
                    if state.flags.intersects(PROTECTED) || !matches(record, state.flags) {
                        return None;
                    }
                    Some((
                        ConVarRef::new(index as u16, state.registrations),
                        Arc::clone(record),
                        state.values.len(),
                    ))
                })
                .collect()
        };

        for (cvar, record, slots) in &targets {
            let default = record.state.lock().default.clone();
            for slot in 0..*slots {
                self.set_value(*cvar, default.clone(), SplitScreenSlot::new(slot as i32));
            }
        }

        tracing::debug!("Reset {} convar(s) to default", targets.len());
        targets.len()
    }
}
