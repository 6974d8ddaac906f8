//! Serves recorded interactions back in order.

use std::collections::{HashMap, VecDeque};

use super::format::{Cassette, Interaction};

/// Replays a cassette, one queue per port/method pair.
///
/// Pairs are independent: a cassette that interleaves `api::get_task` and
/// `api::statistics` replays correctly as long as each pair is called in its
/// own recorded order.
pub struct CassetteReplayer {
    queues: HashMap<(String, String), VecDeque<Interaction>>,
}

impl CassetteReplayer {
    /// Builds the per-pair queues from a loaded cassette.
    #[must_use]
    pub fn new(cassette: &Cassette) -> Self {
        let mut queues: HashMap<(String, String), VecDeque<Interaction>> = HashMap::new();
        for interaction in &cassette.interactions {
            queues
                .entry((interaction.port.clone(), interaction.method.clone()))
                .or_default()
                .push_back(interaction.clone());
        }
        Self { queues }
    }

    /// Removes and returns the next interaction for `port`/`method`.
    ///
    /// # Panics
    ///
    /// Panics with the requested pair and the pairs still available when the
    /// cassette has nothing left for this pair.
    pub fn next_interaction(&mut self, port: &str, method: &str) -> Interaction {
        let key = (port.to_string(), method.to_string());
        if let Some(interaction) = self.queues.get_mut(&key).and_then(VecDeque::pop_front) {
            return interaction;
        }
        let mut available: Vec<String> = self
            .queues
            .iter()
            .filter(|(_, queue)| !queue.is_empty())
            .map(|((p, m), queue)| format!("{p}::{m} ({})", queue.len()))
            .collect();
        available.sort();
        panic!(
            "Cassette exhausted: no interaction left for port={port:?} method={method:?}. \
             Remaining: [{}]",
            available.join(", ")
        );
    }

    /// Interactions not yet served, across all pairs.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.queues.values().map(VecDeque::len).sum()
    }
}
