use crate::pipeline::VisualEvent;
use std::collections::HashMap;

/// Tracks correlation-id aliases across records.
///
/// An event carrying both an id and an unseen alias defines the alias. An
/// event carrying only an alias waits until its alias is defined, then is
/// released with the real id filled in.
#[derive(Debug, Clone, Default)]
pub struct AliasResolver {
    aliases: HashMap<String, String>,
    incomplete: Vec<VisualEvent>,
}

impl AliasResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the events ready for the aggregator, oldest first.
    pub fn resolve(&mut self, mut event: VisualEvent) -> Vec<VisualEvent> {
        if let Some(real) = event.fsm_id.as_ref().and_then(|id| self.aliases.get(id)) {
            event.fsm_id = Some(real.clone());
        }

        let Some(alias) = event.fsm_id_alias.take() else {
            return vec![event];
        };

        match event.fsm_id.clone() {
            Some(id) => {
                let mut ready = Vec::new();
                if !self.aliases.contains_key(&alias) {
                    tracing::debug!(alias = %alias, fsm_id = %id, "alias defined");
                    self.aliases.insert(alias.clone(), id.clone());
                    ready = self.release(&alias, &id);
                }
                ready.push(event);
                ready
            }
            None => match self.aliases.get(&alias) {
                Some(real) => {
                    event.fsm_id = Some(real.clone());
                    vec![event]
                }
                None => {
                    event.fsm_id_alias = Some(alias);
                    self.incomplete.push(event);
                    Vec::new()
                }
            },
        }
    }

    fn release(&mut self, alias: &str, id: &str) -> Vec<VisualEvent> {
        let (ready, waiting): (Vec<_>, Vec<_>) = std::mem::take(&mut self.incomplete)
            .into_iter()
            .partition(|e| e.fsm_id_alias.as_deref() == Some(alias));
        self.incomplete = waiting;

        ready
            .into_iter()
            .map(|mut e| {
                e.fsm_id = Some(id.to_string());
                e.fsm_id_alias = None;
                e
            })
            .collect()
    }

    /// Drop every held-back event. Defined aliases are kept.
    pub fn clear_pending(&mut self) -> usize {
        let dropped = self.incomplete.len();
        self.incomplete.clear();
        dropped
    }

    /// Events still waiting for their alias.
    pub fn pending(&self) -> usize {
        self.incomplete.len()
    }

    pub fn lookup(&self, alias: &str) -> Option<&str> {
        self.aliases.get(alias).map(String::as_str)
    }
}
