use std::collections::{HashMap, HashSet};

use crate::synth::sanitize::sanitize;

/// Issues unique test ids for one synthesis run.
///
/// The first request for an id gets it unchanged; later requests for the
/// same id get `_2`, `_3`, ... appended.
#[derive(Debug, Default)]
pub struct IdAllocator {
    issued: HashSet<String>,
    next_suffix: HashMap<String, usize>,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// `prefix` followed by the sanitized label.
    pub fn issue(&mut self, prefix: &str, label: &str) -> String {
        self.claim(format!("{}{}", prefix, sanitize(label)))
    }

    /// `prefix`, sanitized label, then `suffix`.
    pub fn issue_with_suffix(&mut self, prefix: &str, label: &str, suffix: &str) -> String {
        self.claim(format!("{}{}{}", prefix, sanitize(label), suffix))
    }

    /// Reserve `id`, disambiguating it if already taken.
    pub fn claim(&mut self, id: String) -> String {
        if self.issued.insert(id.clone()) {
            return id;
        }
        let next = self.next_suffix.entry(id.clone()).or_insert(2);
        loop {
            let candidate = format!("{}_{}", id, next);
            *next += 1;
            if self.issued.insert(candidate.clone()) {
                return candidate;
            }
        }
    }
}
