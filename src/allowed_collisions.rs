//! Allowed collision matrix: pairs of bodies (robot links or obstacles) whose contact
//! is not reported as collision and is not counted for clearance distance.

use std::collections::BTreeSet;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AllowedCollisionMatrix {
    /// Pairs stored with the lexicographically smaller name first
    entries: BTreeSet<(String, String)>,
}

fn ordered(a: &str, b: &str) -> (String, String) {
    if a <= b {
        (a.to_string(), b.to_string())
    } else {
        (b.to_string(), a.to_string())
    }
}

impl AllowedCollisionMatrix {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allow or forbid contact between the two named bodies.
    pub fn set_pair(&mut self, a: &str, b: &str, allowed: bool) {
        let key = ordered(a, b);
        if allowed {
            self.entries.insert(key);
        } else {
            self.entries.remove(&key);
        }
    }

    /// Allow or forbid contact between `name` and each of `others`.
    pub fn set_entry(&mut self, name: &str, others: &[String], allowed: bool) {
        for other in others {
            self.set_pair(name, other, allowed);
        }
    }

    pub fn is_allowed(&self, a: &str, b: &str) -> bool {
        self.entries.contains(&ordered(a, b))
    }

    /// All allowed pairs, sorted.
    pub fn entries(&self) -> impl Iterator<Item = &(String, String)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
