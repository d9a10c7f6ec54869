//! Chooses the next section to place (the branching variable) and
//! enumerates its candidate slots (the branching values).

use std::collections::{HashMap, HashSet, VecDeque};

use crate::catalog::{Catalog, Section, SlotId, SlotKind};
use crate::constraints::{delta_soft, fails_hard, Partial};

/// Insertion-ordered pool supporting O(1) pop-from-front and O(1)
/// membership, plus an O(n) scan-and-remove for the "find the matching
/// tutorial" rules, which can't be expressed as a plain FIFO pop.
#[derive(Debug, Clone, Default)]
pub struct OrderedPool {
    order: VecDeque<String>,
    members: HashSet<String>,
}

impl OrderedPool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_back(&mut self, id: String) {
        if self.members.insert(id.clone()) {
            self.order.push_back(id);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.members.contains(id)
    }

    pub fn pop_front(&mut self) -> Option<String> {
        let id = self.order.pop_front()?;
        self.members.remove(&id);
        Some(id)
    }

    /// Removes and returns the first element satisfying `pred`, preserving
    /// the relative order of everything else.
    pub fn find_and_remove<F: Fn(&str) -> bool>(&mut self, pred: F) -> Option<String> {
        let pos = self.order.iter().position(|id| pred(id))?;
        let id = self.order.remove(pos)?;
        self.members.remove(&id);
        Some(id)
    }
}

/// A vetted, scored candidate: placing `section_id` in `slot_id` costs
/// `delta` soft penalty on top of the current bounding score.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub section_id: String,
    pub slot_id: SlotId,
    pub delta: i64,
    pub cap_at_assign: u32,
}

/// Root sentinel for the successor memo: no real section has this empty
/// identifier, so the memo entry keyed by it always represents "the first
/// variable chosen at the root of the search".
pub const ROOT_KEY: &str = "";

#[derive(Default)]
pub struct ExpansionGenerator {
    /// Keyed by the identifier of the most-recently-placed section (or
    /// [`ROOT_KEY`] for the root); caches which section is chosen next, so
    /// that revisiting the same prefix in a different branch reproduces
    /// the same branching variable (the And-tree property). The memo must
    /// be checked *before* consulting the pools: a pooled item is removed
    /// permanently the first time it's chosen, so a second visit to the
    /// same predecessor has to come from the cache, not a re-scan.
    successors: HashMap<String, String>,
    pub al_required: OrderedPool,
    pub level_500: OrderedPool,
    pub evening: OrderedPool,
    pub other_lectures: OrderedPool,
    pub tutorials: OrderedPool,
}

impl ExpansionGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Produces the sorted (ascending `delta`), hard-constraint-vetted,
    /// bound-pruned children of the current partial.
    #[allow(clippy::too_many_arguments)]
    pub fn get_expansions(
        &mut self,
        last_placed: Option<&Section>,
        catalog: &Catalog,
        partial: &Partial,
        curr_bounding_score: i64,
        best_known_eval: i64,
        open_lecture_slots: &[SlotId],
        open_tutorial_slots: &[SlotId],
    ) -> Vec<Candidate> {
        let memo_key = last_placed.map(|s| s.identifier()).unwrap_or(ROOT_KEY);

        let chosen_id = if let Some(id) = self.successors.get(memo_key) {
            Some(id.clone())
        } else {
            let chosen = self.select_variable(last_placed, catalog);
            if let Some(ref id) = chosen {
                self.successors.insert(memo_key.to_string(), id.clone());
            }
            chosen
        };

        let Some(chosen_id) = chosen_id else {
            return Vec::new();
        };

        let Some(section) = catalog.section(&chosen_id) else {
            return Vec::new();
        };

        let open_slots: &[SlotId] = match section.kind() {
            SlotKind::Lecture => open_lecture_slots,
            SlotKind::Tutorial => open_tutorial_slots,
        };

        let mut candidates = Vec::new();
        for &slot_id in open_slots {
            let slot = catalog.slot(slot_id);
            if fails_hard(catalog, partial, section, slot) {
                continue;
            }
            let delta = delta_soft(catalog, partial, section, slot);
            if curr_bounding_score + delta >= best_known_eval {
                continue;
            }
            candidates.push(Candidate {
                section_id: chosen_id.clone(),
                slot_id,
                delta,
                cap_at_assign: slot.current_cap,
            });
        }

        candidates.sort_by_key(|c| c.delta);
        candidates
    }

    /// Applies the variable-selection heuristic when the successor memo
    /// has no entry yet for this predecessor. This permanently removes the
    /// chosen section from whichever pool held it.
    fn select_variable(&mut self, last_placed: Option<&Section>, catalog: &Catalog) -> Option<String> {
        if let Some(last) = last_placed {
            let target_parent: Option<&str> = match last {
                Section::Lecture(l) => Some(l.identifier.as_str()),
                Section::Tutorial(t) => Some(t.parent_lecture_id.as_str()),
            };
            if let Some(parent_id) = target_parent {
                let found = self.tutorials.find_and_remove(|tid| {
                    catalog
                        .section(tid)
                        .and_then(|s| s.parent_lecture_id())
                        .map(|p| p == parent_id)
                        .unwrap_or(false)
                });
                if found.is_some() {
                    return found;
                }
            }
        }

        for pool in [
            &mut self.al_required,
            &mut self.level_500,
            &mut self.evening,
            &mut self.tutorials,
            &mut self.other_lectures,
        ] {
            if let Some(id) = pool.pop_front() {
                return Some(id);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_pops_in_insertion_order() {
        let mut pool = OrderedPool::new();
        pool.push_back("a".into());
        pool.push_back("b".into());
        pool.push_back("c".into());
        assert_eq!(pool.pop_front(), Some("a".to_string()));
        assert_eq!(pool.pop_front(), Some("b".to_string()));
        assert!(pool.contains("c"));
    }

    #[test]
    fn pool_find_and_remove_preserves_remaining_order() {
        let mut pool = OrderedPool::new();
        pool.push_back("a".into());
        pool.push_back("b".into());
        pool.push_back("c".into());
        assert_eq!(pool.find_and_remove(|id| id == "b"), Some("b".to_string()));
        assert!(!pool.contains("b"));
        assert_eq!(pool.pop_front(), Some("a".to_string()));
        assert_eq!(pool.pop_front(), Some("c".to_string()));
    }

    #[test]
    fn pool_push_back_is_idempotent_on_duplicate_id() {
        let mut pool = OrderedPool::new();
        pool.push_back("a".into());
        pool.push_back("a".into());
        assert_eq!(pool.pop_front(), Some("a".to_string()));
        assert!(pool.is_empty());
    }
}
