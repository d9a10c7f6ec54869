//! The And-tree DFS driver and the public core API: `AndTreeSearch::new`
//! runs the initialiser, `search` performs the recursive descent and
//! returns the best complete assignment found (if any).

use std::collections::HashMap;

use log::{debug, info, trace};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::bound;
use crate::catalog::{Catalog, SlotId};
use crate::constraints::Partial;
use crate::error::SearchError;
use crate::expansion::ExpansionGenerator;
use crate::init;

/// A single committed placement: which section, in which slot, and the
/// incremental soft penalty it contributed when placed. `cap_at_assign`
/// is diagnostic metadata only (the slot's capacity immediately before
/// this placement), not required for correctness.
#[derive(Debug, Clone)]
pub struct ScheduledItem {
    pub section_id: String,
    pub slot_id: SlotId,
    pub soft_delta: i64,
    pub cap_at_assign: u32,
}

#[derive(Debug, Clone, Default)]
pub struct SearchOptions {
    /// Stop after the Nth strictly-improving complete solution.
    pub break_limit: Option<u32>,
    /// Pre-shuffle the lecture and tutorial input orderings with a seeded
    /// PRNG before bucketing.
    pub shuffle: bool,
    pub shuffle_seed: u64,
}

#[derive(Debug, Clone, Default)]
pub struct SearchStats {
    pub leaf_counter: u64,
    pub result_counter: u32,
}

#[derive(Debug, Clone)]
pub struct SearchOutcome {
    /// identifier → (day, time), or `None` if no complete assignment was
    /// found before the search space (or `break_limit`) was exhausted.
    pub assignment: Option<HashMap<String, (String, String)>>,
    pub eval: Option<i64>,
    pub stats: SearchStats,
}

pub struct AndTreeSearch {
    catalog: Catalog,
    open_lecture_slots: Vec<SlotId>,
    open_tutorial_slots: Vec<SlotId>,
    partial: Partial,
    curr_bounding_score: i64,
    best_eval: i64,
    best_assignment: Option<Partial>,
    expansion: ExpansionGenerator,
    break_limit: Option<u32>,
    total_section_count: usize,
    stats: SearchStats,
}

impl AndTreeSearch {
    pub fn new(mut catalog: Catalog, options: SearchOptions) -> Result<Self, SearchError> {
        if options.shuffle {
            let mut rng = StdRng::seed_from_u64(options.shuffle_seed);
            catalog.lecture_order.shuffle(&mut rng);
            catalog.tutorial_order.shuffle(&mut rng);
            debug!("shuffled lecture/tutorial orderings with seed {}", options.shuffle_seed);
        }

        let init::InitState {
            catalog,
            open_lecture_slots,
            open_tutorial_slots,
            partial,
            curr_bounding_score,
            expansion,
            total_section_count,
        } = init::initialize(catalog)?;

        info!(
            "initialised search: {} sections ({} pre-placed), {} open lecture slots, {} open tutorial slots",
            total_section_count,
            partial.len(),
            open_lecture_slots.len(),
            open_tutorial_slots.len(),
        );

        Ok(AndTreeSearch {
            catalog,
            open_lecture_slots,
            open_tutorial_slots,
            partial,
            curr_bounding_score,
            best_eval: i64::MAX,
            best_assignment: None,
            expansion,
            break_limit: options.break_limit,
            total_section_count,
            stats: SearchStats::default(),
        })
    }

    pub fn search(&mut self) -> SearchOutcome {
        self.dfs(None);

        let assignment = self.best_assignment.take().map(|partial| {
            partial
                .into_iter()
                .map(|(id, item)| {
                    let slot = self.catalog.slot(item.slot_id);
                    (id, (slot.day.clone(), slot.time.clone()))
                })
                .collect()
        });

        SearchOutcome {
            assignment,
            eval: if self.best_eval == i64::MAX {
                None
            } else {
                Some(self.best_eval)
            },
            stats: self.stats.clone(),
        }
    }

    fn dfs(&mut self, last_placed: Option<&str>) {
        if let Some(limit) = self.break_limit {
            if self.stats.result_counter >= limit {
                return;
            }
        }

        let last_section = last_placed.and_then(|id| self.catalog.section(id));
        let children = self.expansion.get_expansions(
            last_section,
            &self.catalog,
            &self.partial,
            self.curr_bounding_score,
            self.best_eval,
            &self.open_lecture_slots,
            &self.open_tutorial_slots,
        );

        if children.is_empty() {
            self.stats.leaf_counter += 1;
            if self.partial.len() == self.total_section_count {
                let e = bound::eval(
                    &self.catalog,
                    &self.partial,
                    &self.open_lecture_slots,
                    &self.open_tutorial_slots,
                    self.curr_bounding_score,
                );
                if e < self.best_eval {
                    trace!("new best eval {} (was {})", e, self.best_eval);
                    self.best_eval = e;
                    self.best_assignment = Some(self.partial.clone());
                    self.stats.result_counter += 1;
                }
            }
            return;
        }

        for child in children {
            let alrequired = self
                .catalog
                .section(&child.section_id)
                .map(|s| s.alrequired())
                .unwrap_or(false);

            // Pre-descent transaction.
            {
                let slot = self.catalog.slot_mut(child.slot_id);
                slot.current_cap += 1;
                if alrequired {
                    slot.current_alt_cap += 1;
                }
            }
            self.partial.insert(
                child.section_id.clone(),
                ScheduledItem {
                    section_id: child.section_id.clone(),
                    slot_id: child.slot_id,
                    soft_delta: child.delta,
                    cap_at_assign: child.cap_at_assign,
                },
            );
            self.curr_bounding_score += child.delta;

            self.dfs(Some(child.section_id.as_str()));

            // Post-descent transaction (mirror inverse).
            self.curr_bounding_score -= child.delta;
            self.partial.remove(&child.section_id);
            let slot = self.catalog.slot_mut(child.slot_id);
            slot.current_cap -= 1;
            if alrequired {
                slot.current_alt_cap -= 1;
            }
        }
    }
}
