//! Runs once before search: strips the university-wide `TU 11:00`
//! lecture meeting block, synthesises the graduate-shadow tutorials for
//! `CPSC 351`/`CPSC 413`, applies forced partial assignments, and
//! buckets everything else into the four lecture pools plus the single
//! tutorial pool the expansion generator consumes.

use std::collections::{HashMap, HashSet};

use log::info;

use crate::catalog::{Catalog, PartialAssignment, Section, SlotId, SlotKind, Tutorial, LEVEL_5XX};
use crate::constraints::{delta_soft, fails_hard, Partial};
use crate::error::SearchError;
use crate::expansion::ExpansionGenerator;
use crate::search::ScheduledItem;

const SPECIAL_TUTORIAL_DAY: &str = "TU";
const SPECIAL_TUTORIAL_TIME: &str = "18:00";

pub struct InitState {
    pub catalog: Catalog,
    pub open_lecture_slots: Vec<SlotId>,
    pub open_tutorial_slots: Vec<SlotId>,
    pub partial: Partial,
    pub curr_bounding_score: i64,
    pub expansion: ExpansionGenerator,
    pub total_section_count: usize,
}

pub fn initialize(mut catalog: Catalog) -> Result<InitState, SearchError> {
    inject_special_tutorial(&mut catalog, "CPSC 351", "CPSC 851 TUT 01");
    inject_special_tutorial(&mut catalog, "CPSC 413", "CPSC 913 TUT 01");

    let (open_lecture_slots, open_tutorial_slots) = open_slot_sets(&catalog);

    let (partial, curr_bounding_score, claimed) =
        apply_partial_assignments(&mut catalog, &open_lecture_slots, &open_tutorial_slots)?;

    let expansion = build_pools(&catalog, &claimed);

    let total_section_count = catalog.lecture_order.len() + catalog.tutorial_order.len();

    info!(
        "catalog loaded: {} lectures, {} tutorials, {} pre-placed by partial assignment",
        catalog.lecture_order.len(),
        catalog.tutorial_order.len(),
        partial.len(),
    );

    Ok(InitState {
        catalog,
        open_lecture_slots,
        open_tutorial_slots,
        partial,
        curr_bounding_score,
        expansion,
        total_section_count,
    })
}

/// Excludes the university-wide `TU 11:00` lecture meeting block from the
/// open lecture-slot set, unconditionally.
fn open_slot_sets(catalog: &Catalog) -> (Vec<SlotId>, Vec<SlotId>) {
    let mut open_lecture_slots = Vec::new();
    let mut open_tutorial_slots = Vec::new();
    for (idx, slot) in catalog.slots.iter().enumerate() {
        match slot.kind {
            SlotKind::Lecture => {
                if slot.day == "TU" && slot.time == "11:00" {
                    continue;
                }
                open_lecture_slots.push(SlotId(idx));
            }
            SlotKind::Tutorial => open_tutorial_slots.push(SlotId(idx)),
        }
    }
    (open_lecture_slots, open_tutorial_slots)
}

/// For any lecture belonging to `course_id`, synthesises a non-active-
/// -learning-required tutorial `tutorial_identifier`, force-assigns it to
/// `TU 18:00`, and marks it incompatible with every section (lecture or
/// tutorial) of that course. The institution couples a graduate-shadow
/// tutorial with these undergraduate courses.
fn inject_special_tutorial(catalog: &mut Catalog, course_id: &str, tutorial_identifier: &str) {
    let has_course = catalog.lecture_order.iter().any(|id| {
        matches!(catalog.sections.get(id), Some(Section::Lecture(l)) if l.course_id == course_id)
    });
    if !has_course {
        return;
    }

    catalog.sections.insert(
        tutorial_identifier.to_string(),
        Section::Tutorial(Tutorial::new(tutorial_identifier.to_string(), false)),
    );
    if !catalog.tutorial_order.iter().any(|id| id == tutorial_identifier) {
        catalog.tutorial_order.push(tutorial_identifier.to_string());
    }
    catalog.part_assign.insert(
        tutorial_identifier.to_string(),
        PartialAssignment {
            day: SPECIAL_TUTORIAL_DAY.to_string(),
            time: SPECIAL_TUTORIAL_TIME.to_string(),
        },
    );

    let belongs_to_course = |section: &Section| -> bool {
        match section {
            Section::Lecture(l) => l.course_id == course_id,
            Section::Tutorial(t) => {
                t.parent_lecture_id == course_id
                    || t.parent_lecture_id
                        .strip_prefix(course_id)
                        .is_some_and(|rest| rest.starts_with(' '))
            }
        }
    };

    let incompatible_with: Vec<String> = catalog
        .sections
        .iter()
        .filter(|(id, section)| id.as_str() != tutorial_identifier && belongs_to_course(section))
        .map(|(id, _)| id.clone())
        .collect();

    for id in incompatible_with {
        catalog.not_compatible.push((id, tutorial_identifier.to_string()));
    }
}

fn apply_partial_assignments(
    catalog: &mut Catalog,
    open_lecture_slots: &[SlotId],
    open_tutorial_slots: &[SlotId],
) -> Result<(Partial, i64, HashSet<String>), SearchError> {
    let mut partial: Partial = HashMap::new();
    let mut curr_bounding_score: i64 = 0;
    let mut claimed: HashSet<String> = HashSet::new();

    let mut assign_ids: Vec<String> = catalog.part_assign.keys().cloned().collect();
    assign_ids.sort();

    for identifier in assign_ids {
        let pa = catalog.part_assign.get(&identifier).unwrap().clone();
        let section = catalog
            .sections
            .get(&identifier)
            .ok_or_else(|| SearchError::UnknownSection(identifier.clone()))?
            .clone();

        let open_slots_for_kind: &[SlotId] = match section.kind() {
            SlotKind::Lecture => open_lecture_slots,
            SlotKind::Tutorial => open_tutorial_slots,
        };

        let slot_id = open_slots_for_kind
            .iter()
            .copied()
            .find(|&id| {
                let s = catalog.slot(id);
                s.day == pa.day && s.time == pa.time
            })
            .ok_or_else(|| SearchError::UnknownSlot {
                identifier: identifier.clone(),
                day: pa.day.clone(),
                time: pa.time.clone(),
                kind: match section.kind() {
                    SlotKind::Lecture => "lecture",
                    SlotKind::Tutorial => "tutorial",
                },
            })?;

        if fails_hard(catalog, &partial, &section, catalog.slot(slot_id)) {
            return Err(SearchError::InfeasibleForcedPlacement {
                identifier: identifier.clone(),
                day: pa.day.clone(),
                time: pa.time.clone(),
            });
        }

        let delta = delta_soft(catalog, &partial, &section, catalog.slot(slot_id));
        let cap_before = catalog.slot(slot_id).current_cap;
        {
            let slot = catalog.slot_mut(slot_id);
            slot.current_cap += 1;
            if section.alrequired() {
                slot.current_alt_cap += 1;
            }
        }
        curr_bounding_score += delta;
        partial.insert(
            identifier.clone(),
            ScheduledItem {
                section_id: identifier.clone(),
                slot_id,
                soft_delta: delta,
                cap_at_assign: cap_before,
            },
        );
        claimed.insert(identifier);
    }

    Ok((partial, curr_bounding_score, claimed))
}

/// Buckets every lecture not already claimed by a partial assignment into
/// exactly one of al-required / level-500 / evening / other (in that
/// precedence), and every remaining tutorial into the single tutorial
/// pool, preserving the catalog's insertion order.
fn build_pools(catalog: &Catalog, claimed: &HashSet<String>) -> ExpansionGenerator {
    let mut expansion = ExpansionGenerator::new();

    for identifier in &catalog.lecture_order {
        if claimed.contains(identifier) {
            continue;
        }
        let Some(Section::Lecture(lec)) = catalog.sections.get(identifier) else {
            continue;
        };
        if lec.alrequired {
            expansion.al_required.push_back(identifier.clone());
        } else if lec.level == LEVEL_5XX {
            expansion.level_500.push_back(identifier.clone());
        } else if lec.is_evening {
            expansion.evening.push_back(identifier.clone());
        } else {
            expansion.other_lectures.push_back(identifier.clone());
        }
    }

    for identifier in &catalog.tutorial_order {
        if claimed.contains(identifier) {
            continue;
        }
        expansion.tutorials.push_back(identifier.clone());
    }

    expansion
}
