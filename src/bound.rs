//! Lower-bound / leaf evaluation of a partial assignment.

use crate::catalog::{Catalog, SlotId};
use crate::constraints::Partial;

/// `curr_bounding_score` plus unmet-minimum-capacity penalties (lecture and
/// tutorial slots weighted independently) plus pair-mismatch penalties for
/// every `pair` entry whose both sides are already placed. At a complete
/// leaf this is the exact objective.
pub fn eval(
    catalog: &Catalog,
    partial: &Partial,
    open_lecture_slots: &[SlotId],
    open_tutorial_slots: &[SlotId],
    curr_bounding_score: i64,
) -> i64 {
    let mut lec_min_pen = 0i64;
    for &id in open_lecture_slots {
        let slot = catalog.slot(id);
        let shortfall = slot.min_cap.saturating_sub(slot.current_cap) as i64;
        lec_min_pen += shortfall * catalog.pen_lec_min;
    }

    let mut tut_min_pen = 0i64;
    for &id in open_tutorial_slots {
        let slot = catalog.slot(id);
        let shortfall = slot.min_cap.saturating_sub(slot.current_cap) as i64;
        tut_min_pen += shortfall * catalog.pen_tut_min;
    }

    let mut pair_pen = 0i64;
    for (a, b) in &catalog.pair {
        let (Some(item_a), Some(item_b)) = (partial.get(a), partial.get(b)) else {
            continue;
        };
        let slot_a = catalog.slot(item_a.slot_id);
        let slot_b = catalog.slot(item_b.slot_id);
        if slot_a.day != slot_b.day || slot_a.time != slot_b.time {
            pair_pen += catalog.pen_not_paired;
        }
    }

    curr_bounding_score + lec_min_pen + tut_min_pen + pair_pen
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Lecture, Section, Slot, SlotKind};
    use std::collections::HashMap;

    fn empty_catalog() -> Catalog {
        Catalog {
            slots: Vec::new(),
            sections: HashMap::new(),
            lecture_order: Vec::new(),
            tutorial_order: Vec::new(),
            not_compatible: Vec::new(),
            unwanted: HashMap::new(),
            preferences: HashMap::new(),
            pair: Vec::new(),
            part_assign: HashMap::new(),
            pen_lec_min: 5,
            pen_tut_min: 3,
            pen_not_paired: 10,
            pen_section: 1,
        }
    }

    #[test]
    fn bound_equals_running_score_when_everything_is_met() {
        let mut catalog = empty_catalog();
        catalog.slots.push(Slot::new("MO".into(), "8:00".into(), SlotKind::Lecture, 30, 0, 0));
        let slots = vec![SlotId(0)];
        let partial = HashMap::new();
        assert_eq!(eval(&catalog, &partial, &slots, &[], 7), 7);
    }

    #[test]
    fn unmet_min_cap_adds_penalty() {
        let mut catalog = empty_catalog();
        let mut slot = Slot::new("MO".into(), "8:00".into(), SlotKind::Lecture, 30, 5, 0);
        slot.current_cap = 2;
        catalog.slots.push(slot);
        let slots = vec![SlotId(0)];
        let partial = HashMap::new();
        // shortfall of 3 seats * pen_lec_min 5 = 15
        assert_eq!(eval(&catalog, &partial, &slots, &[], 0), 15);
    }

    #[test]
    fn mismatched_pair_adds_penalty() {
        let mut catalog = empty_catalog();
        catalog.slots.push(Slot::new("MO".into(), "8:00".into(), SlotKind::Lecture, 30, 0, 0));
        catalog.slots.push(Slot::new("TU".into(), "10:00".into(), SlotKind::Lecture, 30, 0, 0));
        catalog
            .sections
            .insert("A".into(), Section::Lecture(Lecture::new("CPSC 231 LEC 01".into(), false)));
        catalog
            .sections
            .insert("B".into(), Section::Lecture(Lecture::new("CPSC 331 LEC 01".into(), false)));
        catalog.pair.push(("A".into(), "B".into()));

        let mut partial = HashMap::new();
        partial.insert(
            "A".to_string(),
            crate::search::ScheduledItem {
                section_id: "A".into(),
                slot_id: SlotId(0),
                soft_delta: 0,
                cap_at_assign: 0,
            },
        );
        partial.insert(
            "B".to_string(),
            crate::search::ScheduledItem {
                section_id: "B".into(),
                slot_id: SlotId(1),
                soft_delta: 0,
                cap_at_assign: 0,
            },
        );

        assert_eq!(eval(&catalog, &partial, &[], &[], 0), 10);
    }
}
