//! Pure functions evaluating hard constraints and incremental soft
//! penalties. Nothing here mutates the catalog or the partial assignment;
//! both are read-only borrows.

use std::collections::HashMap;

use crate::catalog::{Catalog, Section, Slot, LEVEL_5XX};
use crate::search::ScheduledItem;

const EVENING_START: f64 = 18.0;

pub type Partial = HashMap<String, ScheduledItem>;

/// Days are in conflict when they're identical, or when both are in
/// `{MO, FR}` (the MWF weekly pattern colliding with a Friday tutorial
/// slot, in either direction).
pub fn day_overlap(day1: &str, day2: &str) -> bool {
    if day1 == day2 {
        return true;
    }
    let is_mo_or_fr = |d: &str| d == "MO" || d == "FR";
    is_mo_or_fr(day1) && is_mo_or_fr(day2)
}

/// Open-interval overlap: touching intervals (`end1 == start2`) do not
/// overlap, which admits back-to-back scheduling.
pub fn time_overlap(start1: f64, end1: f64, start2: f64, end2: f64) -> bool {
    !(end1 <= start2 || end2 <= start1)
}

fn slots_overlap(a: &Slot, b: &Slot) -> bool {
    day_overlap(&a.day, &b.day) && time_overlap(a.start_time, a.end_time, b.start_time, b.end_time)
}

/// Returns true iff placing `section` in `slot`, given the sections
/// already committed in `partial`, violates any hard constraint.
pub fn fails_hard(catalog: &Catalog, partial: &Partial, section: &Section, slot: &Slot) -> bool {
    // 1. Evening discipline.
    if section.is_evening() && slot.start_time < EVENING_START {
        return true;
    }

    // 2. Capacity.
    if slot.current_cap >= slot.max_cap {
        return true;
    }

    // 3. Active-learning cap.
    if section.alrequired() && slot.current_alt_cap >= slot.alt_max {
        return true;
    }

    // 4. Level-500 lectures do not time-overlap each other.
    if section.is_lec() && section.level() == LEVEL_5XX {
        for item in partial.values() {
            let Some(other) = catalog.section(&item.section_id) else {
                continue;
            };
            if other.is_lec() && other.level() == LEVEL_5XX {
                let other_slot = catalog.slot(item.slot_id);
                if day_overlap(&other_slot.day, &slot.day)
                    && time_overlap(other_slot.start_time, other_slot.end_time, slot.start_time, slot.end_time)
                {
                    return true;
                }
            }
        }
    }

    // 5. Tutorial vs. its parent lecture.
    if let Some(parent_id) = section.parent_lecture_id() {
        if let Some(parent_item) = partial.get(parent_id) {
            let parent_slot = catalog.slot(parent_item.slot_id);
            if slots_overlap(parent_slot, slot) {
                return true;
            }
        }
    }

    // The mirror of 5: a lecture must not overlap a tutorial already
    // scheduled against it as a parent.
    if section.is_lec() {
        for item in partial.values() {
            let Some(other) = catalog.section(&item.section_id) else {
                continue;
            };
            if other.parent_lecture_id() == Some(section.identifier()) {
                let other_slot = catalog.slot(item.slot_id);
                if slots_overlap(other_slot, slot) {
                    return true;
                }
            }
        }
    }

    // 6. Explicit incompatibility.
    for (a, b) in &catalog.not_compatible {
        let other_id = if a == section.identifier() {
            Some(b)
        } else if b == section.identifier() {
            Some(a)
        } else {
            None
        };
        if let Some(other_id) = other_id {
            if let Some(other_item) = partial.get(other_id) {
                let other_slot = catalog.slot(other_item.slot_id);
                if slots_overlap(other_slot, slot) {
                    return true;
                }
            }
        }
    }

    // 7. Unwanted placement.
    if let Some(entries) = catalog.unwanted.get(section.identifier()) {
        if entries
            .iter()
            .any(|uw| uw.day == slot.day && uw.start_time == slot.start_time)
        {
            return true;
        }
    }

    false
}

/// Incremental soft-penalty contribution of placing `section` in `slot`.
pub fn delta_soft(catalog: &Catalog, partial: &Partial, section: &Section, slot: &Slot) -> i64 {
    let mut pref_pen = 0i64;
    if let Some(prefs) = catalog.preferences.get(section.identifier()) {
        for pref in prefs {
            if pref.day != slot.day || pref.start_time != slot.start_time {
                pref_pen += pref.weighted_pen;
            }
        }
    }

    if !section.is_lec() {
        return pref_pen;
    }

    let mut section_pen = 0i64;
    let course_id = section.course_id();
    for item in partial.values() {
        let Some(other) = catalog.section(&item.section_id) else {
            continue;
        };
        if !other.is_lec() {
            continue;
        }
        if other.course_id() != course_id {
            continue;
        }
        let other_slot = catalog.slot(item.slot_id);
        if day_overlap(&other_slot.day, &slot.day) && other_slot.start_time == slot.start_time {
            section_pen += catalog.pen_section;
        }
    }

    pref_pen + section_pen
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_days_overlap() {
        assert!(day_overlap("MO", "MO"));
        assert!(day_overlap("TU", "TU"));
    }

    #[test]
    fn mo_fr_overlap_either_direction() {
        assert!(day_overlap("MO", "FR"));
        assert!(day_overlap("FR", "MO"));
    }

    #[test]
    fn unrelated_days_do_not_overlap() {
        assert!(!day_overlap("MO", "TU"));
        assert!(!day_overlap("TU", "FR"));
    }

    #[test]
    fn touching_intervals_do_not_overlap() {
        assert!(!time_overlap(8.0, 9.0, 9.0, 10.0));
    }

    #[test]
    fn overlapping_intervals_do_overlap() {
        assert!(time_overlap(8.0, 9.5, 9.0, 10.0));
    }

    #[test]
    fn contained_interval_overlaps() {
        assert!(time_overlap(8.0, 12.0, 9.0, 10.0));
    }
}
