//! Turns a caller-submitted, unweighted catalog into the immutable
//! [`Catalog`] the search core consumes. This is not a textual file
//! parser; it operates on already-structured (JSON-deserialized) input
//! and only applies the loader's weight multiplication.

use std::collections::HashMap;

use itertools::Itertools;
use serde::Deserialize;

use crate::catalog::{
    Catalog, Lecture, PartialAssignment, PreferenceEntry, Section, Slot, SlotKind, Tutorial,
    UnwantedEntry,
};
use crate::error::SearchError;

#[derive(Debug, Clone, Deserialize)]
pub struct RawSlot {
    pub day: String,
    pub time: String,
    pub max_cap: u32,
    pub min_cap: u32,
    pub alt_max: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawSection {
    pub identifier: String,
    #[serde(default)]
    pub alrequired: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawNotCompatible {
    pub id1: String,
    pub id2: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawUnwanted {
    pub identifier: String,
    pub day: String,
    pub time: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawPreference {
    pub identifier: String,
    pub day: String,
    pub time: String,
    pub pref_val: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawPair {
    pub id1: String,
    pub id2: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawPartialAssignment {
    pub identifier: String,
    pub day: String,
    pub time: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogInput {
    pub lecture_slots: Vec<RawSlot>,
    pub tutorial_slots: Vec<RawSlot>,
    pub lectures: Vec<RawSection>,
    pub tutorials: Vec<RawSection>,
    #[serde(default)]
    pub not_compatible: Vec<RawNotCompatible>,
    #[serde(default)]
    pub unwanted: Vec<RawUnwanted>,
    #[serde(default)]
    pub preferences: Vec<RawPreference>,
    #[serde(default)]
    pub pair: Vec<RawPair>,
    #[serde(default)]
    pub part_assign: Vec<RawPartialAssignment>,
}

/// The eight non-negative-integer invocation weights. The loader
/// multiplies each `pen_*` by its matching `w_*`, and every preference's
/// penalty by `w_pref`, before the catalog reaches the core.
#[derive(Debug, Clone, Deserialize)]
pub struct LoadWeights {
    pub w_min_filled: i64,
    pub w_pref: i64,
    #[serde(default = "default_weight")]
    pub w_pair: i64,
    #[serde(default = "default_weight")]
    pub w_sec_diff: i64,
    pub pen_lec_min: i64,
    pub pen_tut_min: i64,
    pub pen_not_paired: i64,
    pub pen_section: i64,
}

fn default_weight() -> i64 {
    1
}

pub fn load(input: CatalogInput, weights: &LoadWeights) -> Result<Catalog, SearchError> {
    let mut slots = Vec::new();

    for raw in &input.lecture_slots {
        slots.push(Slot::new(
            raw.day.clone(),
            raw.time.clone(),
            SlotKind::Lecture,
            raw.max_cap,
            raw.min_cap,
            raw.alt_max,
        ));
    }
    for raw in &input.tutorial_slots {
        slots.push(Slot::new(
            raw.day.clone(),
            raw.time.clone(),
            SlotKind::Tutorial,
            raw.max_cap,
            raw.min_cap,
            raw.alt_max,
        ));
    }

    let mut sections = HashMap::new();
    let mut lecture_order = Vec::with_capacity(input.lectures.len());
    for raw in &input.lectures {
        lecture_order.push(raw.identifier.clone());
        sections.insert(
            raw.identifier.clone(),
            Section::Lecture(Lecture::new(raw.identifier.clone(), raw.alrequired)),
        );
    }
    let mut tutorial_order = Vec::with_capacity(input.tutorials.len());
    for raw in &input.tutorials {
        tutorial_order.push(raw.identifier.clone());
        sections.insert(
            raw.identifier.clone(),
            Section::Tutorial(Tutorial::new(raw.identifier.clone(), raw.alrequired)),
        );
    }

    let not_compatible = input
        .not_compatible
        .into_iter()
        .map(|nc| (nc.id1, nc.id2))
        .collect();

    let unwanted: HashMap<String, Vec<UnwantedEntry>> = input
        .unwanted
        .into_iter()
        .map(|raw| {
            let (start_time, _) = day_time_start(&raw.day, &raw.time);
            (raw.identifier, UnwantedEntry { day: raw.day, start_time })
        })
        .into_group_map();

    let preferences: HashMap<String, Vec<PreferenceEntry>> = input
        .preferences
        .into_iter()
        .map(|raw| {
            let (start_time, _) = day_time_start(&raw.day, &raw.time);
            let weighted_pen = raw.pref_val * weights.w_pref;
            (
                raw.identifier,
                PreferenceEntry {
                    day: raw.day,
                    start_time,
                    weighted_pen,
                },
            )
        })
        .into_group_map();

    let pair = input.pair.into_iter().map(|p| (p.id1, p.id2)).collect();

    let mut part_assign = HashMap::new();
    for raw in input.part_assign {
        part_assign.insert(
            raw.identifier,
            PartialAssignment {
                day: raw.day,
                time: raw.time,
            },
        );
    }

    Ok(Catalog {
        slots,
        sections,
        lecture_order,
        tutorial_order,
        not_compatible,
        unwanted,
        preferences,
        pair,
        part_assign,
        pen_lec_min: weights.pen_lec_min * weights.w_min_filled,
        pen_tut_min: weights.pen_tut_min * weights.w_min_filled,
        pen_not_paired: weights.pen_not_paired * weights.w_pair,
        pen_section: weights.pen_section * weights.w_sec_diff,
    })
}

/// Unwanted/preference entries carry their own day/time but only need
/// the derived `start_time` for comparison against a slot's
/// `start_time`. The duration side of `compute_times` is irrelevant
/// here, so a lecture-kind duration table is used arbitrarily (it does
/// not affect `start_time`).
fn day_time_start(day: &str, time: &str) -> (f64, f64) {
    let dummy = Slot::new(day.to_string(), time.to_string(), SlotKind::Lecture, 0, 0, 0);
    (dummy.start_time, dummy.end_time)
}
