//! Immutable entity definitions for the scheduling catalog: sections, slots,
//! and the cross-cutting constraint tables. Everything here is fixed once
//! the catalog has been loaded and initialised; the only mutable state is
//! the per-slot capacity counters, which the DFS driver updates
//! transactionally during search.

use std::collections::HashMap;

pub const EVENING_LEVEL: u8 = 9;
pub const LEVEL_5XX: u8 = 5;

/// Stable index into the slot arena. Slots never move once the catalog is
/// built, so this index stays valid for the lifetime of a search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotKind {
    Lecture,
    Tutorial,
}

/// A day/time slot that sections can be placed into.
#[derive(Debug, Clone)]
pub struct Slot {
    pub day: String,
    pub time: String,
    pub kind: SlotKind,
    pub start_time: f64,
    pub end_time: f64,
    pub max_cap: u32,
    pub min_cap: u32,
    pub alt_max: u32,
    pub current_cap: u32,
    pub current_alt_cap: u32,
}

impl Slot {
    pub fn new(day: String, time: String, kind: SlotKind, max_cap: u32, min_cap: u32, alt_max: u32) -> Self {
        let (start_time, end_time) = compute_times(&day, &time, kind);
        Slot {
            day,
            time,
            kind,
            start_time,
            end_time,
            max_cap,
            min_cap,
            alt_max,
            current_cap: 0,
            current_alt_cap: 0,
        }
    }
}

/// `MO` → 1h; Tuesday lectures → 1.5h; Tuesday tutorials → 1h; anything
/// else (notably Friday) → 2h.
fn duration_hours(day: &str, kind: SlotKind) -> f64 {
    match (day, kind) {
        ("MO", _) => 1.0,
        ("TU", SlotKind::Lecture) => 1.5,
        ("TU", SlotKind::Tutorial) => 1.0,
        _ => 2.0,
    }
}

fn compute_times(day: &str, time: &str, kind: SlotKind) -> (f64, f64) {
    let mut parts = time.splitn(2, ':');
    let hour: f64 = parts.next().unwrap_or("0").parse().unwrap_or(0.0);
    let minute_token = parts.next().unwrap_or("00");
    let minute = if minute_token == "00" { 0.0 } else { 0.5 };
    let start_time = hour + minute;
    let end_time = start_time + duration_hours(day, kind);
    (start_time, end_time)
}

/// A placeable unit: `Lecture` or `Tutorial`.
#[derive(Debug, Clone)]
pub enum Section {
    Lecture(Lecture),
    Tutorial(Tutorial),
}

#[derive(Debug, Clone)]
pub struct Lecture {
    pub identifier: String,
    pub alrequired: bool,
    pub level: u8,
    pub is_evening: bool,
    pub course_id: String,
}

#[derive(Debug, Clone)]
pub struct Tutorial {
    pub identifier: String,
    pub alrequired: bool,
    pub level: u8,
    pub is_evening: bool,
    pub parent_lecture_id: String,
}

impl Lecture {
    pub fn new(identifier: String, alrequired: bool) -> Self {
        let level = derive_level(&identifier);
        Lecture {
            course_id: derive_course_id(&identifier),
            is_evening: level == EVENING_LEVEL,
            level,
            identifier,
            alrequired,
        }
    }
}

impl Tutorial {
    pub fn new(identifier: String, alrequired: bool) -> Self {
        let level = derive_level(&identifier);
        Tutorial {
            parent_lecture_id: derive_parent_lecture_id(&identifier),
            is_evening: level == EVENING_LEVEL,
            level,
            identifier,
            alrequired,
        }
    }
}

impl Section {
    pub fn identifier(&self) -> &str {
        match self {
            Section::Lecture(l) => &l.identifier,
            Section::Tutorial(t) => &t.identifier,
        }
    }

    pub fn alrequired(&self) -> bool {
        match self {
            Section::Lecture(l) => l.alrequired,
            Section::Tutorial(t) => t.alrequired,
        }
    }

    pub fn level(&self) -> u8 {
        match self {
            Section::Lecture(l) => l.level,
            Section::Tutorial(t) => t.level,
        }
    }

    pub fn is_evening(&self) -> bool {
        match self {
            Section::Lecture(l) => l.is_evening,
            Section::Tutorial(t) => t.is_evening,
        }
    }

    pub fn is_lec(&self) -> bool {
        matches!(self, Section::Lecture(_))
    }

    pub fn is_tut(&self) -> bool {
        matches!(self, Section::Tutorial(_))
    }

    pub fn kind(&self) -> SlotKind {
        if self.is_lec() {
            SlotKind::Lecture
        } else {
            SlotKind::Tutorial
        }
    }

    pub fn course_id(&self) -> Option<&str> {
        match self {
            Section::Lecture(l) => Some(&l.course_id),
            Section::Tutorial(_) => None,
        }
    }

    pub fn parent_lecture_id(&self) -> Option<&str> {
        match self {
            Section::Lecture(_) => None,
            Section::Tutorial(t) => Some(&t.parent_lecture_id),
        }
    }
}

/// The course number's leading digit, e.g. `"CPSC 231 LEC 01"` → `2`,
/// `"CPSC 913 LEC 01"` → `9`.
fn derive_level(identifier: &str) -> u8 {
    identifier
        .split_whitespace()
        .nth(1)
        .and_then(|num| num.chars().next())
        .and_then(|c| c.to_digit(10))
        .unwrap_or(0) as u8
}

/// Department + course number, e.g. `"CPSC 231 LEC 01"` → `"CPSC 231"`.
fn derive_course_id(identifier: &str) -> String {
    identifier.split_whitespace().take(2).collect::<Vec<_>>().join(" ")
}

/// The parent lecture's identifier: the first four tokens when a `LEC`
/// token is present, else department + number + `LEC 01`.
fn derive_parent_lecture_id(identifier: &str) -> String {
    let tokens: Vec<&str> = identifier.split_whitespace().collect();
    if tokens.iter().any(|t| *t == "LEC") {
        tokens.iter().take(4).cloned().collect::<Vec<_>>().join(" ")
    } else {
        let mut head: Vec<&str> = tokens.iter().take(2).cloned().collect();
        head.push("LEC");
        head.push("01");
        head.join(" ")
    }
}

#[derive(Debug, Clone)]
pub struct UnwantedEntry {
    pub day: String,
    pub start_time: f64,
}

#[derive(Debug, Clone)]
pub struct PreferenceEntry {
    pub day: String,
    pub start_time: f64,
    pub weighted_pen: i64,
}

#[derive(Debug, Clone)]
pub struct PartialAssignment {
    pub day: String,
    pub time: String,
}

/// The complete, immutable (aside from slot capacity counters) scheduling
/// problem: every section, every slot, and the cross-cutting constraint
/// tables, with all penalty weights already applied by the loader.
#[derive(Debug, Clone)]
pub struct Catalog {
    pub slots: Vec<Slot>,
    pub sections: HashMap<String, Section>,
    /// Insertion order of lecture identifiers, as submitted (or as
    /// reordered by an opted-in shuffle). Drives bucket construction.
    pub lecture_order: Vec<String>,
    /// Insertion order of tutorial identifiers.
    pub tutorial_order: Vec<String>,

    pub not_compatible: Vec<(String, String)>,
    pub unwanted: HashMap<String, Vec<UnwantedEntry>>,
    pub preferences: HashMap<String, Vec<PreferenceEntry>>,
    pub pair: Vec<(String, String)>,
    pub part_assign: HashMap<String, PartialAssignment>,

    pub pen_lec_min: i64,
    pub pen_tut_min: i64,
    pub pen_not_paired: i64,
    pub pen_section: i64,
}

impl Catalog {
    pub fn slot(&self, id: SlotId) -> &Slot {
        &self.slots[id.0]
    }

    pub fn slot_mut(&mut self, id: SlotId) -> &mut Slot {
        &mut self.slots[id.0]
    }

    pub fn section(&self, identifier: &str) -> Option<&Section> {
        self.sections.get(identifier)
    }
}
