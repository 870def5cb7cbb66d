use std::collections::{HashMap, HashSet};

use crate::model::{Member, Underlive};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RosterEntry<'a> {
    pub member: &'a Member,
    pub is_center: bool,
    pub center_label: Option<&'a str>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AbsentEntry<'a> {
    pub member: &'a Member,
    pub note: Option<&'a str>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Roster<'a> {
    pub event: &'a Underlive,
    pub display: Vec<RosterEntry<'a>>,
    pub absent: Vec<AbsentEntry<'a>>,
    pub show_absent: bool,
}

impl<'a> Roster<'a> {
    /// The absent list when the caller asked for it.
    pub fn visible_absent(&self) -> &[AbsentEntry<'a>] {
        if self.show_absent {
            &self.absent
        } else {
            &[]
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RosterView<'a> {
    /// The event collection is empty (not loaded, failed, or genuinely empty).
    NoEventData,
    /// Events exist but none matches the selected id.
    NotSelected,
    Resolved(Roster<'a>),
}

/// Lookup from member id to record. The first record wins on duplicate ids.
pub struct MemberIndex<'a> {
    by_id: HashMap<&'a str, &'a Member>,
}

impl<'a> MemberIndex<'a> {
    pub fn new(members: &'a [Member]) -> Self {
        let mut by_id = HashMap::with_capacity(members.len());
        for m in members {
            by_id.entry(m.id.as_str()).or_insert(m);
        }
        Self { by_id }
    }

    pub fn get(&self, id: &str) -> Option<&'a Member> {
        self.by_id.get(id).copied()
    }
}

pub fn resolve_roster<'a>(
    events: &'a [Underlive],
    selected_id: &str,
    members: &'a [Member],
    include_absent: bool,
) -> RosterView<'a> {
    if events.is_empty() {
        return RosterView::NoEventData;
    }
    match events.iter().find(|u| u.id == selected_id) {
        Some(event) => RosterView::Resolved(resolve_event(event, &MemberIndex::new(members), include_absent)),
        None => RosterView::NotSelected,
    }
}

pub fn resolve_event<'a>(
    event: &'a Underlive,
    index: &MemberIndex<'a>,
    include_absent: bool,
) -> Roster<'a> {
    let center_ids: HashSet<&str> = event
        .centers
        .as_deref()
        .unwrap_or_default()
        .iter()
        .map(|c| c.id.as_str())
        .collect();

    let resolved = event.member_ids.iter().filter_map(|id| index.get(id)).map(|member| {
        let center = event.center_for(&member.id);
        RosterEntry {
            member,
            is_center: center_ids.contains(member.id.as_str()),
            center_label: center.and_then(|c| c.label.as_deref()),
        }
    });

    let display = if center_ids.is_empty() {
        resolved.collect()
    } else {
        let (mut centers, others): (Vec<_>, Vec<_>) = resolved.partition(|e| e.is_center);
        centers.extend(others);
        centers
    };

    let absent = event
        .absent
        .as_deref()
        .unwrap_or_default()
        .iter()
        .filter_map(|a| {
            index.get(&a.id).map(|member| AbsentEntry {
                member,
                note: a.note.as_deref(),
            })
        })
        .collect();

    Roster {
        event,
        display,
        absent,
        show_absent: include_absent,
    }
}
