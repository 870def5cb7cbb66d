pub mod text;

use serde::Serialize;

use crate::color::Swatch;
use crate::model::Member;
use crate::quiz::Question;
use crate::roster::{RosterEntry, RosterView};
use crate::runner::ViewResult;
use crate::urlstate::{Tab, ViewState};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "text" | "txt" => Some(Self::Text),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct MemberCard {
    pub id: String,
    pub name: String,
    pub gen: Option<String>,
    pub colors: Vec<Swatch>,
    pub profile_url: Option<String>,
    pub is_center: bool,
    pub center_label: Option<String>,
}

impl MemberCard {
    pub fn from_member(member: &Member) -> Self {
        let mut colors = vec![Swatch::for_name(&member.color1_name)];
        // A second color is only shown when it resolves.
        if let Some(second) = member.color2_name.as_deref().filter(|c| !c.is_empty()) {
            let swatch = Swatch::for_name(second);
            if swatch.recognized {
                colors.push(swatch);
            }
        }
        Self {
            id: member.id.clone(),
            name: member.name.clone(),
            gen: member.gen.clone(),
            colors,
            profile_url: member.visible_profile_url().map(str::to_string),
            is_center: false,
            center_label: None,
        }
    }

    pub fn from_entry(entry: &RosterEntry<'_>) -> Self {
        Self {
            is_center: entry.is_center,
            center_label: entry.center_label.map(str::to_string),
            ..Self::from_member(entry.member)
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct AbsentRecord {
    pub id: String,
    pub name: String,
    pub note: Option<String>,
}

#[derive(Clone, Debug, Serialize)]
pub struct UnderliveRecord {
    pub id: String,
    pub title: String,
    pub year: i32,
    pub dates: Option<String>,
    pub venue: Option<String>,
    pub source_url: Option<String>,
    pub members: Vec<MemberCard>,
    pub absent_count: usize,
    pub absent: Vec<AbsentRecord>,
}

#[derive(Clone, Debug, Serialize)]
pub struct EventOption {
    pub id: String,
    pub title: String,
}

#[derive(Clone, Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum UnderlivePanel {
    NoEventData,
    NotSelected { events: Vec<EventOption> },
    Selected {
        events: Vec<EventOption>,
        event: UnderliveRecord,
    },
}

#[derive(Clone, Debug, Serialize)]
pub struct QuizRecord {
    pub member_id: String,
    pub prompt: String,
    pub gen: Option<String>,
    pub answer: Option<String>,
}

impl QuizRecord {
    pub fn from_question(q: &Question<'_>) -> Self {
        Self {
            member_id: q.member.id.clone(),
            prompt: q.prompt(),
            gen: q.member.gen.clone(),
            answer: q.answered.then(|| q.answer()),
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct ViewReport {
    pub link: String,
    pub view: ViewState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub generations: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub members: Vec<MemberCard>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub underlive: Option<UnderlivePanel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quiz: Option<QuizRecord>,
}

pub fn underlive_panel(view: &RosterView<'_>, events: &[crate::model::Underlive]) -> UnderlivePanel {
    let options = || {
        events
            .iter()
            .map(|u| EventOption {
                id: u.id.clone(),
                title: u.title.clone(),
            })
            .collect::<Vec<_>>()
    };
    match view {
        RosterView::NoEventData => UnderlivePanel::NoEventData,
        RosterView::NotSelected => UnderlivePanel::NotSelected { events: options() },
        RosterView::Resolved(roster) => {
            let event = roster.event;
            UnderlivePanel::Selected {
                events: options(),
                event: UnderliveRecord {
                    id: event.id.clone(),
                    title: event.title.clone(),
                    year: event.year,
                    dates: event.date_range(),
                    venue: event.venue.clone(),
                    source_url: event.source_url.clone(),
                    members: roster.display.iter().map(MemberCard::from_entry).collect(),
                    absent_count: roster.absent.len(),
                    absent: roster
                        .visible_absent()
                        .iter()
                        .map(|a| AbsentRecord {
                            id: a.member.id.clone(),
                            name: a.member.name.clone(),
                            note: a.note.map(str::to_string),
                        })
                        .collect(),
                },
            }
        }
    }
}

/// Builds the machine-readable view of the active tab.
pub fn build_report(result: &ViewResult, question: Option<&Question<'_>>) -> ViewReport {
    let state = &result.state;
    let view = state.view().clone();
    let mut report = ViewReport {
        link: result.location.link(),
        error: state.fatal_error().map(str::to_string),
        generations: state.generations(),
        count: None,
        members: Vec::new(),
        underlive: None,
        quiz: None,
        view,
    };
    if report.error.is_some() {
        return report;
    }
    match report.view.tab {
        Tab::Penlight => {
            let filtered = state.filtered_members();
            report.count = Some(filtered.len());
            report.members = filtered.into_iter().map(MemberCard::from_member).collect();
        }
        Tab::Underlive => {
            report.underlive = Some(underlive_panel(&state.roster(), state.underlives()));
        }
        Tab::Quiz => {
            report.quiz = question.map(QuizRecord::from_question);
        }
    }
    report
}

pub fn render_json(report: &ViewReport) -> Result<Vec<u8>, String> {
    let mut out =
        serde_json::to_vec_pretty(report).map_err(|e| format!("failed to serialize report: {e}"))?;
    out.push(b'\n');
    Ok(out)
}
