use std::fmt;

use serde::de::{self, Deserializer, Visitor};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Member {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gen: Option<String>,
    pub color1_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color2_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
}

impl Member {
    /// Only an explicit `true` counts; a missing flag means graduated.
    pub fn is_active(&self) -> bool {
        self.active == Some(true)
    }

    /// Profile links are only shown for current members.
    pub fn visible_profile_url(&self) -> Option<&str> {
        if self.is_active() {
            self.profile_url.as_deref()
        } else {
            None
        }
    }

    pub fn penlight_label(&self) -> String {
        match self.color2_name.as_deref() {
            Some(second) if !second.is_empty() => format!("{} x {}", self.color1_name, second),
            _ => self.color1_name.clone(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct AbsentMember {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Which part of a run a center applies to. Carried through from the data
/// but not consulted when ordering rosters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CenterScope {
    All,
    Day(u32),
}

impl CenterScope {
    pub fn parse(value: &str) -> Option<Self> {
        let trimmed = value.trim();
        if trimmed.eq_ignore_ascii_case("all") {
            return Some(Self::All);
        }
        let day = trimmed.strip_prefix("day")?;
        day.parse::<u32>().ok().filter(|n| *n > 0).map(Self::Day)
    }
}

impl fmt::Display for CenterScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Day(n) => write!(f, "day{n}"),
        }
    }
}

impl Serialize for CenterScope {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for CenterScope {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ScopeVisitor;

        impl<'de> Visitor<'de> for ScopeVisitor {
            type Value = CenterScope;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("\"all\" or \"day<N>\"")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<CenterScope, E> {
                CenterScope::parse(v)
                    .ok_or_else(|| E::invalid_value(de::Unexpected::Str(v), &self))
            }
        }

        deserializer.deserialize_str(ScopeVisitor)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Center {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<CenterScope>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Underlive {
    pub id: String,
    pub title: String,
    pub year: i32,
    #[serde(default)]
    pub dates: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub venue: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
    #[serde(default)]
    pub member_ids: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub absent: Option<Vec<AbsentMember>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub centers: Option<Vec<Center>>,
}

impl Underlive {
    /// `first` for single-day runs, `first 〜 last` otherwise.
    pub fn date_range(&self) -> Option<String> {
        let first = self.dates.first()?;
        match self.dates.last() {
            Some(last) if self.dates.len() > 1 => Some(format!("{first} 〜 {last}")),
            _ => Some(first.clone()),
        }
    }

    pub fn center_for(&self, member_id: &str) -> Option<&Center> {
        self.centers
            .as_deref()
            .unwrap_or_default()
            .iter()
            .find(|c| c.id == member_id)
    }
}
