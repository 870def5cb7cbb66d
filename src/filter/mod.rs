use std::collections::BTreeSet;

use crate::model::Member;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MemberFilter {
    pub query: String,
    pub gen: String,
    pub include_graduated: bool,
}

impl MemberFilter {
    pub fn matches(&self, member: &Member) -> bool {
        if !self.include_graduated && !member.is_active() {
            return false;
        }
        if !self.gen.is_empty() && member.gen.as_deref() != Some(self.gen.as_str()) {
            return false;
        }
        if self.query.is_empty() {
            return true;
        }
        let needle = self.query.to_lowercase();
        searchable_fields(member).any(|field| field.to_lowercase().contains(&needle))
    }
}

fn searchable_fields(member: &Member) -> impl Iterator<Item = &str> {
    [
        Some(member.name.as_str()),
        member.gen.as_deref(),
        Some(member.color1_name.as_str()),
        member.color2_name.as_deref(),
    ]
    .into_iter()
    .flatten()
    .filter(|s| !s.is_empty())
}

/// Members passing `filter`, in input order.
pub fn filter_members<'a>(members: &'a [Member], filter: &MemberFilter) -> Vec<&'a Member> {
    members.iter().filter(|m| filter.matches(m)).collect()
}

/// Distinct non-empty generation labels across every loaded member.
pub fn generations(members: &[Member]) -> Vec<String> {
    members
        .iter()
        .filter_map(|m| m.gen.as_deref())
        .filter(|g| !g.is_empty())
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(id: &str, name: &str, gen: Option<&str>, active: Option<bool>) -> Member {
        Member {
            id: id.to_string(),
            name: name.to_string(),
            gen: gen.map(str::to_string),
            color1_name: "白".to_string(),
            color2_name: None,
            icon: None,
            profile_url: None,
            active,
        }
    }

    fn roster() -> Vec<Member> {
        vec![
            member("a", "Asuka", Some("3期"), Some(true)),
            member("b", "Mai", Some("1期"), Some(false)),
            member("c", "Nanase", Some("1期"), None),
            member("d", "Yuki", Some("4期"), Some(true)),
            member("e", "Haruka", None, Some(true)),
        ]
    }

    fn ids(list: &[&Member]) -> Vec<String> {
        list.iter().map(|m| m.id.clone()).collect()
    }

    #[test]
    fn graduated_excluded_by_default() {
        let members = roster();
        let out = filter_members(&members, &MemberFilter::default());
        assert_eq!(ids(&out), vec!["a", "d", "e"]);
        assert!(out.iter().all(|m| m.active == Some(true)));
    }

    #[test]
    fn empty_criteria_with_graduates_returns_everything_in_order() {
        let members = roster();
        let filter = MemberFilter {
            include_graduated: true,
            ..MemberFilter::default()
        };
        let out = filter_members(&members, &filter);
        assert_eq!(ids(&out), vec!["a", "b", "c", "d", "e"]);
    }

    #[test]
    fn gen_filter_is_exact() {
        let members = roster();
        let filter = MemberFilter {
            gen: "1".to_string(),
            include_graduated: true,
            ..MemberFilter::default()
        };
        assert!(filter_members(&members, &filter).is_empty());
        let filter = MemberFilter {
            gen: "1期".to_string(),
            include_graduated: true,
            ..MemberFilter::default()
        };
        assert_eq!(ids(&filter_members(&members, &filter)), vec!["b", "c"]);
    }

    #[test]
    fn query_is_case_insensitive_over_several_fields() {
        let mut members = roster();
        members[3].color2_name = Some("Turquoise".to_string());
        let filter = MemberFilter {
            query: "TURQ".to_string(),
            ..MemberFilter::default()
        };
        assert_eq!(ids(&filter_members(&members, &filter)), vec!["d"]);

        let filter = MemberFilter {
            query: "4期".to_string(),
            ..MemberFilter::default()
        };
        assert_eq!(ids(&filter_members(&members, &filter)), vec!["d"]);

        let filter = MemberFilter {
            query: "ASU".to_string(),
            ..MemberFilter::default()
        };
        assert_eq!(ids(&filter_members(&members, &filter)), vec!["a"]);
    }

    #[test]
    fn criteria_are_a_conjunction() {
        let members = roster();
        let filter = MemberFilter {
            query: "a".to_string(),
            gen: "1期".to_string(),
            include_graduated: false,
        };
        assert!(filter_members(&members, &filter).is_empty());
    }

    #[test]
    fn generations_are_sorted_unique_and_non_empty() {
        let mut members = roster();
        members.push(member("f", "Empty", Some(""), Some(true)));
        members.push(member("g", "Dup", Some("3期"), Some(true)));
        assert_eq!(generations(&members), vec!["1期", "3期", "4期"]);
    }
}
