use std::io::Write;

use crate::color::{self, Swatch};
use crate::dataset::{self, DataSource, DatasetStore, MemberFormat};
use crate::filter::{self, MemberFilter};
use crate::model::{AbsentMember, Center, Member, Underlive};
use crate::output::{self, MemberCard, UnderlivePanel};
use crate::roster::{self, RosterView};
use crate::runner::{Options, Runner};
use crate::state::{self, Action, AppState};
use crate::urlstate::{self, InputEvent, LocationAdapter, RouteMode, SearchInput, Tab, ViewState};

fn member(id: &str, name: &str, gen: &str, color: &str, active: Option<bool>) -> Member {
    Member {
        id: id.to_string(),
        name: name.to_string(),
        gen: Some(gen.to_string()),
        color1_name: color.to_string(),
        active,
        ..Member::default()
    }
}

fn event(id: &str, member_ids: &[&str]) -> Underlive {
    Underlive {
        id: id.to_string(),
        title: format!("Under {id}"),
        year: 2024,
        dates: vec!["2024-03-01".to_string(), "2024-03-03".to_string()],
        venue: None,
        source_url: None,
        member_ids: member_ids.iter().map(|s| s.to_string()).collect(),
        absent: None,
        centers: None,
    }
}

fn base() -> url::Url {
    urlstate::parse_base("https://example.github.io/nogi-psyllium/").unwrap()
}

#[test]
fn unrecognized_color_falls_back_to_placeholder_with_black_text() {
    assert_eq!(color::resolve_color("虹色"), None);
    let swatch = Swatch::for_name("虹色");
    assert!(!swatch.recognized);
    assert_eq!(swatch.background, color::PLACEHOLDER_HEX);
    assert_eq!(swatch.text, color::TEXT_BLACK);
}

#[test]
fn contrast_text_follows_luminance() {
    assert_eq!(color::contrast_text_color("#FFFFFF"), "#000000");
    assert_eq!(color::contrast_text_color("#000000"), "#ffffff");
    assert_eq!(color::contrast_text_color("#FF0000"), "#000000");
}

#[test]
fn graduated_members_hidden_unless_requested() {
    let members = vec![
        member("a", "A", "1期", "白", Some(true)),
        member("b", "B", "1期", "白", Some(false)),
        member("c", "C", "2期", "白", None),
    ];
    let hidden = filter::filter_members(&members, &MemberFilter::default());
    assert!(hidden.iter().all(|m| m.is_active()));
    assert_eq!(hidden.len(), 1);

    let all = filter::filter_members(
        &members,
        &MemberFilter {
            include_graduated: true,
            ..MemberFilter::default()
        },
    );
    let ids: Vec<&str> = all.iter().map(|m| m.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b", "c"]);
}

#[test]
fn generation_facets_sorted_unique_non_empty() {
    let mut members = vec![
        member("a", "A", "3期", "白", Some(true)),
        member("b", "B", "1期", "白", Some(true)),
        member("c", "C", "3期", "白", Some(false)),
        member("d", "D", "", "白", Some(true)),
    ];
    members.push(Member {
        gen: None,
        ..member("e", "E", "", "白", Some(true))
    });
    assert_eq!(filter::generations(&members), vec!["1期", "3期"]);
}

#[test]
fn centers_lead_and_unknown_ids_are_skipped() {
    let members = vec![
        member("A", "A", "1期", "白", Some(true)),
        member("B", "B", "1期", "白", Some(true)),
        member("C", "C", "1期", "白", Some(true)),
    ];
    let mut ul = event("e1", &["A", "B", "C"]);
    ul.centers = Some(vec![Center {
        id: "B".to_string(),
        label: None,
        scope: None,
    }]);
    let resolved = roster::resolve_event(&ul, &roster::MemberIndex::new(&members), false);
    let ids: Vec<&str> = resolved.display.iter().map(|e| e.member.id.as_str()).collect();
    assert_eq!(ids, vec!["B", "A", "C"]);

    let ul = event("e2", &["A", "X"]);
    let resolved = roster::resolve_event(&ul, &roster::MemberIndex::new(&members), false);
    assert_eq!(resolved.display.len(), 1);
    assert_eq!(resolved.display[0].member.id, "A");
}

#[test]
fn absent_list_does_not_depend_on_visibility() {
    let members = vec![
        member("A", "A", "1期", "白", Some(true)),
        member("B", "B", "1期", "白", Some(true)),
    ];
    let mut ul = event("e1", &["A", "B"]);
    ul.absent = Some(vec![AbsentMember {
        id: "B".to_string(),
        note: Some("体調不良".to_string()),
    }]);
    let events = vec![ul];
    let hidden = roster::resolve_roster(&events, "e1", &members, false);
    let shown = roster::resolve_roster(&events, "e1", &members, true);
    let (RosterView::Resolved(hidden), RosterView::Resolved(shown)) = (hidden, shown) else {
        panic!("expected resolved rosters");
    };
    assert_eq!(hidden.absent, shown.absent);
    assert!(hidden.visible_absent().is_empty());
    assert_eq!(shown.visible_absent().len(), 1);
    assert_eq!(shown.display.len(), 1);
}

#[test]
fn url_round_trip_with_japanese_query() {
    let state = ViewState {
        query: "坂".to_string(),
        ..ViewState::default()
    };
    for mode in [RouteMode::Path, RouteMode::Hash] {
        let url = urlstate::encode(&state, &base(), mode);
        assert_eq!(urlstate::decode(&url, &base(), mode), state);
    }
}

#[test]
fn first_event_auto_selected() {
    let events = vec![event("e1", &[]), event("e2", &[])];
    let mut location = LocationAdapter::new(base(), RouteMode::Path, &ViewState::default());
    assert_eq!(location.reconcile_selection(&events), Some("e1".to_string()));
    assert_eq!(location.state().selected_id, "e1");

    let stale = ViewState {
        selected_id: "gone".to_string(),
        ..ViewState::default()
    };
    let mut location = LocationAdapter::new(base(), RouteMode::Hash, &stale);
    assert_eq!(location.reconcile_selection(&events), Some("e1".to_string()));
    assert_eq!(location.history_len(), 1);
}

#[test]
fn composition_commits_once_into_location() {
    let mut location = LocationAdapter::new(base(), RouteMode::Path, &ViewState::default());
    let mut input = SearchInput::new("");
    assert!(!input.apply(InputEvent::CompositionStart, &mut location));
    assert!(!input.apply(InputEvent::Input("さか".to_string()), &mut location));
    assert_eq!(location.state().query, "");
    assert!(input.apply(InputEvent::CompositionEnd("坂".to_string()), &mut location));
    assert_eq!(location.state().query, "坂");
    assert_eq!(location.history_len(), 1);
}

#[test]
fn tab_history_and_filters_survive_back() {
    let mut location = LocationAdapter::new(base(), RouteMode::Path, &ViewState::default());
    location.update(|s| s.gen = "5期".to_string());
    location.navigate(Tab::Underlive);
    location.update(|s| s.selected_id = "e1".to_string());
    assert_eq!(location.history_len(), 2);

    let back = location.back().unwrap();
    assert_eq!(back.tab, Tab::Penlight);
    assert_eq!(back.gen, "5期");
    let forward = location.forward().unwrap();
    assert_eq!(forward.selected_id, "e1");
}

#[test]
fn reducer_keeps_member_failure_fatal_and_event_failure_soft() {
    let app = AppState::new(ViewState::default());
    let app = state::reduce(app, Action::UnderlivesFailed("HTTP 404".to_string()));
    assert!(app.fatal_error().is_none());
    let app = state::reduce(app, Action::MembersFailed("HTTP 500".to_string()));
    assert_eq!(app.fatal_error(), Some("HTTP 500"));
    assert!(!app.is_loading());
}

#[test]
fn report_for_underlive_tab_lists_resolved_event() {
    let members = vec![
        member("A", "A", "1期", "白", Some(true)),
        member("B", "B", "1期", "紫", Some(true)),
    ];
    let events = vec![event("e1", &["A", "B"])];
    let store = DatasetStore::new(members.clone(), events.clone());
    let view = ViewState {
        tab: Tab::Underlive,
        selected_id: "e1".to_string(),
        ..ViewState::default()
    };
    let roster = roster::resolve_roster(store.underlives(), &view.selected_id, store.members(), false);
    match output::underlive_panel(&roster, store.underlives()) {
        UnderlivePanel::Selected { events, event } => {
            assert_eq!(events.len(), 1);
            assert_eq!(event.members.len(), 2);
            assert_eq!(event.dates.as_deref(), Some("2024-03-01 〜 2024-03-03"));
        }
        other => panic!("unexpected panel {other:?}"),
    }
    let card = MemberCard::from_member(&members[1]);
    assert!(card.colors[0].recognized);
}

#[test]
fn csv_and_json_members_agree() {
    let csv = "id,name,gen,color1_name,color2_name,active\na,A,1期,白,,true\n";
    let json = r#"[{"id":"a","name":"A","gen":"1期","color1_name":"白","active":true}]"#;
    let from_csv = dataset::csv::parse_members("members.csv", csv).unwrap();
    let from_json = dataset::parse_members_json("members.json", json).unwrap();
    assert_eq!(from_csv, from_json);
    assert_eq!(MemberFormat::infer(&DataSource::parse("members.csv")), MemberFormat::Csv);
}

#[tokio::test]
async fn runner_loads_local_files_and_auto_selects() {
    let dir = tempfile::tempdir().unwrap();
    let members_path = dir.path().join("members.json");
    let underlives_path = dir.path().join("underlives.json");
    let mut f = std::fs::File::create(&members_path).unwrap();
    writeln!(
        f,
        r#"[{{"id":"a","name":"A","gen":"1期","color1_name":"白","active":true}}]"#
    )
    .unwrap();
    let mut f = std::fs::File::create(&underlives_path).unwrap();
    writeln!(
        f,
        r#"[{{"id":"e1","title":"U1","year":2024,"dates":[],"member_ids":["a"]}},{{"id":"e2","title":"U2","year":2024,"dates":[],"member_ids":[]}}]"#
    )
    .unwrap();

    let runner = Runner::new(Options {
        members: members_path.display().to_string(),
        underlives: Some(underlives_path.display().to_string()),
        view: ViewState {
            tab: Tab::Underlive,
            ..ViewState::default()
        },
        ..Options::default()
    })
    .unwrap();
    let result = runner.run().await.unwrap();
    assert_eq!(result.auto_selected.as_deref(), Some("e1"));
    assert_eq!(result.state.view().selected_id, "e1");
    assert!(result.location.link().ends_with("/underlive?id=e1"));

    let report = output::build_report(&result, None);
    assert!(report.error.is_none());
    assert!(matches!(report.underlive, Some(UnderlivePanel::Selected { .. })));
}
