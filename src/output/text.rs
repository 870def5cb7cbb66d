use std::fmt::Write;

use colored::{ColoredString, Colorize};

use super::{MemberCard, QuizRecord, UnderlivePanel, UnderliveRecord, ViewReport};
use crate::color::{self, Swatch};
use crate::urlstate::Tab;

const RULE: &str = "----------------------------------------------------------";

fn chip(swatch: &Swatch) -> ColoredString {
    let (r, g, b) = swatch.rgb();
    let (tr, tg, tb) = swatch.text_rgb();
    format!(" {} ", swatch.name)
        .truecolor(tr, tg, tb)
        .on_truecolor(r, g, b)
}

fn kv(out: &mut String, label: &str, value: &str) {
    let _ = writeln!(
        out,
        "{}  {:<12}{} {}",
        ">".bold().green(),
        label.bold().white(),
        ":".bold().white(),
        value.cyan()
    );
}

fn card_line(card: &MemberCard) -> String {
    let mut line = String::from("  ");
    if card.is_center {
        line.push_str("👑 ");
    }
    line.push_str(&card.name.bold().to_string());
    if let Some(gen) = card.gen.as_deref() {
        let _ = write!(line, " {}", gen.dimmed());
    }
    if let Some(label) = card.center_label.as_deref() {
        let _ = write!(line, " ({label})");
    }
    for swatch in &card.colors {
        let _ = write!(line, " {}", chip(swatch));
    }
    if let Some(url) = card.profile_url.as_deref() {
        let _ = write!(line, " 🔗 {}", url.underline());
    }
    line
}

fn render_penlight(out: &mut String, report: &ViewReport) {
    let gen_label = if report.view.gen.is_empty() {
        "すべての期".to_string()
    } else {
        report.view.gen.clone()
    };
    let query = if report.view.query.is_empty() {
        "-"
    } else {
        report.view.query.as_str()
    };
    kv(out, "Search", query);
    kv(out, "Generation", &gen_label);
    kv(out, "Generations", &report.generations.join(", "));
    kv(out, "Graduated", if report.view.include_graduated { "included" } else { "hidden" });
    out.push_str(&RULE.bold().white().to_string());
    out.push('\n');
    let _ = writeln!(out, "{}件表示", report.count.unwrap_or(report.members.len()));
    for card in &report.members {
        out.push_str(&card_line(card));
        out.push('\n');
    }
}

fn render_event(out: &mut String, event: &UnderliveRecord, show_absent: bool) {
    let _ = writeln!(out, "{} ({})", event.title.bold(), event.year);
    let mut meta: Vec<String> = Vec::new();
    if let Some(dates) = event.dates.as_deref() {
        meta.push(dates.to_string());
    }
    if let Some(venue) = event.venue.as_deref() {
        meta.push(venue.to_string());
    }
    if let Some(src) = event.source_url.as_deref() {
        meta.push(format!("出典 {src}"));
    }
    if !meta.is_empty() {
        let _ = writeln!(out, "  {}", meta.join(" | ").dimmed());
    }
    out.push_str(&RULE.bold().white().to_string());
    out.push('\n');
    let _ = writeln!(out, "出演メンバー {}名", event.members.len());
    for card in &event.members {
        out.push_str(&card_line(card));
        out.push('\n');
    }
    if event.absent_count == 0 {
        return;
    }
    out.push('\n');
    let mark = if show_absent { "[x]" } else { "[ ]" };
    let _ = writeln!(out, "{mark} 欠席メンバーを表示（{}名）", event.absent_count);
    for a in &event.absent {
        match a.note.as_deref() {
            Some(note) => {
                let _ = writeln!(out, "  - {} — {}", a.name, note.dimmed());
            }
            None => {
                let _ = writeln!(out, "  - {}", a.name);
            }
        }
    }
}

fn render_underlive(out: &mut String, panel: &UnderlivePanel, show_absent: bool) {
    match panel {
        UnderlivePanel::NoEventData => {
            out.push_str("アンダーライブデータがありません\n");
        }
        UnderlivePanel::NotSelected { events } => {
            out.push_str("公演を選択してください\n");
            for e in events {
                let _ = writeln!(out, "  {} {}", e.id.cyan(), e.title);
            }
        }
        UnderlivePanel::Selected { events, event } => {
            let titles: Vec<String> = events
                .iter()
                .map(|e| {
                    if e.id == event.id {
                        format!("[{}]", e.id).bold().to_string()
                    } else {
                        e.id.clone()
                    }
                })
                .collect();
            kv(out, "Events", &titles.join(" "));
            render_event(out, event, show_absent);
        }
    }
}

pub fn render_quiz(out: &mut String, quiz: Option<&QuizRecord>) {
    let Some(q) = quiz else {
        out.push_str("メンバーデータがありません\n");
        return;
    };
    let _ = writeln!(out, "{}", q.prompt.bold());
    if let Some(gen) = q.gen.as_deref() {
        let _ = writeln!(out, "  {}", gen.dimmed());
    }
    match q.answer.as_deref() {
        Some(answer) => {
            let _ = writeln!(out, "{}", answer.green());
        }
        None => out.push_str("(答えを見る: Enter)\n"),
    }
}

/// Legend of the penlight's color-change order.
pub fn render_cycle() -> String {
    let parts: Vec<String> = color::COLOR_CYCLE
        .iter()
        .map(|name| chip(&Swatch::for_name(name)).to_string())
        .collect();
    format!("ペンライト 色変更順\n{}\n", parts.join(" → "))
}

pub fn render_text(report: &ViewReport, show_cycle: bool) -> String {
    let mut out = String::new();
    if let Some(err) = report.error.as_deref() {
        let _ = writeln!(
            out,
            "{}{}{} エラー: {}",
            "[".bold().white(),
            "ERR".bold().red(),
            "]".bold().white(),
            err
        );
        return out;
    }
    let tabs: Vec<String> = Tab::ALL
        .iter()
        .map(|t| {
            if *t == report.view.tab {
                format!("[{t}]").bold().green().to_string()
            } else {
                t.to_string()
            }
        })
        .collect();
    let _ = writeln!(out, "{}", tabs.join("  "));
    match report.view.tab {
        Tab::Penlight => render_penlight(&mut out, report),
        Tab::Underlive => {
            if let Some(panel) = report.underlive.as_ref() {
                render_underlive(&mut out, panel, report.view.show_absent);
            }
        }
        Tab::Quiz => render_quiz(&mut out, report.quiz.as_ref()),
    }
    if show_cycle {
        out.push('\n');
        out.push_str(&render_cycle());
    }
    out.push('\n');
    let _ = writeln!(out, ":: {:<10}: {}", "Link", report.link);
    out
}
