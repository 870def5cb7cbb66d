use std::time::Duration;

use clap::{error::ErrorKind, CommandFactory, Parser};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use log::{debug, info, warn};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::cli::args::CliArgs;
use crate::cli::validation;
use crate::clipboard;
use crate::config::{self, ConfigFile};
use crate::dataset::MemberFormat;
use crate::output::{self, text, OutputFormat, QuizRecord};
use crate::quiz::Quiz;
use crate::runner::{self, Options, Runner, ViewResult};
use crate::urlstate::{
    self, InputEvent, LocationAdapter, RouteMode, SearchInput, Tab, ViewState,
};

fn format_kv_line(label: &str, value: &str) {
    eprintln!(":: {:<10}: {}", label, value);
}

fn arg_usage(arg: &clap::Arg) -> String {
    let mut parts: Vec<String> = Vec::new();
    if let Some(short) = arg.get_short() {
        parts.push(format!("-{short}"));
    }
    if let Some(long) = arg.get_long() {
        parts.push(format!("--{long}"));
    }
    for alias in arg.get_visible_aliases().unwrap_or_default() {
        parts.push(format!("--{alias}"));
    }
    let mut usage = parts.join(", ");
    if arg.get_action().takes_values() {
        let value_name = arg
            .get_value_names()
            .and_then(|names| names.first())
            .map(|name| name.as_str())
            .unwrap_or("VALUE");
        usage.push_str(&format!(" <{value_name}>"));
    }
    usage
}

/// Help grouped by `help_heading`, in declaration order.
fn render_custom_help() -> String {
    let cmd = CliArgs::command();
    let mut out = format!("{} {}\n", cmd.get_name(), cmd.get_version().unwrap_or_default());
    if let Some(long_about) = cmd.get_long_about() {
        out.push_str(&format!("{long_about}\n"));
    }
    out.push_str(&format!("\nUsage: {} [OPTIONS]\n", cmd.get_name()));

    let mut sections: Vec<(&str, Vec<&clap::Arg>)> = Vec::new();
    for arg in cmd.get_arguments().filter(|a| !a.is_hide_set()) {
        let heading = arg.get_help_heading().unwrap_or("Options");
        match sections.iter_mut().find(|entry| entry.0 == heading) {
            Some((_, args)) => args.push(arg),
            None => sections.push((heading, vec![arg])),
        }
    }

    for (heading, args) in sections {
        out.push_str(&format!("\n{heading}:\n"));
        for arg in args {
            out.push_str(&format!("  {}\n", arg_usage(arg)));
            if let Some(help) = arg.get_help() {
                out.push_str(&format!("          {}\n", help.to_string().trim()));
            }
        }
    }
    out
}

fn format_bool(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}

#[derive(Debug)]
struct RunConfig {
    options: Options,
    output_format: OutputFormat,
    no_color: bool,
    show_cycle: bool,
    interactive: bool,
    reveal: bool,
    seed: Option<u64>,
    copy: bool,
}

/// Seeds the location from `--link` (or the configured defaults) and then
/// overlays the individual view flags. Flags edit the current entry and only
/// `--tab` pushes one, the same way an interactive session would.
fn initial_view(args: &CliArgs, cfg: &ConfigFile, base: url::Url, mode: RouteMode) -> Result<ViewState, String> {
    let mut location = match args.link.as_deref() {
        Some(raw) => {
            let link = urlstate::parse_location(raw).map_err(|e| format!("invalid --link: {e}"))?;
            LocationAdapter::from_location(base, mode, &link)
        }
        None => {
            let defaults = ViewState {
                include_graduated: cfg.include_graduated.unwrap_or(false),
                show_absent: cfg.show_absent.unwrap_or(false),
                ..ViewState::default()
            };
            LocationAdapter::new(base, mode, &defaults)
        }
    };

    if let Some(query) = args.query.clone() {
        let mut input = SearchInput::new(&location.state().query);
        input.apply(InputEvent::Input(query), &mut location);
    }
    if let Some(gen) = args.gen.clone() {
        location.update(|s| s.gen = gen.trim().to_string());
    }
    if args.graduated {
        location.update(|s| s.include_graduated = true);
    }
    if let Some(id) = args.id.clone() {
        location.update(|s| s.selected_id = id.trim().to_string());
    }
    if args.absent {
        location.update(|s| s.show_absent = true);
    }
    if let Some(raw) = args.tab.as_deref() {
        let tab = Tab::parse(raw).map_err(|e| format!("invalid --tab: {e}"))?;
        location.navigate(tab);
    }
    debug!(
        "event=initial_view module=app link={} history={}",
        location.link(),
        location.history_len()
    );
    Ok(location.state())
}

fn build_run_config(args: CliArgs, cfg: ConfigFile) -> Result<RunConfig, String> {
    validation::validate(&args)?;

    let no_color = if args.color {
        false
    } else {
        args.no_color || cfg.no_color.unwrap_or(false)
    };
    let show_cycle = !args.no_cycle && cfg.show_cycle.unwrap_or(true);

    let output_format_raw = args
        .output_format
        .clone()
        .or(cfg.output_format.clone())
        .unwrap_or_else(|| "text".to_string());
    let output_format = OutputFormat::parse(&output_format_raw)
        .ok_or_else(|| format!("invalid output format '{output_format_raw}', expected text or json"))?;

    let route_mode_raw = args
        .route_mode
        .clone()
        .or(cfg.route_mode.clone())
        .unwrap_or_else(|| "path".to_string());
    let route_mode = RouteMode::parse(&route_mode_raw).map_err(|e| format!("invalid route mode: {e}"))?;

    let base_url = args
        .base_url
        .clone()
        .or(cfg.base_url.clone())
        .unwrap_or_else(|| runner::DEFAULT_BASE_URL.to_string());
    let base = urlstate::parse_base(&base_url).map_err(|e| format!("invalid base URL: {e}"))?;

    let members_format = match args.members_format.clone().or(cfg.members_format.clone()) {
        Some(raw) => Some(MemberFormat::parse(&raw).map_err(|e| format!("invalid members format: {e}"))?),
        None => None,
    };

    let timeout = args.timeout.or(cfg.timeout).unwrap_or(10);
    if timeout == 0 {
        return Err("invalid timeout, expected positive integer".to_string());
    }

    let view = initial_view(&args, &cfg, base, route_mode)?;

    let options = Options {
        members: args
            .members
            .clone()
            .or(cfg.members.clone())
            .unwrap_or_else(|| runner::DEFAULT_MEMBERS.to_string()),
        members_format,
        underlives: Some(
            args.underlives
                .clone()
                .or(cfg.underlives.clone())
                .unwrap_or_else(|| runner::DEFAULT_UNDERLIVES.to_string()),
        ),
        base_url,
        route_mode,
        view,
        timeout_seconds: timeout,
        proxy: args.proxy.clone().or(cfg.proxy.clone()).filter(|p| !p.trim().is_empty()),
    };

    Ok(RunConfig {
        options,
        output_format,
        no_color,
        show_cycle,
        interactive: args.interactive,
        reveal: args.reveal,
        seed: args.seed,
        copy: args.copy,
    })
}

fn print_summary(run: &RunConfig) {
    let o = &run.options;
    format_kv_line("Members", &o.members);
    format_kv_line("Underlives", o.underlives.as_deref().unwrap_or("-"));
    format_kv_line("Base URL", &o.base_url);
    format_kv_line("Tab", o.view.tab.label());
    format_kv_line("Graduated", format_bool(o.view.include_graduated));
    format_kv_line("Timeout", &o.timeout_seconds.to_string());
    if let Some(proxy) = o.proxy.as_deref() {
        format_kv_line("Proxy", proxy);
    }
    eprintln!();
}

fn spinner() -> Result<ProgressBar, String> {
    let pb = ProgressBar::new_spinner();
    pb.set_draw_target(ProgressDrawTarget::stderr());
    pb.enable_steady_tick(Duration::from_millis(120));
    pb.set_style(
        ProgressStyle::with_template(":: Loading: {spinner} [{elapsed_precise}] :: {msg}")
            .map_err(|e| format!("failed to build progress bar style: {e}"))?,
    );
    pb.set_message("members / underlives");
    Ok(pb)
}

/// Question-and-answer loop on stdin: Enter reveals, Enter again draws the
/// next question, `q` quits.
async fn run_quiz_loop(quiz: &mut Quiz<'_>) -> Result<(), String> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let mut out = String::new();
        text::render_quiz(&mut out, quiz.current().map(QuizRecord::from_question).as_ref());
        print!("{out}");
        let Some(current) = quiz.current() else {
            return Ok(());
        };
        let answered = current.answered;

        let line = lines
            .next_line()
            .await
            .map_err(|e| format!("failed to read stdin: {e}"))?;
        match line.as_deref().map(str::trim) {
            None | Some("q") | Some("quit") => return Ok(()),
            Some(_) if answered => {
                quiz.next();
                println!();
            }
            Some(_) => {
                quiz.reveal();
            }
        }
    }
}

fn print_report(run: &RunConfig, result: &ViewResult, quiz: Option<&Quiz<'_>>) -> Result<(), String> {
    let question = quiz.and_then(|q| q.current());
    let report = output::build_report(result, question);
    match run.output_format {
        OutputFormat::Json => {
            let bytes = output::render_json(&report)?;
            print!("{}", String::from_utf8_lossy(&bytes));
        }
        OutputFormat::Text => {
            print!("{}", text::render_text(&report, run.show_cycle));
        }
    }
    Ok(())
}

/// Copies `link` to the clipboard and returns the status line for stderr.
/// A failed copy only warns; every view already prints the link.
fn copy_link(link: &str) -> String {
    match clipboard::copy_to_clipboard(link) {
        Ok(backend) => {
            info!("event=link_copied module=app backend={backend}");
            format!(":: Copied    : {link} ({backend})")
        }
        Err(e) => {
            warn!("event=link_copy_failed module=app reason={e}");
            format!(":: Copy failed: {e}; use the link printed above")
        }
    }
}

async fn run_async(run: RunConfig) -> Result<(), String> {
    if run.no_color {
        colored::control::set_override(false);
    }
    let text_mode = run.output_format == OutputFormat::Text;
    if text_mode {
        print_summary(&run);
    }

    let runner = Runner::new(run.options.clone()).map_err(|e| e.to_string())?;
    let pb = if text_mode { Some(spinner()?) } else { None };
    let result = runner.run().await.map_err(|e| e.to_string());
    if let Some(pb) = pb.as_ref() {
        pb.finish_and_clear();
    }
    let result = result?;
    info!(
        "event=loaded module=app members={} underlives={} elapsed_ms={}",
        result.state.members().len(),
        result.state.underlives().len(),
        result.elapsed.as_millis()
    );

    if let Some(err) = result.state.fatal_error() {
        print_report(&run, &result, None)?;
        return Err(format!("member data unavailable: {err}"));
    }

    let view = result.state.view();
    let mut quiz = (view.tab == Tab::Quiz).then(|| Quiz::new(result.state.members(), run.seed));

    if let Some(q) = quiz.as_mut() {
        if run.interactive && text_mode && !q.is_empty() {
            println!("{}", result.location.link());
            if run.copy {
                eprintln!("{}", copy_link(&result.location.link()));
            }
            return run_quiz_loop(q).await;
        }
        if run.reveal {
            q.reveal();
        }
    }

    print_report(&run, &result, quiz.as_ref())?;
    if run.copy {
        eprintln!("{}", copy_link(&result.location.link()));
    }
    Ok(())
}

pub fn run_cli() -> Result<(), String> {
    let args = match CliArgs::try_parse() {
        Ok(args) => args,
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp => {
                print!("{}", render_custom_help());
                return Ok(());
            }
            ErrorKind::DisplayVersion => {
                let cmd = CliArgs::command();
                print!("{}", cmd.render_version());
                return Ok(());
            }
            _ => return Err(e.to_string()),
        },
    };

    crate::logging::init_logging(args.verbose)?;

    let user_config_path = args.config.clone().map(|p| config::expand_tilde(&p));
    let config_path = user_config_path.clone().or_else(config::default_config_path);

    if args.init_config {
        let path = config_path.ok_or_else(|| "could not determine config path".to_string())?;
        if config::ensure_default_config_file(&path)? {
            println!("wrote default config to {}", path.display());
        } else {
            println!("config already exists at {}", path.display());
        }
        return Ok(());
    }

    // An explicit --config must exist; the default location is optional.
    let cfg = match (user_config_path.as_ref(), config_path.as_ref()) {
        (Some(path), _) => config::load_config(path, false)?,
        (None, Some(path)) => config::load_config(path, true)?,
        (None, None) => ConfigFile::default(),
    };

    let run = build_run_config(args, cfg)?;

    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .worker_threads(2)
        .build()
        .map_err(|e| format!("failed to build runtime: {e}"))?;

    rt.block_on(run_async(run))
}
