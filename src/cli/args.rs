use clap::{ArgAction, Parser};

#[derive(Parser, Debug, Clone)]
#[command(
    name = "psyllium",
    version,
    about = "penlight color and underlive roster viewer",
    long_about = "psyllium shows members' penlight colors, underlive rosters and a color quiz in the terminal.\n\nExamples:\n  psyllium -q 白\n  psyllium -t underlive --id ul-2024-spring --absent\n  psyllium --link 'https://example.github.io/nogi-psyllium/underlive?id=ul-2024-spring'\n  psyllium -m ./data/members.csv -t quiz -i\n\nTip: every view prints a shareable link; pass it back with --link to restore the view."
)]
pub struct CliArgs {
    #[arg(
        short = 'v',
        long = "vb",
        visible_alias = "verbose",
        action = ArgAction::Count,
        help_heading = "Output",
        help = "Increase log verbosity on stderr (-v, -vv)."
    )]
    pub verbose: u8,

    #[arg(
        short = 'c',
        long = "clr",
        visible_alias = "color",
        help_heading = "Output",
        help = "Enable colored output (overrides --no-color)."
    )]
    pub color: bool,

    #[arg(
        short = 'n',
        long = "nc",
        visible_alias = "no-color",
        help_heading = "Output",
        help = "Disable colored output."
    )]
    pub no_color: bool,

    #[arg(
        short = 'o',
        long = "of",
        visible_alias = "output-format",
        value_name = "FORMAT",
        help_heading = "Output",
        help = "Output format (text or json)."
    )]
    pub output_format: Option<String>,

    #[arg(
        long = "ncy",
        visible_alias = "no-cycle",
        help_heading = "Output",
        help = "Hide the penlight color-change legend."
    )]
    pub no_cycle: bool,

    #[arg(
        short = 'm',
        long = "mb",
        visible_alias = "members",
        value_name = "URL|FILE",
        help_heading = "Input",
        help = "Member dataset (JSON array or CSV with header)."
    )]
    pub members: Option<String>,

    #[arg(
        long = "mf",
        visible_alias = "members-format",
        value_name = "FORMAT",
        help_heading = "Input",
        help = "Member dataset format (json or csv); inferred from the extension by default."
    )]
    pub members_format: Option<String>,

    #[arg(
        short = 'u',
        long = "ul",
        visible_alias = "underlives",
        value_name = "URL|FILE",
        help_heading = "Input",
        help = "Underlive dataset (JSON array). Missing or broken data only hides the underlive tab."
    )]
    pub underlives: Option<String>,

    #[arg(
        short = 'C',
        long = "cfg",
        visible_alias = "config",
        value_name = "FILE",
        help_heading = "Input",
        help = "Path to config file (defaults to ~/.psyllium/config.yml)."
    )]
    pub config: Option<String>,

    #[arg(
        long = "ic",
        visible_alias = "init-config",
        help_heading = "Input",
        help = "Write a default config file if none exists, then exit."
    )]
    pub init_config: bool,

    #[arg(
        short = 'l',
        long = "lnk",
        visible_alias = "link",
        value_name = "URL",
        help_heading = "View",
        help = "Restore the view from a shareable link."
    )]
    pub link: Option<String>,

    #[arg(
        short = 't',
        long = "tab",
        value_name = "TAB",
        help_heading = "View",
        help = "Tab to show (penlight, underlive or quiz)."
    )]
    pub tab: Option<String>,

    #[arg(
        short = 'q',
        long = "q",
        visible_alias = "query",
        value_name = "TEXT",
        help_heading = "View",
        help = "Search names, generations and color names."
    )]
    pub query: Option<String>,

    #[arg(
        short = 'g',
        long = "gen",
        visible_alias = "generation",
        value_name = "GEN",
        help_heading = "View",
        help = "Only show one generation (exact match, e.g. 5期)."
    )]
    pub gen: Option<String>,

    #[arg(
        short = 'G',
        long = "grd",
        visible_alias = "graduated",
        help_heading = "View",
        help = "Include graduated members."
    )]
    pub graduated: bool,

    #[arg(
        long = "id",
        value_name = "ID",
        help_heading = "View",
        help = "Underlive event id to show."
    )]
    pub id: Option<String>,

    #[arg(
        short = 'a',
        long = "abs",
        visible_alias = "absent",
        help_heading = "View",
        help = "Show members absent from the selected underlive."
    )]
    pub absent: bool,

    #[arg(
        short = 'b',
        long = "bu",
        visible_alias = "base-url",
        value_name = "URL",
        help_heading = "Links",
        help = "Application root used for shareable links."
    )]
    pub base_url: Option<String>,

    #[arg(
        short = 'r',
        long = "rm",
        visible_alias = "route-mode",
        value_name = "MODE",
        help_heading = "Links",
        help = "Link style: path (/underlive?id=..) or hash (#/underlive?id=..)."
    )]
    pub route_mode: Option<String>,

    #[arg(
        long = "cp",
        visible_alias = "copy",
        help_heading = "Links",
        help = "Copy the view's shareable link to the clipboard."
    )]
    pub copy: bool,

    #[arg(
        short = 'i',
        long = "int",
        visible_alias = "interactive",
        help_heading = "Quiz",
        help = "Ask quiz questions interactively (Enter reveals, Enter again for the next, q quits)."
    )]
    pub interactive: bool,

    #[arg(
        long = "rv",
        visible_alias = "reveal",
        help_heading = "Quiz",
        help = "Print the answer together with the question."
    )]
    pub reveal: bool,

    #[arg(
        long = "sd",
        visible_alias = "seed",
        value_name = "N",
        help_heading = "Quiz",
        help = "Seed for the question order."
    )]
    pub seed: Option<u64>,

    #[arg(
        short = 'T',
        long = "to",
        visible_alias = "timeout",
        value_name = "SECONDS",
        help_heading = "HTTP",
        help = "Per-request timeout in seconds."
    )]
    pub timeout: Option<usize>,

    #[arg(
        short = 'p',
        long = "px",
        visible_alias = "proxy",
        value_name = "URL",
        help_heading = "HTTP",
        help = "HTTP proxy URL (e.g. http://127.0.0.1:8080)."
    )]
    pub proxy: Option<String>,
}
