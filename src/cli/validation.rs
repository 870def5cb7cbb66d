use crate::cli::args::CliArgs;

pub fn validate(args: &CliArgs) -> Result<(), String> {
    if let Some(raw) = args.output_format.as_deref() {
        if crate::output::OutputFormat::parse(raw).is_none() {
            return Err(format!("invalid --output-format '{raw}', expected text or json"));
        }
    }
    if let Some(raw) = args.tab.as_deref() {
        crate::urlstate::Tab::parse(raw).map_err(|e| format!("invalid --tab: {e}"))?;
    }
    if let Some(raw) = args.route_mode.as_deref() {
        crate::urlstate::RouteMode::parse(raw).map_err(|e| format!("invalid --route-mode: {e}"))?;
    }
    if let Some(raw) = args.members_format.as_deref() {
        crate::dataset::MemberFormat::parse(raw)
            .map_err(|e| format!("invalid --members-format: {e}"))?;
    }
    if let Some(raw) = args.link.as_deref() {
        crate::urlstate::parse_location(raw).map_err(|e| format!("invalid --link: {e}"))?;
    }
    if let Some(timeout) = args.timeout {
        if timeout == 0 {
            return Err("invalid timeout, expected positive integer".to_string());
        }
    }
    if args.interactive && args.reveal {
        return Err("use either --interactive or --reveal, not both".to_string());
    }
    Ok(())
}
