//! Writes the shareable link to the system clipboard.

use std::fmt;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

/// Clipboard programs tried in order, with their arguments.
#[cfg(not(test))]
const TOOLS: &[(&str, &[&str])] = &[
    ("pbcopy", &[]),
    ("wl-copy", &[]),
    ("xclip", &["-selection", "clipboard"]),
    ("xsel", &["--clipboard", "--input"]),
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Backend {
    Tool(&'static str),
    Osc52,
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Backend::Tool(name) => f.write_str(name),
            Backend::Osc52 => f.write_str("osc52"),
        }
    }
}

/// Terminal escape that asks the terminal emulator to set its clipboard.
pub fn osc52_sequence(text: &str) -> String {
    format!("\x1b]52;c;{}\x07", STANDARD.encode(text.as_bytes()))
}

#[cfg(test)]
pub fn copy_to_clipboard(text: &str) -> Result<Backend, String> {
    if text.is_empty() {
        return Err("nothing to copy".to_string());
    }
    Ok(Backend::Osc52)
}

#[cfg(not(test))]
pub fn copy_to_clipboard(text: &str) -> Result<Backend, String> {
    use std::io::{IsTerminal, Write};
    use std::process::{Command, Stdio};

    if text.is_empty() {
        return Err("nothing to copy".to_string());
    }

    for (program, args) in TOOLS {
        let child = Command::new(program)
            .args(*args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn();
        let Ok(mut child) = child else {
            continue;
        };
        if let Some(stdin) = child.stdin.as_mut() {
            if stdin.write_all(text.as_bytes()).is_err() {
                let _ = child.kill();
                continue;
            }
        }
        drop(child.stdin.take());
        match child.wait() {
            Ok(status) if status.success() => return Ok(Backend::Tool(program)),
            Ok(status) => log::debug!("event=clipboard_tool_failed module=clipboard tool={program} status={status}"),
            Err(e) => log::debug!("event=clipboard_tool_failed module=clipboard tool={program} reason={e}"),
        }
    }

    // stdout may carry JSON, so the escape goes to the terminal via stderr.
    let mut stderr = std::io::stderr();
    if !stderr.is_terminal() {
        return Err("no clipboard tool found and stderr is not a terminal".to_string());
    }
    stderr
        .write_all(osc52_sequence(text).as_bytes())
        .and_then(|_| stderr.flush())
        .map_err(|e| format!("failed to write OSC52 sequence: {e}"))?;
    Ok(Backend::Osc52)
}
