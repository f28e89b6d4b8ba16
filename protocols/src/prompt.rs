//! Prompt handling for interactive IOS shells.
//!
//! An SSH shell has no framing, so the end of a command's output is the
//! moment the device prints its prompt again: `hostname>` in user EXEC mode,
//! `hostname#` once privileged.

/// Disables `--More--` paging for the rest of the session.
pub const DISABLE_PAGING: &str = "terminal length 0";
pub const ENABLE: &str = "enable";

const PASSWORD_PROMPT: &str = "Password:";

/// The trailing prompt of `buffer`, if the device has finished printing.
pub fn find_prompt(buffer: &str) -> Option<&str> {
    let last: &str = buffer.lines().last()?.trim();
    let is_prompt = (last.ends_with('#') || last.ends_with('>'))
        && last.chars().any(char::is_alphanumeric)
        && !last.contains(char::is_whitespace);
    is_prompt.then_some(last)
}

pub fn is_unprivileged(prompt: &str) -> bool {
    prompt.trim_end().ends_with('>')
}

pub fn is_password_prompt(buffer: &str) -> bool {
    buffer.trim_end().ends_with(PASSWORD_PROMPT)
}

/// Strips the echoed command and the trailing prompt from raw shell output.
pub fn clean_output(raw: &str, command: &str) -> String {
    let normalized: String = raw.replace("\r\n", "\n").replace('\r', "");
    let mut lines: Vec<&str> = normalized.lines().collect();

    if lines
        .first()
        .is_some_and(|first| first.trim_end().ends_with(command.trim()))
    {
        lines.remove(0);
    }
    if lines.last().is_some_and(|last| find_prompt(last).is_some()) {
        lines.pop();
    }

    lines.join("\n")
}
