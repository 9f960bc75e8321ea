//! LBScript tokenizer and command parser
//!
//! Each non-blank line becomes exactly one [`Command`]. The first
//! whitespace-delimited word selects the command, the rest of the line is
//! its argument tail. Arguments are kept raw here; placeholder substitution
//! happens when the command runs so it sees the current state.

use crate::exceptions::ScriptError;
use log::trace;

/// Direction of an alpha adjustment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlphaOp {
    Add,
    Sub,
}

impl AlphaOp {
    fn parse(word: &str) -> Option<Self> {
        match word.to_ascii_lowercase().as_str() {
            "add" => Some(AlphaOp::Add),
            "sub" => Some(AlphaOp::Sub),
            _ => None,
        }
    }

    /// Apply to `current`; clamping is left to the caller
    pub fn apply(self, current: i64, amount: i64) -> i64 {
        match self {
            AlphaOp::Add => current.saturating_add(amount),
            AlphaOp::Sub => current.saturating_sub(amount),
        }
    }
}

/// One parsed LBScript command with its validated payload
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// `setwintitle <text>`
    SetWinTitle(String),
    /// `showmsgbox "title","text"`
    ShowMsgBox { title: String, text: String },
    /// `wait <ms>`
    Wait(u64),
    /// `transparency add|sub <int>`
    Transparency { op: AlphaOp, amount: i64 },
    /// `showtxtbox <prompt>`
    ShowTxtBox(String),
    /// `math add|sub <number>`
    Math { op: AlphaOp, amount: f64 },
    /// `showfilepicker <title>`
    ShowFilePicker(String),
    /// `close`
    Close,
}

impl Command {
    /// Script keyword for this command
    pub fn keyword(&self) -> &'static str {
        match self {
            Command::SetWinTitle(_) => "setwintitle",
            Command::ShowMsgBox { .. } => "showmsgbox",
            Command::Wait(_) => "wait",
            Command::Transparency { .. } => "transparency",
            Command::ShowTxtBox(_) => "showtxtbox",
            Command::Math { .. } => "math",
            Command::ShowFilePicker(_) => "showfilepicker",
            Command::Close => "close",
        }
    }
}

/// A command tagged with the 1-based line it came from
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptLine {
    pub number: usize,
    pub command: Command,
}

/// Cut a trailing `#` or `//` comment, ignoring markers inside quotes
///
/// A `'` only opens a quote at the start of a word, so apostrophes in
/// plain text (`don't`) are not mistaken for one.
pub fn strip_comment(line: &str) -> &str {
    let bytes = line.as_bytes();
    let mut quote: Option<u8> = None;

    for (i, &b) in bytes.iter().enumerate() {
        match (quote, b) {
            (Some(open), _) if b == open => quote = None,
            (Some(_), _) => {}
            (None, b'"') => quote = Some(b),
            (None, b'\'') if i == 0 || bytes[i - 1].is_ascii_whitespace() => quote = Some(b),
            (None, b'#') => return &line[..i],
            (None, b'/') if bytes.get(i + 1) == Some(&b'/') => return &line[..i],
            _ => {}
        }
    }
    line
}

/// Remove one matching pair of surrounding quotes
pub fn strip_quotes(text: &str) -> &str {
    let text = text.trim();
    for quote in ['"', '\''] {
        if text.len() >= 2 && text.starts_with(quote) && text.ends_with(quote) {
            return &text[1..text.len() - 1];
        }
    }
    text
}

/// Split off a leading `"..."` group, returning its content and the remainder
fn take_quoted(text: &str) -> Option<(&str, &str)> {
    let rest = text.trim_start().strip_prefix('"')?;
    let end = rest.find('"')?;
    Some((&rest[..end], &rest[end + 1..]))
}

fn bad_syntax(line: usize, message: impl Into<String>) -> ScriptError {
    ScriptError::BadSyntax {
        line,
        message: message.into(),
    }
}

fn bad_argument(line: usize, message: impl Into<String>) -> ScriptError {
    ScriptError::BadArgument {
        line,
        message: message.into(),
    }
}

fn parse_msgbox(number: usize, tail: &str) -> Result<Command, ScriptError> {
    const USAGE: &str = r#"showmsgbox requires syntax: showmsgbox "title","text""#;

    let (title, rest) = take_quoted(tail).ok_or_else(|| bad_syntax(number, USAGE))?;
    let rest = rest
        .trim_start()
        .strip_prefix(',')
        .ok_or_else(|| bad_syntax(number, USAGE))?;
    let (text, rest) = take_quoted(rest).ok_or_else(|| bad_syntax(number, USAGE))?;
    if !rest.trim().is_empty() {
        return Err(bad_syntax(
            number,
            format!("unexpected text after showmsgbox: {}", rest.trim()),
        ));
    }

    Ok(Command::ShowMsgBox {
        title: title.to_string(),
        text: text.to_string(),
    })
}

fn parse_op_and_number<'a>(
    number: usize,
    keyword: &str,
    tail: &'a str,
) -> Result<(AlphaOp, &'a str), ScriptError> {
    let parts: Vec<&str> = tail.split_whitespace().collect();
    if parts.len() != 2 {
        return Err(bad_syntax(
            number,
            format!("{keyword} requires 2 arguments: {keyword} add|sub <value>"),
        ));
    }
    let op = AlphaOp::parse(parts[0]).ok_or_else(|| {
        bad_syntax(
            number,
            format!("{keyword} operation must be 'add' or 'sub', got '{}'", parts[0]),
        )
    })?;
    Ok((op, parts[1]))
}

/// Parse one raw script line; blank and comment-only lines yield `None`
pub fn parse_line(number: usize, raw: &str) -> Result<Option<Command>, ScriptError> {
    let line = strip_comment(raw.trim()).trim();
    if line.is_empty() {
        return Ok(None);
    }

    let (keyword, tail) = match line.split_once(char::is_whitespace) {
        Some((keyword, tail)) => (keyword, tail.trim()),
        None => (line, ""),
    };
    trace!("🔍 Line {number}: keyword={keyword:?} tail={tail:?}");

    let command = match keyword {
        "setwintitle" => Command::SetWinTitle(strip_quotes(tail).to_string()),

        "showmsgbox" => parse_msgbox(number, tail)?,

        "wait" => {
            let ms = tail.parse::<u64>().map_err(|_| {
                bad_argument(
                    number,
                    format!("wait requires a non-negative integer milliseconds argument, got '{tail}'"),
                )
            })?;
            Command::Wait(ms)
        }

        "transparency" => {
            let (op, value) = parse_op_and_number(number, keyword, tail)?;
            let amount = value.parse::<i64>().map_err(|_| {
                bad_argument(
                    number,
                    format!("transparency second argument must be an integer, got '{value}'"),
                )
            })?;
            Command::Transparency { op, amount }
        }

        "showtxtbox" => Command::ShowTxtBox(strip_quotes(tail).to_string()),

        "math" => {
            let (op, value) = parse_op_and_number(number, keyword, tail)?;
            let amount = value
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| {
                    bad_argument(
                        number,
                        format!("math second argument must be a number, got '{value}'"),
                    )
                })?;
            Command::Math { op, amount }
        }

        "showfilepicker" => Command::ShowFilePicker(strip_quotes(tail).to_string()),

        "close" => {
            if !tail.is_empty() {
                return Err(bad_syntax(number, "close takes no arguments"));
            }
            Command::Close
        }

        _ => {
            return Err(ScriptError::UnknownCommand {
                line: number,
                text: line.to_string(),
            });
        }
    };

    Ok(Some(command))
}

/// Parse every line of a script body, stopping at the first error
pub fn parse_script(script: &str) -> Result<Vec<ScriptLine>, ScriptError> {
    let mut lines = Vec::new();
    for (index, raw) in script.lines().enumerate() {
        if let Some(command) = parse_line(index + 1, raw)? {
            lines.push(ScriptLine {
                number: index + 1,
                command,
            });
        }
    }
    Ok(lines)
}
