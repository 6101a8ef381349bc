use crate::commands::{Command, Registry};

/// Characters per line of help output.
const WIDTH: usize = 100;

/// Spaces between the longest command prefix and its description column.
const DESC_PAD: usize = 3;

const LEFT_PAD: usize = 2;

const OPTIONS: &str = "\
  --api-url <URL>          API base URL
  --proxy-file <FILE>      Read an HTTP proxy (host:port) from FILE (default: ./proxy if present)
  --timeout <SECS>         HTTP request timeout in seconds (default: 30)
  --poll-interval <SECS>   Seconds to wait between assessment polls (default: 10)
  --poll-deadline <SECS>   Give up polling after SECS without a terminal scan state
  --no-poll                Submit the assessment without waiting for the scan to finish
  -v, --verbose            Enable debug logging
  -V, --version            Print version
";

pub fn render(registry: &Registry) -> String {
    let mut out = String::new();
    out.push_str("usage: observatory [OPTIONS] <COMMAND> [KEY=VALUE]...\n\n");
    out.push_str("Command-line client for the Mozilla HTTP Observatory.\n\n");
    out.push_str("commands:\n");
    out.push_str(&command_table(registry.commands()));
    out.push_str("\noptions:\n");
    out.push_str(OPTIONS);
    out
}

/// One aligned block per command: `short, long <args>` padded to the
/// longest prefix, the word-wrapped description, then one line per
/// declared argument.
pub fn command_table(commands: &[Command]) -> String {
    let prefixes: Vec<String> = commands.iter().map(|c| prefix(*c)).collect();
    let column = prefixes.iter().map(String::len).max().unwrap_or(0) + DESC_PAD;
    let text_width = WIDTH.saturating_sub(column).max(20);

    let mut out = String::new();
    for (command, prefix) in commands.iter().zip(&prefixes) {
        let lines = wrap(command.description(), text_width);
        match lines.split_first() {
            Some((first, rest)) => {
                out.push_str(&format!("{prefix:<column$}{first}\n"));
                for line in rest {
                    out.push_str(&format!("{:column$}{line}\n", ""));
                }
            }
            None => out.push_str(&format!("{prefix}\n")),
        }
        for arg in command.arguments() {
            let required = if arg.mandatory { " (required)" } else { "" };
            let detail = format!("{}{required}: {}", arg.key, arg.description);
            for line in wrap(&detail, text_width) {
                out.push_str(&format!("{:column$}{line}\n", ""));
            }
        }
    }
    out
}

fn prefix(command: Command) -> String {
    let mut prefix = format!(
        "{}{}, {}",
        " ".repeat(LEFT_PAD),
        command.short_name(),
        command.long_name()
    );
    for arg in command.arguments() {
        if arg.mandatory {
            prefix.push_str(&format!(" {}=<value>", arg.key));
        } else {
            prefix.push_str(&format!(" [{}]", arg.key));
        }
    }
    prefix
}

/// Greedy word wrap; words longer than the width get a line of their own.
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
        } else if current.len() + 1 + word.len() <= width {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}
