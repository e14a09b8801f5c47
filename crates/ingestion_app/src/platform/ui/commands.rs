use std::path::{Path, PathBuf};

use ingestion_core::DropPayload;

pub const HELP: &str = "commands: drop <path>..., paste <text>, start, cancel, status, help, quit";

/// One line of user input, already interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Drop(DropPayload),
    Start,
    Cancel,
    Status,
    Help,
    Quit,
    Unknown(String),
}

pub fn parse_line(line: &str) -> Option<ShellCommand> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };

    let command = match verb.to_ascii_lowercase().as_str() {
        "drop" => ShellCommand::Drop(DropPayload::FileList(
            rest.split_whitespace().map(absolute).collect(),
        )),
        // Text is the one payload the window never accepts as a file list.
        "paste" => ShellCommand::Drop(DropPayload::Unsupported {
            format: "text/plain".to_string(),
        }),
        "start" | "upload" => ShellCommand::Start,
        "cancel" => ShellCommand::Cancel,
        "status" => ShellCommand::Status,
        "help" | "?" => ShellCommand::Help,
        "quit" | "exit" => ShellCommand::Quit,
        _ => ShellCommand::Unknown(line.to_string()),
    };
    Some(command)
}

fn absolute(raw: &str) -> PathBuf {
    let path = Path::new(raw);
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_lines_are_skipped() {
        assert_eq!(parse_line("   "), None);
    }

    #[test]
    fn drop_collects_every_path_as_absolute() {
        let Some(ShellCommand::Drop(DropPayload::FileList(paths))) =
            parse_line("drop /data/a.csv /data/b.csv")
        else {
            panic!("expected a file list");
        };
        assert_eq!(
            paths,
            vec![PathBuf::from("/data/a.csv"), PathBuf::from("/data/b.csv")]
        );

        let Some(ShellCommand::Drop(DropPayload::FileList(paths))) = parse_line("drop rel.txt")
        else {
            panic!("expected a file list");
        };
        assert!(paths[0].is_absolute());
    }

    #[test]
    fn paste_is_an_unsupported_drop() {
        assert!(matches!(
            parse_line("paste hello"),
            Some(ShellCommand::Drop(DropPayload::Unsupported { .. }))
        ));
    }

    #[test]
    fn verbs_are_case_insensitive() {
        assert_eq!(parse_line("START"), Some(ShellCommand::Start));
        assert_eq!(parse_line(" Cancel "), Some(ShellCommand::Cancel));
        assert_eq!(parse_line("exit"), Some(ShellCommand::Quit));
    }

    #[test]
    fn unknown_input_is_kept_for_feedback() {
        assert_eq!(
            parse_line("frobnicate now"),
            Some(ShellCommand::Unknown("frobnicate now".to_string()))
        );
    }
}
