use chrono::NaiveDate;

use crate::filter::{FilterMode, parse_date_bound};

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Filter(FilterMode),
    Search(String),
    Range(Option<NaiveDate>, Option<NaiveDate>),
    Clear,
    Block,
    Open,
    Help,
    Quit,
}

pub fn parse_command(input: &str) -> Option<Command> {
    let input = input.strip_prefix(':').unwrap_or(input).trim();

    if input.is_empty() {
        return None;
    }

    let (cmd, args) = match input.split_once(char::is_whitespace) {
        Some((cmd, args)) => (cmd, args.trim()),
        None => (input, ""),
    };

    match cmd {
        "filter" | "by" => parse_filter_mode(args).map(Command::Filter),
        // An empty search is a valid way to reset the term.
        "search" | "s" => Some(Command::Search(args.to_owned())),
        "range" | "r" => parse_range(args),
        "clear" | "c" => Some(Command::Clear),
        "block" | "unblock" | "toggle" => Some(Command::Block),
        "open" | "o" => Some(Command::Open),
        "help" | "h" => Some(Command::Help),
        "quit" | "q" => Some(Command::Quit),
        _ => None,
    }
}

pub fn parse_filter_mode(input: &str) -> Option<FilterMode> {
    match input.trim().to_ascii_lowercase().as_str() {
        "message" | "msg" | "m" => Some(FilterMode::Message),
        "username" | "user" | "author" | "u" => Some(FilterMode::Username),
        "date" | "created_at" | "created" | "d" => Some(FilterMode::CreatedAt),
        _ => None,
    }
}

/// `range <from> <to>`; `-` leaves a bound empty.
fn parse_range(args: &str) -> Option<Command> {
    let mut parts = args.split_whitespace();
    let (from, to) = (parts.next()?, parts.next()?);
    if parts.next().is_some() {
        return None;
    }
    let bound = |s: &str| -> Option<Option<NaiveDate>> {
        if s == "-" {
            Some(None)
        } else {
            parse_date_bound(s).map(Some)
        }
    };
    Some(Command::Range(bound(from)?, bound(to)?))
}
