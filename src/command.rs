//! Parsing of the interactive commands.
//!
//! Anything that isn't a known command word on its own is a search. Flags
//! may appear anywhere in a search:
//!
//! ```text
//! rust async --time w
//! search --region de-de rust
//! next | n
//! prev | p
//! again 2
//! ```

use std::str::FromStr;

use seeker_search::TimeFilter;

use crate::error::AppError;

/// One line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Start a new search. Unset filters fall back to the configured defaults.
    Search {
        query: String,
        region: Option<String>,
        time: Option<TimeFilter>,
    },
    Next,
    Previous,
    /// List recent queries.
    History,
    ClearHistory,
    /// Re-run the recent query at this 1-based position.
    Again(usize),
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = AppError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        // "next steps" is a search, not `next` with an argument.
        let bare = |command: Command| {
            if rest.is_empty() {
                Ok(command)
            } else {
                parse_search(line)
            }
        };

        match word.to_ascii_lowercase().as_str() {
            "" => Err(AppError::Command("empty command".into())),
            "next" | "n" => bare(Command::Next),
            "prev" | "p" | "previous" => bare(Command::Previous),
            "history" => bare(Command::History),
            "clear-history" => bare(Command::ClearHistory),
            "help" | "?" => bare(Command::Help),
            "quit" | "exit" | "q" => bare(Command::Quit),
            "again" => parse_again(rest),
            "search" => parse_search(rest),
            _ => parse_search(line),
        }
    }
}

fn parse_again(rest: &str) -> Result<Command, AppError> {
    match rest.parse::<usize>() {
        Ok(n) if n > 0 => Ok(Command::Again(n)),
        _ => Err(AppError::Command(
            "`again` needs a history number, e.g. `again 1`".into(),
        )),
    }
}

fn parse_search(text: &str) -> Result<Command, AppError> {
    let mut words = Vec::new();
    let mut region = None;
    let mut time = None;

    let mut tokens = text.split_whitespace();
    while let Some(token) = tokens.next() {
        match token {
            "--region" | "-r" => {
                let value = tokens
                    .next()
                    .ok_or_else(|| AppError::Command(format!("{token} needs a value")))?;
                region = Some(value.to_owned());
            }
            "--time" | "-t" => {
                let value = tokens
                    .next()
                    .ok_or_else(|| AppError::Command(format!("{token} needs a value")))?;
                time = Some(value.parse::<TimeFilter>().map_err(AppError::Command)?);
            }
            word => words.push(word),
        }
    }

    if words.is_empty() {
        return Err(AppError::Command("nothing to search for".into()));
    }
    Ok(Command::Search {
        query: words.join(" "),
        region,
        time,
    })
}
