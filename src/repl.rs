//! Line-oriented front end over a [`SearchSession`].
//!
//! Reads one command per line, runs it against the session, and writes the
//! rendered result. Recent queries are saved after every search so they
//! survive a crash or Ctrl-C.

use seeker_search::{Navigation, PageSource, SearchFilters, SearchSession};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::command::Command;
use crate::error::{AppError, Result};
use crate::history::HistoryFile;
use crate::render;

const PROMPT: &str = "> ";

/// What the loop should do after a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Print(String),
    Quit,
}

/// Session plus the application state around it.
pub struct Repl<S> {
    session: SearchSession<S>,
    history: HistoryFile,
    defaults: SearchFilters,
}

impl<S: PageSource> Repl<S> {
    pub fn new(session: SearchSession<S>, history: HistoryFile, defaults: SearchFilters) -> Self {
        Self {
            session,
            history,
            defaults,
        }
    }

    pub fn session(&self) -> &SearchSession<S> {
        &self.session
    }

    /// Read commands from `reader` until EOF or `quit`.
    ///
    /// # Errors
    ///
    /// Only I/O errors on `reader` or `writer` end the loop early; command
    /// failures are printed and the loop carries on.
    pub async fn run<R, W>(&self, reader: R, mut writer: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = reader.lines();
        loop {
            writer.write_all(PROMPT.as_bytes()).await?;
            writer.flush().await?;

            let Some(line) = lines.next_line().await? else {
                tracing::debug!("input closed");
                break;
            };
            match self.handle_line(&line).await {
                Step::Print(text) if text.is_empty() => {}
                Step::Print(text) => {
                    writer.write_all(text.as_bytes()).await?;
                }
                Step::Quit => break,
            }
        }
        writer.flush().await?;
        Ok(())
    }

    /// Run one line of input. Errors become printable messages.
    pub async fn handle_line(&self, line: &str) -> Step {
        if line.trim().is_empty() {
            return Step::Print(String::new());
        }
        let command = match line.parse::<Command>() {
            Ok(Command::Quit) => return Step::Quit,
            Ok(command) => command,
            Err(err) => return Step::Print(format!("{}\n", err.user_message())),
        };
        match self.execute(command).await {
            Ok(text) => Step::Print(text),
            Err(err) => {
                tracing::warn!(error = %err, "command failed");
                Step::Print(format!("{}\n", err.user_message()))
            }
        }
    }

    /// Search for `words` as literal query text, bypassing command parsing,
    /// so `next` or `quit` here is a query. Errors become printable messages.
    pub async fn run_query(&self, words: &[String]) -> String {
        let command = Command::Search {
            query: words.join(" "),
            region: None,
            time: None,
        };
        match self.execute(command).await {
            Ok(text) => text,
            Err(err) => {
                tracing::warn!(error = %err, "initial search failed");
                format!("{}\n", err.user_message())
            }
        }
    }

    /// Run `command` and return the text to show.
    ///
    /// # Errors
    ///
    /// Search and navigation failures from the session, and `again` with a
    /// number not in the recent list.
    pub async fn execute(&self, command: Command) -> Result<String> {
        match command {
            Command::Search {
                query,
                region,
                time,
            } => {
                let filters = SearchFilters {
                    region: region.or_else(|| self.defaults.region.clone()),
                    time: time.unwrap_or(self.defaults.time),
                };
                self.search(&query, filters).await
            }
            Command::Again(n) => {
                let recent = self.session.recent_queries();
                let query = n
                    .checked_sub(1)
                    .and_then(|i| recent.get(i))
                    .ok_or_else(|| AppError::Command(format!("no recent search number {n}")))?;
                self.search(query, self.defaults.clone()).await
            }
            Command::Next => match self.session.next().await? {
                Navigation::EndOfResults => Ok("No more results.\n".to_owned()),
                Navigation::Superseded => Ok(superseded()),
                Navigation::Moved { .. } | Navigation::Loaded { .. } | Navigation::Unchanged => {
                    Ok(render::page(&self.session.snapshot()))
                }
            },
            Command::Previous => match self.session.previous() {
                Navigation::Unchanged => Ok("Already on the first page.\n".to_owned()),
                _ => Ok(render::page(&self.session.snapshot())),
            },
            Command::History => Ok(render::recent(&self.session.recent_queries())),
            Command::ClearHistory => {
                self.session.clear_recent_queries();
                self.persist_recent();
                Ok("Recent searches cleared.\n".to_owned())
            }
            Command::Help => Ok(render::HELP.to_owned()),
            Command::Quit => Ok(String::new()),
        }
    }

    async fn search(&self, query: &str, filters: SearchFilters) -> Result<String> {
        let result = self.session.search(query, filters).await;
        // The query is in the recent list whether or not the fetch worked.
        self.persist_recent();
        match result? {
            Navigation::Superseded => Ok(superseded()),
            _ => Ok(render::page(&self.session.snapshot())),
        }
    }

    fn persist_recent(&self) {
        if let Err(e) = self.history.save(&self.session.recent_queries()) {
            tracing::warn!(
                path = %self.history.path().display(),
                error = %e,
                "failed to save recent queries"
            );
        }
    }
}

fn superseded() -> String {
    "A newer search replaced this one.\n".to_owned()
}
