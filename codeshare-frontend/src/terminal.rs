//! Line-driven front-end over the controllers.
//!
//! Uploads run on their own task so the prompt stays usable while one is in
//! flight; a second `upload` in the meantime is refused by the controller.

use crate::catalog::{week_label, COURSES};
use crate::controllers::UploadError;
use crate::models::SelectedFile;
use crate::services::metrics::get_metrics;
use crate::views::{render_courses, render_listing, render_results, render_week};
use crate::AppState;
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

pub const HELP: &str = "\
Commands:
  name <text>          set your name for the upload form
  file <path>          select a file to upload (no path clears it)
  upload               upload the selected file
  search <text>        search files by number (empty shows the default set)
  results              show the current search results
  files                list every stored file
  courses              list courses and weeks
  week <course> <week> show a week's content, e.g. `week 1 3`
  dismiss              close the last upload result
  metrics              print request metrics
  help                 show this help
  quit                 exit
";

const FORM_LOCKED: &str = "Upload in progress, the form cannot be changed until it finishes.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Name(String),
    File(Option<String>),
    Upload,
    Search(String),
    Results,
    Files,
    Courses,
    Week { course: String, week: String },
    Dismiss,
    Metrics,
    Help,
    Quit,
    Unknown(String),
}

impl Command {
    pub fn parse(line: &str) -> Option<Command> {
        let line = line.trim_end_matches(['\r', '\n']);
        let trimmed = line.trim_start();
        if trimmed.is_empty() {
            return None;
        }

        let (word, rest) = trimmed.split_once(' ').unwrap_or((trimmed, ""));

        let command = match word {
            "name" => Command::Name(rest.to_string()),
            "file" => {
                let path = rest.trim();
                Command::File((!path.is_empty()).then(|| path.to_string()))
            }
            "upload" => Command::Upload,
            "search" => Command::Search(rest.to_string()),
            "results" => Command::Results,
            "files" => Command::Files,
            "courses" => Command::Courses,
            "week" => {
                let mut args = rest.split_whitespace();
                let course = args.next().unwrap_or_default();
                let week = args.next().unwrap_or_default();
                Command::Week {
                    course: resolve_course(course),
                    week: resolve_week(week),
                }
            }
            "dismiss" => Command::Dismiss,
            "metrics" => Command::Metrics,
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            other => Command::Unknown(other.to_string()),
        };
        Some(command)
    }
}

/// A 1-based course number picks from the course list; anything else is used as a name.
fn resolve_course(arg: &str) -> String {
    arg.parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|index| COURSES.get(index))
        .map(|course| course.to_string())
        .unwrap_or_else(|| arg.to_string())
}

fn resolve_week(arg: &str) -> String {
    match arg.parse::<u32>() {
        Ok(week) => week_label(week),
        Err(_) => arg.to_string(),
    }
}

/// Print the results table whenever a search response is applied.
pub fn spawn_results_printer(state: &AppState) -> tokio::task::JoinHandle<()> {
    let mut updates = state.search.subscribe();
    let api = state.api.clone();

    tokio::spawn(async move {
        let mut shown = None;
        while updates.changed().await.is_ok() {
            let snapshot = updates.borrow_and_update().clone();
            let current = (snapshot.results_for, snapshot.results);
            if current.0.is_none() || shown.as_ref() == Some(&current) {
                continue;
            }

            {
                let mut stdout = std::io::stdout().lock();
                let _ = writeln!(stdout, "Results for {}:", current.0.as_deref().unwrap_or_default());
                let _ = write!(
                    stdout,
                    "{}",
                    render_results(&current.1, |file| api.file_url(file))
                );
                let _ = stdout.flush();
            }

            shown = Some(current);
        }
    })
}

pub async fn run<R, W>(state: &AppState, input: R, output: &mut W) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut lines = input.lines();
    write!(output, "{}", HELP)?;

    while let Some(line) = lines.next_line().await? {
        let Some(command) = Command::parse(&line) else {
            continue;
        };
        if command == Command::Quit {
            break;
        }
        execute(state, command, output).await?;
        output.flush()?;
    }

    state.search.cancel_pending();
    Ok(())
}

async fn execute<W: Write>(state: &AppState, command: Command, output: &mut W) -> anyhow::Result<()> {
    match command {
        Command::Name(name) => {
            if state.upload.set_submitter_name(name).is_err() {
                writeln!(output, "{}", FORM_LOCKED)?;
            }
        }
        Command::File(None) => match state.upload.select_file(None) {
            Ok(()) => writeln!(output, "File cleared.")?,
            Err(_) => writeln!(output, "{}", FORM_LOCKED)?,
        },
        Command::File(Some(path)) => match SelectedFile::from_path(&path).await {
            Ok(file) => {
                let file_name = file.file_name.clone();
                match state.upload.select_file(Some(file)) {
                    Ok(()) => writeln!(output, "Selected file: {}", file_name)?,
                    Err(_) => writeln!(output, "{}", FORM_LOCKED)?,
                }
            }
            Err(e) => {
                tracing::warn!(path = %path, error = %e, "Could not read file");
                writeln!(output, "Could not read {}: {}", path, e)?;
            }
        },
        Command::Upload => {
            if state.upload.status().is_loading() {
                writeln!(output, "Uploading...")?;
                return Ok(());
            }
            let upload = state.upload.clone();
            tokio::spawn(async move {
                if let Err(UploadError::InFlight) = upload.submit().await {
                    tracing::debug!("Upload skipped, another one is in flight");
                }
            });
        }
        Command::Search(text) => {
            state.search.set_query(text);
        }
        Command::Results => {
            let search = state.search.state();
            if let Some(number) = &search.results_for {
                writeln!(output, "Results for {}:", number)?;
            }
            let api = state.api.clone();
            write!(
                output,
                "{}",
                render_results(&search.results, |file| api.file_url(file))
            )?;
            if let Some(error) = search.last_error {
                writeln!(output, "(last search failed: {})", error)?;
            }
        }
        Command::Files => {
            if let Err(e) = state.listing.refresh().await {
                writeln!(output, "Could not load files: {}", e)?;
            }
            let api = state.api.clone();
            write!(
                output,
                "{}",
                render_listing(&state.listing.state().files, |file| api.file_url(file))
            )?;
        }
        Command::Courses => {
            write!(output, "{}", render_courses(state.catalog))?;
        }
        Command::Week { course, week } => {
            let topics = state.catalog.lookup(&course, &week);
            write!(output, "{}", render_week(&course, &week, &topics))?;
        }
        Command::Dismiss => state.upload.dismiss(),
        Command::Metrics => write!(output, "{}", get_metrics())?,
        Command::Help => write!(output, "{}", HELP)?,
        Command::Quit => {}
        Command::Unknown(word) => {
            writeln!(output, "Unknown command `{}`. Type `help`.", word)?;
        }
    }
    Ok(())
}
