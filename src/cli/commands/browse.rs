//! skilllink browse - Interactive search session over stdin
//!
//! Plain lines replace the search box content and are debounced like
//! keystrokes. Lines starting with `:` drive the filter panel:
//!
//! ```text
//! :toggle <facet> <value> [on|off]   :find <facet> [text]
//! :skill [query]   :pick <name>   :level <1-5>   :confirm   :cancel
//! :remove <skill>  :panel [open|close]   :section <name>
//! :apply   :clear   :quit
//! ```

use std::sync::Arc;

use clap::Args;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::app::AppContext;
use crate::cli::formatters::format_update;
use crate::cli::output::{OutputMode, emit_json_line};
use crate::error::{Result, SkillLinkError};
use crate::filter::{Facet, PanelSection};
use crate::render::StatusMessage;
use crate::search::{ControllerUpdate, SearchController, UiEvent};

#[derive(Args, Debug)]
pub struct BrowseArgs {
    /// Do not hide the logged-in user from results
    #[arg(long)]
    pub include_self: bool,
}

fn invalid(message: impl Into<String>) -> SkillLinkError {
    SkillLinkError::Validation(message.into())
}

fn parse_section(name: &str) -> Result<PanelSection> {
    match name.trim().to_lowercase().as_str() {
        "skills" | "skill" => Ok(PanelSection::Skills),
        other => other.parse::<Facet>().map(PanelSection::from),
    }
}

/// Split `<value...> [on|off]` into the value and the checked flag.
fn split_toggle_value(rest: &str) -> (String, bool) {
    let rest = rest.trim();
    match rest.rsplit_once(' ') {
        Some((value, "on")) => (value.trim().to_string(), true),
        Some((value, "off")) => (value.trim().to_string(), false),
        _ => (rest.to_string(), true),
    }
}

/// Translate one input line into a controller event.
pub fn parse_browse_line(line: &str) -> Result<UiEvent> {
    let Some(command) = line.strip_prefix(':') else {
        return Ok(UiEvent::Input(line.to_string()));
    };
    let (name, rest) = command
        .split_once(char::is_whitespace)
        .map_or((command, ""), |(name, rest)| (name, rest.trim()));

    match name {
        "apply" => Ok(UiEvent::Apply),
        "clear" => Ok(UiEvent::Clear),
        "confirm" => Ok(UiEvent::ConfirmSkill),
        "cancel" => Ok(UiEvent::CancelSkill),
        "quit" | "q" => Ok(UiEvent::Shutdown),
        "toggle" => {
            let (facet, value) = rest
                .split_once(char::is_whitespace)
                .ok_or_else(|| invalid("usage: :toggle <facet> <value> [on|off]"))?;
            let facet = facet.parse::<Facet>()?;
            let (value, checked) = split_toggle_value(value);
            if value.is_empty() {
                return Err(invalid("usage: :toggle <facet> <value> [on|off]"));
            }
            Ok(UiEvent::Toggle {
                facet,
                value,
                checked,
            })
        }
        "find" => {
            let (facet, text) = rest
                .split_once(char::is_whitespace)
                .map_or((rest, ""), |(facet, text)| (facet, text.trim()));
            if facet.is_empty() {
                return Err(invalid("usage: :find <facet> [text]"));
            }
            Ok(UiEvent::OptionSearch {
                facet: facet.parse()?,
                text: text.to_string(),
            })
        }
        "skill" => Ok(UiEvent::SkillSearch(rest.to_string())),
        "pick" if !rest.is_empty() => Ok(UiEvent::PickSkill(rest.to_string())),
        "remove" if !rest.is_empty() => Ok(UiEvent::RemoveSkill(rest.to_string())),
        "level" => rest
            .parse::<u8>()
            .map(UiEvent::SelectLevel)
            .map_err(|_| invalid(format!("level must be a number from 1 to 5, got {rest:?}"))),
        "panel" => match rest {
            "" | "open" => Ok(UiEvent::OpenPanel),
            "close" => Ok(UiEvent::ClosePanel),
            other => Err(invalid(format!("usage: :panel [open|close], got {other}"))),
        },
        "section" => parse_section(rest).map(UiEvent::ToggleSection),
        "pick" | "remove" => Err(invalid(format!("usage: :{name} <skill>"))),
        other => Err(invalid(format!("unknown command :{other}"))),
    }
}

fn print_update(mode: OutputMode, update: &ControllerUpdate) {
    match mode {
        OutputMode::Robot => {
            if let Err(err) = emit_json_line(update) {
                warn!(error = %err, "failed to write update");
            }
        }
        OutputMode::Human => {
            if let Some(text) = format_update(update) {
                println!("{text}");
            }
        }
    }
}

pub async fn run(ctx: &AppContext, args: &BrowseArgs) -> Result<()> {
    let api = Arc::new(ctx.api_client()?);
    let settings = ctx.search_settings(args.include_self)?;
    let mode = ctx.output_mode();

    let (event_tx, event_rx) = mpsc::unbounded_channel();
    let (update_tx, mut update_rx) = mpsc::unbounded_channel();
    let controller = SearchController::new(api, settings, update_tx);
    let driver = tokio::spawn(controller.run(event_rx));
    let printer = tokio::spawn(async move {
        while let Some(update) = update_rx.recv().await {
            print_update(mode, &update);
        }
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match parse_browse_line(&line) {
            Ok(event) => {
                let quit = event == UiEvent::Shutdown;
                if event_tx.send(event).is_err() || quit {
                    break;
                }
            }
            Err(err) => {
                warn!(line = %line, error = %err, "browse input rejected");
                print_update(mode, &ControllerUpdate::Status(StatusMessage::error(err.to_string())));
            }
        }
    }
    drop(event_tx);

    let controller = driver
        .await
        .map_err(|err| SkillLinkError::Io(std::io::Error::other(err)))?;
    debug!(phase = ?controller.phase(), "browse session finished");
    // The controller owns the update sender; the printer ends once it is gone.
    drop(controller);
    printer
        .await
        .map_err(|err| SkillLinkError::Io(std::io::Error::other(err)))?;
    Ok(())
}
