//! Command-line front end for a local board database.
//!
//! # Responsibility
//! - Open a board database and run one command against a user's document.
//! - Print a plain-text rendering of the resulting board.
//!
//! `drag` and `resize` replay a pointer press, move and release on the note
//! or zone with that id, exactly as a pointer device would.

use clap::{Args, Parser, Subcommand};
use daydesk_core::{
    init_logging, open_db, AuthEvent, BoardConfig, Clock, DateKey, DocumentStore, EntityId,
    LayoutMode, LogLevel, Manipulation, NoteView, Point, PointerDown, PointerEvent,
    PointerTarget, Rect, Size, SqliteDocumentStore, UserIdentity, Workspace, WorkspaceView,
};
use log::info;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "daydesk", version, about = "Inspect and edit a DayDesk board")]
struct Cli {
    /// Board database file
    #[arg(required_unless_present = "ping")]
    db_path: Option<PathBuf>,
    /// User whose board is opened
    #[arg(required_unless_present = "ping")]
    user_id: Option<String>,
    /// JSON board config
    #[arg(long)]
    config: Option<PathBuf>,
    /// Day to show (YYYY-MM-DD); the general board when omitted
    #[arg(long, value_parser = parse_date_key)]
    date: Option<DateKey>,
    /// Viewport width in pixels; narrow layout at or below the breakpoint
    #[arg(long)]
    width: Option<f64>,
    /// Absolute directory for rolling log files
    #[arg(long)]
    log_dir: Option<PathBuf>,
    /// trace|debug|info|warn|error; debug builds default to debug
    #[arg(long, requires = "log_dir", value_parser = parse_log_level)]
    log_level: Option<LogLevel>,
    /// Print core health and version, then exit
    #[arg(long)]
    ping: bool,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the board (default)
    Show,
    /// Create a note, optionally inside a zone
    AddNote { zone_id: Option<String> },
    /// Create a zone
    AddZone,
    DeleteNote { id: String },
    DeleteZone { id: String },
    /// Move a note or zone by an offset
    Drag(GestureArgs),
    /// Grow or shrink a note or zone by an offset
    Resize(GestureArgs),
    /// Set the embedded video link
    Video { url: String },
    /// List the days that have notes
    Dates,
}

#[derive(Args, Debug)]
struct GestureArgs {
    id: String,
    #[arg(allow_negative_numbers = true)]
    dx: f64,
    #[arg(allow_negative_numbers = true)]
    dy: f64,
}

impl Command {
    fn name(&self) -> &'static str {
        match self {
            Self::Show => "show",
            Self::AddNote { .. } => "add-note",
            Self::AddZone => "add-zone",
            Self::DeleteNote { .. } => "delete-note",
            Self::DeleteZone { .. } => "delete-zone",
            Self::Drag(_) => "drag",
            Self::Resize(_) => "resize",
            Self::Video { .. } => "video",
            Self::Dates => "dates",
        }
    }
}

fn parse_date_key(raw: &str) -> Result<DateKey, String> {
    DateKey::parse(raw).map_err(|err| err.to_string())
}

fn parse_log_level(raw: &str) -> Result<LogLevel, String> {
    raw.parse().map_err(|err: daydesk_core::LoggingError| err.to_string())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    if cli.ping {
        println!("daydesk_core ping={}", daydesk_core::ping());
        println!("daydesk_core version={}", daydesk_core::core_version());
        return ExitCode::SUCCESS;
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), String> {
    let (Some(db_path), Some(user_id)) = (cli.db_path, cli.user_id) else {
        return Err("a database path and user id are required".to_string());
    };
    if let Some(log_dir) = &cli.log_dir {
        let level = cli.log_level.unwrap_or_else(LogLevel::for_build);
        init_logging(level, log_dir).map_err(|err| err.to_string())?;
    }

    let config = match &cli.config {
        Some(path) => BoardConfig::load(path).map_err(|err| err.to_string())?,
        None => BoardConfig::default(),
    };

    let conn = open_db(&db_path).map_err(|err| err.to_string())?;
    let store = SqliteDocumentStore::new(&conn, config.clone());
    let mut workspace = Workspace::with_system_clock(config, Default::default(), store);
    if let Some(width) = cli.width {
        workspace.set_viewport(Size::new(width, f64::INFINITY));
    }

    workspace.handle_auth_change(AuthEvent::SignedIn(UserIdentity::new(
        user_id.clone(),
        user_id,
    )));
    if let Some(dialog) = workspace.take_dialog() {
        return Err(format!("{}: {:?}", dialog.title(), dialog));
    }
    workspace.set_active_date(cli.date);

    let command = cli.command.unwrap_or(Command::Show);
    let name = command.name();
    match command {
        Command::Show => {}
        Command::AddNote { zone_id } => {
            let id = workspace.create_note(zone_id.map(EntityId::from));
            println!("created note {id}");
        }
        Command::AddZone => println!("created zone {}", workspace.create_zone()),
        Command::DeleteNote { id } => {
            let found = workspace.delete_note(&EntityId::from(id.as_str()));
            report(found, &id)?;
        }
        Command::DeleteZone { id } => {
            let found = workspace.delete_zone(&EntityId::from(id.as_str()));
            report(found, &id)?;
        }
        Command::Drag(args) => {
            let delta = Point::new(args.dx, args.dy);
            replay_gesture(&mut workspace, &EntityId::from(args.id), Gesture::Drag, delta)?;
        }
        Command::Resize(args) => {
            let delta = Point::new(args.dx, args.dy);
            replay_gesture(&mut workspace, &EntityId::from(args.id), Gesture::Resize, delta)?;
        }
        Command::Video { url } => {
            if !workspace.set_video_url(&url) {
                return Err(format!("`{url}` is not a new video link"));
            }
        }
        Command::Dates => {
            for date in workspace.note_dates() {
                println!("{date}");
            }
            return Ok(());
        }
    }

    if workspace.has_pending_save() && !workspace.flush() {
        return Err(workspace.save_message().to_string());
    }
    info!("event=cli_command module=cli status=ok command={name}");
    print_view(&workspace.render());
    Ok(())
}

#[derive(Debug, Clone, Copy)]
enum Gesture {
    Drag,
    Resize,
}

/// Presses on the element (surface corner for drag, bottom-right handle for
/// resize), moves by `delta` and releases.
fn replay_gesture<S: DocumentStore, C: Clock>(
    workspace: &mut Workspace<S, C>,
    id: &EntityId,
    gesture: Gesture,
    delta: Point,
) -> Result<(), String> {
    let mut view = workspace.render();
    let container = Some(workspace.viewport());
    let press = |rect: Rect| match gesture {
        Gesture::Drag => PointerDown::primary(
            Point::new(rect.x + 1.0, rect.y + 1.0),
            PointerTarget::Surface,
        ),
        Gesture::Resize => PointerDown::primary(
            Point::new(rect.x + rect.width, rect.y + rect.height),
            PointerTarget::ResizeHandle,
        ),
    };
    let release_at = |down: &PointerDown| {
        Point::new(down.position.x + delta.x, down.position.y + delta.y)
    };

    let outcome = if let Some(note) = view.note_mut(id) {
        let down = press(note.note().rect());
        let target = release_at(&down);
        note.pointer(PointerEvent::Down(down), container, workspace);
        note.pointer(PointerEvent::Move(target), container, workspace);
        note.pointer(PointerEvent::Up, container, workspace)
    } else if let Some(zone) = view.zone_mut(id) {
        let down = press(zone.zone().rect());
        let target = release_at(&down);
        zone.pointer(PointerEvent::Down(down), container, workspace);
        zone.pointer(PointerEvent::Move(target), container, workspace);
        zone.pointer(PointerEvent::Up, container, workspace)
    } else {
        return Err(format!("no note or zone `{id}` on this board"));
    };

    match outcome {
        Manipulation::Committed { rect, .. } => {
            println!(
                "{id} now at {},{} {}x{}",
                rect.x, rect.y, rect.width, rect.height
            );
            Ok(())
        }
        _ => Err("gesture not available in the compact layout".to_string()),
    }
}

fn report(found: bool, id: &str) -> Result<(), String> {
    if found {
        println!("deleted {id}");
        Ok(())
    } else {
        Err(format!("no entity with id `{id}`"))
    }
}

fn print_view(view: &WorkspaceView) {
    let mode = match view.mode {
        LayoutMode::Wide => "wide",
        LayoutMode::Narrow => "narrow",
    };
    println!("# {} ({mode})", view.title);
    for zone in &view.zones {
        let presentation = zone.render();
        println!("[zone {}] {}", zone.id(), presentation.title);
        for note in zone.members() {
            print_note(note, "  ");
        }
    }
    for note in &view.standalone_notes {
        print_note(note, "");
    }
}

fn print_note(note: &NoteView, indent: &str) {
    let presentation = note.render();
    let frame = presentation
        .frame
        .map(|rect| format!(" @{},{} {}x{}", rect.x, rect.y, rect.width, rect.height))
        .unwrap_or_default();
    println!(
        "{indent}[note {}] {}{frame}",
        note.id(),
        presentation.heading
    );
}
