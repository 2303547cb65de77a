//! Core of the DayDesk personal board.
//! Holds the board invariants; display adapters only render what it produces.

pub mod config;
pub mod db;
pub mod dialog;
pub mod interaction;
pub mod logging;
pub mod model;
pub mod session;
pub mod state;
pub mod store;
pub mod view;
pub mod workspace;

pub use config::{BoardConfig, ConfigError, ConfigResult};
pub use db::{open_db, open_db_in_memory, DbError, DbResult};
pub use dialog::{Dialog, DialogAction};
pub use interaction::{
    GestureKind, Manipulation, Manipulator, PointerButton, PointerDown, PointerEvent,
    PointerTarget,
};
pub use logging::{init_logging, logging_status, LogLevel, LoggingError};
pub use model::geometry::{zone_containing, Point, Rect, Size};
pub use model::ids::{DateKey, DateKeyError, EntityId};
pub use model::note::{Note, NotePatch, NoteTab, NoteValidationError};
pub use model::zone::{Zone, ZonePatch};
pub use session::{AuthEvent, UserIdentity};
pub use state::{AppState, StateChange, SubscriptionId};
pub use store::{DocumentStore, SqliteDocumentStore, StoreError, StoreResult, UserDocument};
pub use view::{
    NoteCallbacks, NotePresentation, NoteView, ZoneCallbacks, ZonePresentation, ZoneView,
};
pub use workspace::{
    Clock, EntityPatch, LayoutMode, ManualClock, SaveStatus, SystemClock, Workspace,
    WorkspaceView,
};

/// Minimal health-check API for adapters.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
