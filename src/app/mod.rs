//! Application-Layer: Commands, History, Selektion und Editor-Zustand.

/// Zwischenablage-Nachrichten (Kopieren/Einfügen zwischen Dokumenten).
pub mod clipboard;
/// Umkehrbare Bearbeitungs-Commands.
pub mod commands;
pub mod history;
pub mod selection;
/// Editor-Zustand als Einstiegspunkt für den Host.
pub mod state;

pub use clipboard::ClipboardMessage;
pub use commands::{Action, Command, CommandState, EditCommand};
pub use history::EditHistory;
pub use selection::SelectionState;
pub use state::EditorState;
