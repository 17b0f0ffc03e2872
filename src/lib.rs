//! Path-Planner-Editor Library.
//! Pfad-Engine und Undo/Redo-Kern, als Library exportiert für Host und Tests.

pub mod app;
pub mod core;
pub mod shared;

pub use app::{Action, ClipboardMessage, Command, EditHistory, EditorState, SelectionState};
pub use core::{
    Control, ControlKind, Document, Keyframe, Knot, Path, Segment, SegmentVariant, Vector2,
};
pub use shared::{EditorOptions, GeneralConfig, NumberRange, SpeedConfig, UnitOfLength};
