//! Umkehrbare Bearbeitungs-Commands.
//!
//! Jede Mutation am `Document` läuft über genau einen Command. Ein Command
//! erfasst beim ersten `execute` alles, was für ein exaktes Undo nötig ist;
//! `redo` wendet diesen Zustand erneut an, ohne neu zu rechnen.

/// Verschieben von Kontrollpunkten.
mod drag;
/// Keyframes hinzufügen, verschieben, entfernen.
mod keyframes;
/// Pfade hinzufügen und entfernen.
mod paths;
/// Gebündelte Eigenschafts-Updates.
mod properties;
/// Strukturelle Segment-Änderungen.
mod segments;

pub use drag::DragControls;
pub use keyframes::{AddKeyframe, MoveKeyframe, RemoveKeyframe};
pub use paths::{AddPaths, RemovePaths};
pub use properties::{ControlPatch, ControlTarget, PathPatch, PropertyPatch, UpdateProperties};
pub use segments::{SegmentEdit, SegmentOp};

use crate::core::Document;

/// Schnittstelle aller Command-Varianten.
pub trait EditCommand {
    /// Wendet den Command erstmals an und erfasst den Undo-Zustand.
    /// Gibt `false` zurück, wenn nichts geändert wurde.
    fn execute(&mut self, doc: &mut Document) -> bool;

    /// Nimmt die Wirkung zurück.
    fn undo(&mut self, doc: &mut Document);

    /// Wendet den erfassten Zustand erneut an.
    fn redo(&mut self, doc: &mut Document);

    /// Übernimmt die Wirkung eines direkt folgenden Commands gleicher Art.
    fn merge(&mut self, _newer: &Self) -> bool
    where
        Self: Sized,
    {
        false
    }

    /// Betroffene Entitäten für die Selektion nach Undo/Redo.
    fn affected_entities(&self) -> Option<Vec<String>> {
        None
    }
}

/// Alle Command-Varianten.
#[derive(Debug, Clone)]
pub enum Action {
    UpdateControls(UpdateProperties<ControlPatch>),
    UpdatePaths(UpdateProperties<PathPatch>),
    EditSegment(SegmentEdit),
    DragControls(DragControls),
    AddKeyframe(AddKeyframe),
    MoveKeyframe(MoveKeyframe),
    RemoveKeyframe(RemoveKeyframe),
    AddPaths(AddPaths),
    RemovePaths(RemovePaths),
}

macro_rules! dispatch {
    ($action:expr, $inner:ident => $body:expr) => {
        match $action {
            Action::UpdateControls($inner) => $body,
            Action::UpdatePaths($inner) => $body,
            Action::EditSegment($inner) => $body,
            Action::DragControls($inner) => $body,
            Action::AddKeyframe($inner) => $body,
            Action::MoveKeyframe($inner) => $body,
            Action::RemoveKeyframe($inner) => $body,
            Action::AddPaths($inner) => $body,
            Action::RemovePaths($inner) => $body,
        }
    };
}

impl Action {
    /// Anzeigename der Variante (für Logs).
    pub fn kind(&self) -> &'static str {
        match self {
            Action::UpdateControls(_) => "UpdateControls",
            Action::UpdatePaths(_) => "UpdatePaths",
            Action::EditSegment(_) => "EditSegment",
            Action::DragControls(_) => "DragControls",
            Action::AddKeyframe(_) => "AddKeyframe",
            Action::MoveKeyframe(_) => "MoveKeyframe",
            Action::RemoveKeyframe(_) => "RemoveKeyframe",
            Action::AddPaths(_) => "AddPaths",
            Action::RemovePaths(_) => "RemovePaths",
        }
    }

    fn execute(&mut self, doc: &mut Document) -> bool {
        dispatch!(self, c => c.execute(doc))
    }

    fn undo(&mut self, doc: &mut Document) {
        dispatch!(self, c => c.undo(doc))
    }

    fn redo(&mut self, doc: &mut Document) {
        dispatch!(self, c => c.redo(doc))
    }

    fn affected_entities(&self) -> Option<Vec<String>> {
        dispatch!(self, c => c.affected_entities())
    }

    /// Merge nur zwischen gleichen Varianten.
    fn merge(&mut self, newer: &Action) -> bool {
        match (self, newer) {
            (Action::UpdateControls(a), Action::UpdateControls(b)) => a.merge(b),
            (Action::UpdatePaths(a), Action::UpdatePaths(b)) => a.merge(b),
            (Action::EditSegment(a), Action::EditSegment(b)) => a.merge(b),
            (Action::DragControls(a), Action::DragControls(b)) => a.merge(b),
            (Action::AddKeyframe(a), Action::AddKeyframe(b)) => a.merge(b),
            (Action::MoveKeyframe(a), Action::MoveKeyframe(b)) => a.merge(b),
            (Action::RemoveKeyframe(a), Action::RemoveKeyframe(b)) => a.merge(b),
            (Action::AddPaths(a), Action::AddPaths(b)) => a.merge(b),
            (Action::RemovePaths(a), Action::RemovePaths(b)) => a.merge(b),
            _ => false,
        }
    }
}

macro_rules! impl_from_for_action {
    ($($variant:ident($ty:ty)),* $(,)?) => {
        $(
            impl From<$ty> for Action {
                fn from(command: $ty) -> Self {
                    Action::$variant(command)
                }
            }
        )*
    };
}

impl_from_for_action!(
    UpdateControls(UpdateProperties<ControlPatch>),
    UpdatePaths(UpdateProperties<PathPatch>),
    EditSegment(SegmentEdit),
    DragControls(DragControls),
    AddKeyframe(AddKeyframe),
    MoveKeyframe(MoveKeyframe),
    RemoveKeyframe(RemoveKeyframe),
    AddPaths(AddPaths),
    RemovePaths(RemovePaths),
);

/// Lebenszyklus eines Commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandState {
    Constructed,
    Executed,
    Undone,
    Redone,
}

/// Ein Command mit überwachtem Lebenszyklus.
///
/// `undo`/`redo` vor dem ersten `execute` ist ein Aufruferfehler und löst
/// eine Assertion aus.
#[derive(Debug, Clone)]
pub struct Command {
    action: Action,
    state: CommandState,
}

impl Command {
    pub fn new(action: impl Into<Action>) -> Self {
        Self {
            action: action.into(),
            state: CommandState::Constructed,
        }
    }

    pub fn action(&self) -> &Action {
        &self.action
    }

    pub fn state(&self) -> CommandState {
        self.state
    }

    pub fn kind(&self) -> &'static str {
        self.action.kind()
    }

    /// Erstausführung; gibt `false` zurück, wenn nichts geändert wurde.
    pub fn execute(&mut self, doc: &mut Document) -> bool {
        assert_eq!(
            self.state,
            CommandState::Constructed,
            "Command {} wurde bereits ausgeführt",
            self.kind()
        );
        self.state = CommandState::Executed;
        self.action.execute(doc)
    }

    pub fn undo(&mut self, doc: &mut Document) {
        assert!(
            matches!(self.state, CommandState::Executed | CommandState::Redone),
            "Undo auf Command {} im Zustand {:?}",
            self.kind(),
            self.state
        );
        self.action.undo(doc);
        self.state = CommandState::Undone;
    }

    pub fn redo(&mut self, doc: &mut Document) {
        assert_eq!(
            self.state,
            CommandState::Undone,
            "Redo auf Command {} ohne vorheriges Undo",
            self.kind()
        );
        self.action.redo(doc);
        self.state = CommandState::Redone;
    }

    /// Versucht, einen direkt folgenden, bereits ausgeführten Command aufzunehmen.
    pub fn merge(&mut self, newer: &Command) -> bool {
        if self.state == CommandState::Constructed || newer.state == CommandState::Constructed {
            return false;
        }
        self.action.merge(&newer.action)
    }

    pub fn affected_entities(&self) -> Option<Vec<String>> {
        self.action.affected_entities()
    }
}
