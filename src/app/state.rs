//! Zentraler Editor-Zustand: Dokument, History, Selektion und Optionen.

use super::clipboard::ClipboardMessage;
use super::commands::{Action, Command};
use super::history::EditHistory;
use super::SelectionState;
use crate::core::{Document, Knot, Path};
use crate::shared::EditorOptions;

/// Hauptzustand des Editors
///
/// Einziger Einstiegspunkt des Hosts: alle Änderungen laufen über `execute`.
#[derive(Debug)]
pub struct EditorState {
    /// Alle Pfade
    pub document: Document,
    /// Undo/Redo-History
    pub history: EditHistory,
    /// Aktuelle Selektion
    pub selection: SelectionState,
    /// Laufzeit-Optionen
    pub options: EditorOptions,
}

impl Default for EditorState {
    fn default() -> Self {
        Self::new(EditorOptions::default())
    }
}

impl EditorState {
    /// Erstellt einen leeren Editor-Zustand.
    pub fn new(options: EditorOptions) -> Self {
        Self {
            document: Document::new(),
            history: EditHistory::new_with_capacity(options.history_depth),
            selection: SelectionState::new(),
            options,
        }
    }

    /// Führt eine Aktion unter `title` aus; gleiche Titel verschmelzen
    /// innerhalb des Merge-Fensters.
    pub fn execute(&mut self, title: &str, action: impl Into<Action>) -> bool {
        let window = self.options.merge_window();
        self.history
            .execute_command(&mut self.document, title, Command::new(action), window)
    }

    pub fn undo(&mut self) -> bool {
        self.history.undo(&mut self.document, &mut self.selection)
    }

    pub fn redo(&mut self) -> bool {
        self.history.redo(&mut self.document, &mut self.selection)
    }

    pub fn save(&mut self) {
        self.history.save();
        log::info!("Speichermarke gesetzt");
    }

    pub fn is_modified(&mut self) -> bool {
        self.history.is_modified()
    }

    /// Fahrknoten eines Pfads mit den aktuellen Optionen (gecacht).
    pub fn knots(&mut self, path_uid: &str) -> Option<&[Knot]> {
        let general = &self.options.general;
        let speed = &self.options.speed;
        self.document
            .path_mut(path_uid)
            .map(|path| path.knots(general, speed))
    }

    /// Kodiert die selektierten Pfade für die Zwischenablage.
    pub fn copy_selected(&self) -> anyhow::Result<String> {
        let paths: Vec<Path> = self
            .document
            .paths()
            .iter()
            .filter(|p| self.selection.contains(&p.uid))
            .cloned()
            .collect();
        ClipboardMessage::new(self.options.general.uol, paths).encode()
    }

    /// Fügt den Inhalt einer Zwischenablage-Nachricht ein.
    ///
    /// Fremde oder veraltete Nachrichten werden ignoriert (`false`).
    pub fn paste(&mut self, text: &str) -> bool {
        let Some(message) = ClipboardMessage::decode(text) else {
            return false;
        };
        let command = message.into_paste_command(self.options.general.uol, None);
        let window = self.options.merge_window();
        self.history
            .execute_command(&mut self.document, "Einfügen", command, window)
    }
}
