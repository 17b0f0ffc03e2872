//! Command-basierte Undo/Redo-History mit Merge-Fenster und Speichermarke.

use super::commands::Command;
use super::SelectionState;
use crate::core::Document;
use std::time::{Duration, Instant};

/// Ein abgeschlossener History-Eintrag.
///
/// `serial` ist die Identität des Eintrags: die Speichermarke vergleicht nur
/// diese Nummer, nicht den Inhalt.
#[derive(Debug)]
pub struct HistoryEntry {
    serial: u64,
    pub title: String,
    pub command: Command,
}

impl HistoryEntry {
    pub fn serial(&self) -> u64 {
        self.serial
    }
}

/// Offener Eintrag, in den nachfolgende Commands noch verschmelzen können.
#[derive(Debug)]
struct PendingEntry {
    entry: HistoryEntry,
    last_touch: Instant,
}

/// Undo/Redo-Manager über ausgeführte Commands.
#[derive(Debug)]
pub struct EditHistory {
    done: Vec<HistoryEntry>,
    undone: Vec<HistoryEntry>,
    pending: Option<PendingEntry>,
    /// Serial des obersten Eintrags beim letzten `save` (`None` = leerer Stack)
    saved: Option<u64>,
    next_serial: u64,
    max_depth: usize,
}

impl Default for EditHistory {
    fn default() -> Self {
        Self::new_with_capacity(crate::shared::options::HISTORY_DEPTH)
    }
}

impl EditHistory {
    /// Erstellt einen neuen History-Manager mit maximaler Tiefe.
    pub fn new_with_capacity(max_depth: usize) -> Self {
        Self {
            done: Vec::new(),
            undone: Vec::new(),
            pending: None,
            saved: None,
            next_serial: 0,
            max_depth: max_depth.max(1),
        }
    }

    /// Führt einen Command aus und zeichnet ihn auf.
    ///
    /// Gibt `false` zurück, wenn der Command nichts geändert hat; er wird dann
    /// nicht aufgezeichnet. Der Redo-Stack wird in jedem Fall geleert.
    pub fn execute_command(
        &mut self,
        doc: &mut Document,
        title: &str,
        command: Command,
        merge_window: Duration,
    ) -> bool {
        self.execute_command_at(doc, title, command, merge_window, Instant::now())
    }

    /// Wie `execute_command`, mit explizitem Zeitpunkt.
    pub fn execute_command_at(
        &mut self,
        doc: &mut Document,
        title: &str,
        mut command: Command,
        merge_window: Duration,
        now: Instant,
    ) -> bool {
        // Jede Ausführung verwirft die Redo-Einträge, auch ohne Änderung
        self.undone.clear();
        if !command.execute(doc) {
            log::debug!("{title}: keine Änderung, nicht aufgezeichnet");
            return false;
        }

        if let Some(pending) = &mut self.pending {
            let within_window = now.duration_since(pending.last_touch) < merge_window;
            if pending.entry.title == title
                && within_window
                && pending.entry.command.merge(&command)
            {
                pending.last_touch = now;
                return true;
            }
        }

        self.commit();
        let serial = self.next_serial;
        self.next_serial += 1;
        self.pending = Some(PendingEntry {
            entry: HistoryEntry {
                serial,
                title: title.to_string(),
                command,
            },
            last_touch: now,
        });
        true
    }

    /// Schließt den offenen Eintrag ab.
    pub fn commit(&mut self) {
        if let Some(pending) = self.pending.take() {
            self.done.push(pending.entry);
            if self.done.len() > self.max_depth {
                let excess = self.done.len() - self.max_depth;
                self.done.drain(..excess);
            }
        }
    }

    /// Nimmt den letzten Schritt zurück und selektiert die betroffenen Entitäten.
    pub fn undo(&mut self, doc: &mut Document, selection: &mut SelectionState) -> bool {
        self.commit();
        let Some(mut entry) = self.done.pop() else {
            log::debug!("Undo: nichts zu tun");
            return false;
        };
        entry.command.undo(doc);
        republish(&entry.command, doc, selection);
        log::info!("Undo ausgeführt: {}", entry.title);
        self.undone.push(entry);
        true
    }

    /// Stellt den zuletzt zurückgenommenen Schritt wieder her.
    pub fn redo(&mut self, doc: &mut Document, selection: &mut SelectionState) -> bool {
        let Some(mut entry) = self.undone.pop() else {
            log::debug!("Redo: nichts zu tun");
            return false;
        };
        self.commit();
        entry.command.redo(doc);
        republish(&entry.command, doc, selection);
        log::info!("Redo ausgeführt: {}", entry.title);
        self.done.push(entry);
        true
    }

    /// Setzt die Speichermarke auf den aktuellen obersten Eintrag.
    pub fn save(&mut self) {
        self.commit();
        self.saved = self.done.last().map(HistoryEntry::serial);
    }

    /// Vergleicht den obersten Eintrag per Identität mit der Speichermarke.
    ///
    /// Nach `clear` auf einem zuvor leer gespeicherten Stack meldet dies
    /// „unverändert“, obwohl das Dokument abweichen kann.
    pub fn is_modified(&mut self) -> bool {
        self.commit();
        self.done.last().map(HistoryEntry::serial) != self.saved
    }

    /// Verwirft alle Einträge; die Speichermarke bleibt bestehen.
    pub fn clear(&mut self) {
        self.done.clear();
        self.undone.clear();
        self.pending = None;
    }

    /// Prüft ob Undo möglich ist.
    pub fn can_undo(&self) -> bool {
        self.pending.is_some() || !self.done.is_empty()
    }

    /// Prüft ob Redo möglich ist.
    pub fn can_redo(&self) -> bool {
        !self.undone.is_empty()
    }

    /// Anzahl der Undo-Schritte (inkl. offenem Eintrag).
    pub fn undo_len(&self) -> usize {
        self.done.len() + usize::from(self.pending.is_some())
    }

    pub fn redo_len(&self) -> usize {
        self.undone.len()
    }

    /// Titel des nächsten Undo-Schritts.
    pub fn undo_title(&self) -> Option<&str> {
        self.pending
            .as_ref()
            .map(|p| &p.entry)
            .or_else(|| self.done.last())
            .map(|e| e.title.as_str())
    }

    /// Titel des nächsten Redo-Schritts.
    pub fn redo_title(&self) -> Option<&str> {
        self.undone.last().map(|e| e.title.as_str())
    }
}

/// Veröffentlicht die noch existierenden betroffenen Entitäten als Selektion.
fn republish(command: &Command, doc: &Document, selection: &mut SelectionState) {
    if let Some(ids) = command.affected_entities() {
        selection.replace(ids.into_iter().filter(|id| doc.contains_entity(id)));
    }
}
