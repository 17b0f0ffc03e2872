//! Pfade hinzufügen und entfernen.
//!
//! Beide Commands merken sich die Listen-Indizes, damit Undo die ursprüngliche
//! Reihenfolge exakt wiederherstellt.

use super::EditCommand;
use crate::core::{Document, Path};

/// Fügt Pfade ab `index` ein (`None` = am Ende).
#[derive(Debug, Clone)]
pub struct AddPaths {
    /// Pfade, solange sie nicht im Dokument liegen
    pending: Vec<Path>,
    index: Option<usize>,
    /// IDs und Einfüge-Indizes in Einfügereihenfolge
    placed: Vec<(usize, String)>,
}

impl AddPaths {
    pub fn new(paths: Vec<Path>, index: Option<usize>) -> Self {
        Self {
            pending: paths,
            index,
            placed: Vec::new(),
        }
    }

    pub fn path_uids(&self) -> Vec<String> {
        if self.placed.is_empty() {
            self.pending.iter().map(|p| p.uid.clone()).collect()
        } else {
            self.placed.iter().map(|(_, uid)| uid.clone()).collect()
        }
    }

    fn place(&mut self, doc: &mut Document) {
        let indices: Vec<usize> = if self.placed.is_empty() {
            let start = self.index.unwrap_or(doc.len()).min(doc.len());
            (start..start + self.pending.len()).collect()
        } else {
            self.placed.iter().map(|(index, _)| *index).collect()
        };
        self.placed.clear();
        for (index, path) in indices.into_iter().zip(self.pending.drain(..)) {
            self.placed.push((index, path.uid.clone()));
            doc.insert_path(index, path);
        }
    }
}

impl EditCommand for AddPaths {
    fn execute(&mut self, doc: &mut Document) -> bool {
        if self.pending.is_empty() {
            return false;
        }
        self.place(doc);
        true
    }

    fn undo(&mut self, doc: &mut Document) {
        let mut taken = Vec::with_capacity(self.placed.len());
        for (_, uid) in self.placed.iter().rev() {
            if let Some((_, path)) = doc.remove_path(uid) {
                taken.push(path);
            }
        }
        taken.reverse();
        self.pending = taken;
    }

    fn redo(&mut self, doc: &mut Document) {
        self.place(doc);
    }

    fn affected_entities(&self) -> Option<Vec<String>> {
        Some(self.path_uids())
    }
}

/// Entfernt Pfade anhand ihrer IDs.
#[derive(Debug, Clone)]
pub struct RemovePaths {
    uids: Vec<String>,
    /// Entfernte Pfade mit Index zum Zeitpunkt der Entfernung
    removed: Vec<(usize, Path)>,
}

impl RemovePaths {
    pub fn new(uids: Vec<String>) -> Self {
        Self {
            uids,
            removed: Vec::new(),
        }
    }
}

impl EditCommand for RemovePaths {
    fn execute(&mut self, doc: &mut Document) -> bool {
        self.removed = self
            .uids
            .iter()
            .filter_map(|uid| doc.remove_path(uid))
            .collect();
        !self.removed.is_empty()
    }

    fn undo(&mut self, doc: &mut Document) {
        for (index, path) in self.removed.drain(..).rev() {
            doc.insert_path(index, path);
        }
    }

    fn redo(&mut self, doc: &mut Document) {
        self.removed = self
            .uids
            .iter()
            .filter_map(|uid| doc.remove_path(uid))
            .collect();
    }

    fn affected_entities(&self) -> Option<Vec<String>> {
        Some(self.uids.clone())
    }
}
