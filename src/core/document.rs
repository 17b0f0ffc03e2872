//! Arbeitsbereich: geordnete Liste aller Pfade.

use super::path::Path;
use serde::{Deserialize, Serialize};

/// Alle Pfade eines geöffneten Projekts.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Document {
    paths: Vec<Path>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn paths(&self) -> &[Path] {
        &self.paths
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn path(&self, uid: &str) -> Option<&Path> {
        self.paths.iter().find(|p| p.uid == uid)
    }

    pub fn path_mut(&mut self, uid: &str) -> Option<&mut Path> {
        self.paths.iter_mut().find(|p| p.uid == uid)
    }

    pub fn path_index(&self, uid: &str) -> Option<usize> {
        self.paths.iter().position(|p| p.uid == uid)
    }

    /// Pfad, der den Kontrollpunkt enthält.
    pub fn path_of_control(&self, control_uid: &str) -> Option<&Path> {
        self.paths.iter().find(|p| p.control(control_uid).is_some())
    }

    /// Prüft ob `uid` einen Pfad oder Kontrollpunkt bezeichnet.
    pub fn contains_entity(&self, uid: &str) -> bool {
        self.path(uid).is_some() || self.path_of_control(uid).is_some()
    }

    /// Hängt einen Pfad an.
    pub fn push_path(&mut self, path: Path) {
        self.paths.push(path);
    }

    /// Fügt einen Pfad an `index` ein (begrenzt auf das Listenende).
    pub fn insert_path(&mut self, index: usize, path: Path) {
        let index = index.min(self.paths.len());
        self.paths.insert(index, path);
    }

    /// Entfernt einen Pfad und liefert ihn mit seinem bisherigen Index.
    pub fn remove_path(&mut self, uid: &str) -> Option<(usize, Path)> {
        let index = self.path_index(uid)?;
        Some((index, self.paths.remove(index)))
    }
}
