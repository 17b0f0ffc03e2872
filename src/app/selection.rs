//! Selektion des Hosts, wird bei Undo/Redo neu veröffentlicht.

use indexmap::IndexSet;

/// Auswahlbezogener Anwendungszustand (Pfade und Kontrollpunkte).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionState {
    /// Selektierte Entitäts-IDs in Auswahlreihenfolge
    pub selected_ids: IndexSet<String>,
}

impl SelectionState {
    /// Erstellt einen leeren Selektionszustand.
    pub fn new() -> Self {
        Self::default()
    }

    /// Ersetzt die Selektion vollständig.
    pub fn replace(&mut self, ids: impl IntoIterator<Item = String>) {
        self.selected_ids = ids.into_iter().collect();
    }

    pub fn contains(&self, uid: &str) -> bool {
        self.selected_ids.contains(uid)
    }

    pub fn is_empty(&self) -> bool {
        self.selected_ids.is_empty()
    }

    pub fn clear(&mut self) {
        self.selected_ids.clear();
    }
}
