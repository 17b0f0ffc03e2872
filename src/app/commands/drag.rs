//! Verschieben eines Kontrollpunkts samt mitgezogener Punkte.

use super::EditCommand;
use crate::core::{Document, Vector2};
use indexmap::IndexSet;

/// Erfasste Bewegung eines einzelnen Punkts.
#[derive(Debug, Clone, PartialEq)]
struct Move {
    uid: String,
    from: Vector2,
    to: Vector2,
}

/// Verschiebt `primary` und alle `followers` um `offset`.
///
/// Aufeinanderfolgende Drags derselben Punktmenge werden zu einem Undo-Schritt.
#[derive(Debug, Clone)]
pub struct DragControls {
    path: String,
    primary: String,
    /// Mitgezogene Punkte; Reihenfolge spielt für den Merge keine Rolle
    followers: IndexSet<String>,
    offset: Vector2,
    moves: Vec<Move>,
}

impl DragControls {
    pub fn new(
        path: &str,
        primary: &str,
        followers: impl IntoIterator<Item = String>,
        offset: Vector2,
    ) -> Self {
        Self {
            path: path.to_string(),
            primary: primary.to_string(),
            followers: followers.into_iter().collect(),
            offset,
            moves: Vec::new(),
        }
    }

    /// Gesamtverschiebung (nach Merges die Summe aller Teilschritte).
    pub fn offset(&self) -> Vector2 {
        self.offset
    }
}

impl EditCommand for DragControls {
    fn execute(&mut self, doc: &mut Document) -> bool {
        let Some(path) = doc.path_mut(&self.path) else {
            return false;
        };
        if path.control(&self.primary).is_none() {
            log::debug!("Drag: Kontrollpunkt {} nicht gefunden", self.primary);
            return false;
        }

        let mut moves = Vec::with_capacity(1 + self.followers.len());
        for uid in std::iter::once(&self.primary).chain(&self.followers) {
            if moves.iter().any(|m: &Move| &m.uid == uid) {
                continue;
            }
            let Some(from) = path.control(uid).map(|c| c.position) else {
                continue;
            };
            let to = from.add(self.offset);
            path.move_control(uid, to);
            moves.push(Move {
                uid: uid.clone(),
                from,
                to,
            });
        }
        self.moves = moves;
        true
    }

    fn undo(&mut self, doc: &mut Document) {
        let Some(path) = doc.path_mut(&self.path) else {
            return;
        };
        for m in self.moves.iter().rev() {
            path.move_control(&m.uid, m.from);
        }
    }

    fn redo(&mut self, doc: &mut Document) {
        let Some(path) = doc.path_mut(&self.path) else {
            return;
        };
        for m in &self.moves {
            path.move_control(&m.uid, m.to);
        }
    }

    /// Nur bei identischem Pfad, Primärpunkt und gleicher Mitläufer-Menge.
    fn merge(&mut self, newer: &Self) -> bool {
        if self.path != newer.path
            || self.primary != newer.primary
            || self.followers != newer.followers
        {
            return false;
        }
        for m in &mut self.moves {
            if let Some(later) = newer.moves.iter().find(|n| n.uid == m.uid) {
                m.to = later.to;
            }
        }
        self.offset = self.offset.add(newer.offset);
        true
    }

    fn affected_entities(&self) -> Option<Vec<String>> {
        let mut ids = vec![self.primary.clone()];
        ids.extend(self.followers.iter().cloned());
        Some(ids)
    }
}
