//! Strukturelle Segment-Commands: Anhängen, Entfernen, Teilen, Umwandeln.
//!
//! Alle vier planen beim ersten `execute` einen `SegmentSplice` und wenden ihn
//! an; Undo/Redo arbeiten ausschließlich mit diesem erfassten Splice.

use super::EditCommand;
use crate::core::{Document, SegmentSplice, SegmentVariant, Vector2};

/// Art der strukturellen Änderung.
#[derive(Debug, Clone, PartialEq)]
pub enum SegmentOp {
    /// Neues Segment am Pfadende
    Append {
        variant: SegmentVariant,
        position: Vector2,
        heading: f64,
    },
    /// Kontrollpunkt entfernen (Segment fällt weg oder wird zur Geraden)
    Remove { control: String },
    /// Segment an einem eingefügten Punkt teilen
    Split { segment: String, point: Vector2 },
    /// Segment in Gerade/Kurve umwandeln
    Convert { segment: String, to: SegmentVariant },
}

/// Strukturelle Änderung an einem Pfad.
#[derive(Debug, Clone)]
pub struct SegmentEdit {
    path: String,
    op: SegmentOp,
    splice: Option<SegmentSplice>,
}

impl SegmentEdit {
    pub fn new(path: &str, op: SegmentOp) -> Self {
        Self {
            path: path.to_string(),
            op,
            splice: None,
        }
    }

    pub fn append(path: &str, variant: SegmentVariant, position: Vector2, heading: f64) -> Self {
        Self::new(
            path,
            SegmentOp::Append {
                variant,
                position,
                heading,
            },
        )
    }

    pub fn remove(path: &str, control: &str) -> Self {
        Self::new(
            path,
            SegmentOp::Remove {
                control: control.to_string(),
            },
        )
    }

    pub fn split(path: &str, segment: &str, point: Vector2) -> Self {
        Self::new(
            path,
            SegmentOp::Split {
                segment: segment.to_string(),
                point,
            },
        )
    }

    pub fn convert(path: &str, segment: &str, to: SegmentVariant) -> Self {
        Self::new(
            path,
            SegmentOp::Convert {
                segment: segment.to_string(),
                to,
            },
        )
    }

    pub fn op(&self) -> &SegmentOp {
        &self.op
    }

    /// Der beim Ausführen erfasste Splice.
    pub fn splice(&self) -> Option<&SegmentSplice> {
        self.splice.as_ref()
    }
}

impl EditCommand for SegmentEdit {
    fn execute(&mut self, doc: &mut Document) -> bool {
        let Some(path) = doc.path_mut(&self.path) else {
            log::debug!("Pfad {} nicht gefunden", self.path);
            return false;
        };
        let planned = match &self.op {
            SegmentOp::Append {
                variant,
                position,
                heading,
            } => path.plan_append(*variant, *position, *heading),
            SegmentOp::Remove { control } => path.plan_remove(control),
            SegmentOp::Split { segment, point } => path.plan_split(segment, *point),
            SegmentOp::Convert { segment, to } => path.plan_convert(segment, *to),
        };
        let Some(splice) = planned else {
            log::debug!("{:?} auf Pfad {}: keine Änderung", self.op, self.path);
            return false;
        };
        path.apply_splice(&splice);
        self.splice = Some(splice);
        true
    }

    fn undo(&mut self, doc: &mut Document) {
        if let (Some(path), Some(splice)) = (doc.path_mut(&self.path), &self.splice) {
            path.revert_splice(splice);
        }
    }

    fn redo(&mut self, doc: &mut Document) {
        if let (Some(path), Some(splice)) = (doc.path_mut(&self.path), &self.splice) {
            path.apply_splice(splice);
        }
    }

    /// Neu eingefügte und entfernte Kontrollpunkte; nach Undo/Redo bleiben
    /// davon nur die existierenden in der Selektion.
    fn affected_entities(&self) -> Option<Vec<String>> {
        let splice = self.splice.as_ref()?;
        let ids: Vec<String> = splice
            .inserted_controls
            .iter()
            .chain(&splice.removed_controls)
            .map(|c| c.uid.clone())
            .collect();
        (!ids.is_empty()).then_some(ids)
    }
}
