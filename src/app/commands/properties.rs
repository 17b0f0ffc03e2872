//! Gebündelte Eigenschafts-Updates über mehrere Ziele.

use super::EditCommand;
use crate::core::{Document, Vector2};
use std::fmt::Debug;

/// Teiländerung an einer Entität. Nur gesetzte Felder werden geschrieben.
pub trait PropertyPatch: Clone + Debug + PartialEq {
    /// Adressiert ein einzelnes Ziel im Dokument.
    type Target: Clone + Debug + PartialEq;

    /// Schreibt den Patch und liefert die vorherigen Werte der geschriebenen
    /// Felder. `None`, wenn das Ziel nicht existiert.
    fn apply(&self, doc: &mut Document, target: &Self::Target) -> Option<Self>;

    /// Überschreibt gesetzte Felder mit denen aus `newer`.
    fn overlay(&mut self, newer: &Self);

    /// Entitäts-ID des Ziels für die Selektion.
    fn entity(target: &Self::Target) -> String;
}

fn overlay_field<T: Clone>(field: &mut Option<T>, newer: &Option<T>) {
    if newer.is_some() {
        field.clone_from(newer);
    }
}

// ── Kontrollpunkte ──────────────────────────────────────────────────

/// Kontrollpunkt innerhalb eines Pfads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlTarget {
    pub path: String,
    pub control: String,
}

impl ControlTarget {
    pub fn new(path: &str, control: &str) -> Self {
        Self {
            path: path.to_string(),
            control: control.to_string(),
        }
    }
}

/// Änderbare Eigenschaften eines Kontrollpunkts.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ControlPatch {
    pub position: Option<Vector2>,
    /// Nur für Endpunkte wirksam
    pub heading: Option<f64>,
    pub locked: Option<bool>,
    pub visible: Option<bool>,
}

impl PropertyPatch for ControlPatch {
    type Target = ControlTarget;

    fn apply(&self, doc: &mut Document, target: &ControlTarget) -> Option<Self> {
        let control = doc.path_mut(&target.path)?.control_mut(&target.control)?;
        let mut previous = ControlPatch::default();
        if let Some(position) = self.position {
            previous.position = Some(control.position);
            control.position.set_from(position);
        }
        if let Some(heading) = self.heading {
            let before = control.heading();
            if control.set_heading(heading) {
                previous.heading = before;
            }
        }
        if let Some(locked) = self.locked {
            previous.locked = Some(std::mem::replace(&mut control.locked, locked));
        }
        if let Some(visible) = self.visible {
            previous.visible = Some(std::mem::replace(&mut control.visible, visible));
        }
        Some(previous)
    }

    fn overlay(&mut self, newer: &Self) {
        overlay_field(&mut self.position, &newer.position);
        overlay_field(&mut self.heading, &newer.heading);
        overlay_field(&mut self.locked, &newer.locked);
        overlay_field(&mut self.visible, &newer.visible);
    }

    fn entity(target: &ControlTarget) -> String {
        target.control.clone()
    }
}

// ── Pfade ───────────────────────────────────────────────────────────

/// Änderbare Eigenschaften eines Pfads.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PathPatch {
    pub name: Option<String>,
    pub locked: Option<bool>,
    pub visible: Option<bool>,
}

impl PropertyPatch for PathPatch {
    type Target = String;

    fn apply(&self, doc: &mut Document, target: &String) -> Option<Self> {
        let path = doc.path_mut(target)?;
        let mut previous = PathPatch::default();
        if let Some(name) = &self.name {
            previous.name = Some(std::mem::replace(&mut path.name, name.clone()));
        }
        if let Some(locked) = self.locked {
            previous.locked = Some(std::mem::replace(&mut path.locked, locked));
        }
        if let Some(visible) = self.visible {
            previous.visible = Some(std::mem::replace(&mut path.visible, visible));
        }
        Some(previous)
    }

    fn overlay(&mut self, newer: &Self) {
        overlay_field(&mut self.name, &newer.name);
        overlay_field(&mut self.locked, &newer.locked);
        overlay_field(&mut self.visible, &newer.visible);
    }

    fn entity(target: &String) -> String {
        target.clone()
    }
}

// ── Command ─────────────────────────────────────────────────────────

/// Setzt denselben Patch auf alle Ziele.
#[derive(Debug, Clone)]
pub struct UpdateProperties<P: PropertyPatch> {
    targets: Vec<P::Target>,
    patch: P,
    /// Vorherige Werte je tatsächlich geändertem Ziel
    previous: Vec<(P::Target, P)>,
}

impl<P: PropertyPatch> UpdateProperties<P> {
    pub fn new(targets: Vec<P::Target>, patch: P) -> Self {
        Self {
            targets,
            patch,
            previous: Vec::new(),
        }
    }

    pub fn patch(&self) -> &P {
        &self.patch
    }
}

impl<P: PropertyPatch> EditCommand for UpdateProperties<P> {
    fn execute(&mut self, doc: &mut Document) -> bool {
        self.previous = self
            .targets
            .iter()
            .filter_map(|target| {
                self.patch
                    .apply(doc, target)
                    .map(|previous| (target.clone(), previous))
            })
            .collect();
        !self.previous.is_empty()
    }

    fn undo(&mut self, doc: &mut Document) {
        for (target, previous) in self.previous.iter().rev() {
            previous.apply(doc, target);
        }
    }

    fn redo(&mut self, doc: &mut Document) {
        for (target, _) in &self.previous {
            self.patch.apply(doc, target);
        }
    }

    /// Gleiche Ziel-Liste: neueste Werte gewinnen, älteste Vorwerte bleiben.
    fn merge(&mut self, newer: &Self) -> bool {
        if self.targets != newer.targets {
            return false;
        }
        self.patch.overlay(&newer.patch);
        for (target, newer_previous) in &newer.previous {
            match self.previous.iter_mut().find(|(t, _)| t == target) {
                Some((_, previous)) => {
                    let mut combined = newer_previous.clone();
                    combined.overlay(previous);
                    *previous = combined;
                }
                None => self.previous.push((target.clone(), newer_previous.clone())),
            }
        }
        true
    }

    fn affected_entities(&self) -> Option<Vec<String>> {
        Some(self.targets.iter().map(P::entity).collect())
    }
}
