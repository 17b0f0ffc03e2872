//! Ein Pfad: Folge von Segmenten mit gemeinsamen Endpunkten.
//!
//! Der Pfad besitzt die Arena aller Kontrollpunkte. Strukturelle Änderungen
//! (Anhängen, Teilen, Umwandeln, Entfernen) werden zuerst rein als
//! `SegmentSplice` geplant und anschließend angewendet; derselbe Splice dient
//! rückwärts als exakter Undo-Datensatz.

mod knots;

use super::control::{Control, ControlArena};
use super::knot::{Knot, KnotCache};
use super::segment::{Segment, SegmentVariant};
use super::vector::Vector2;
use crate::shared::{make_uid, GeneralConfig, SpeedConfig};
use serde::{Deserialize, Serialize};

/// Strukturelle Änderung an der Segmentliste eines Pfads.
///
/// Ersetzt `removed_segments` ab `index` durch `inserted_segments` und tauscht
/// die nicht mehr referenzierten Kontrollpunkte gegen die neu benötigten.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentSplice {
    pub index: usize,
    pub removed_segments: Vec<Segment>,
    pub inserted_segments: Vec<Segment>,
    pub removed_controls: Vec<Control>,
    pub inserted_controls: Vec<Control>,
}

impl SegmentSplice {
    /// IDs aller neu eingefügten Kontrollpunkte (für die Selektion).
    pub fn inserted_control_ids(&self) -> Vec<String> {
        self.inserted_controls.iter().map(|c| c.uid.clone()).collect()
    }
}

/// Ein bearbeitbarer Pfad.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Path {
    pub uid: String,
    pub name: String,
    pub locked: bool,
    pub visible: bool,
    controls: ControlArena,
    segments: Vec<Segment>,
    /// Geometrie-Revision, wird bei jeder Änderung erhöht
    #[serde(skip)]
    revision: u64,
    #[serde(skip)]
    knot_cache: KnotCache,
}

impl Path {
    /// Erstellt einen Pfad aus einer einzelnen Geraden.
    pub fn new(name: &str, start: Control, end: Control) -> Self {
        let segment = Segment::line(&start.uid, &end.uid);
        let mut controls = ControlArena::new();
        controls.insert(start.uid.clone(), start);
        controls.insert(end.uid.clone(), end);
        Self {
            uid: make_uid(),
            name: name.to_string(),
            locked: false,
            visible: true,
            controls,
            segments: vec![segment],
            revision: 0,
            knot_cache: KnotCache::default(),
        }
    }

    // ── Lesender Zugriff ────────────────────────────────────────────

    pub fn controls(&self) -> &ControlArena {
        &self.controls
    }

    pub fn control(&self, uid: &str) -> Option<&Control> {
        self.controls.get(uid)
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn segment(&self, uid: &str) -> Option<&Segment> {
        self.segments.iter().find(|s| s.uid == uid)
    }

    pub fn segment_index(&self, uid: &str) -> Option<usize> {
        self.segments.iter().position(|s| s.uid == uid)
    }

    /// Segment, das den Keyframe enthält.
    pub fn segment_of_keyframe(&self, keyframe_uid: &str) -> Option<&Segment> {
        self.segments
            .iter()
            .find(|s| s.keyframe(keyframe_uid).is_some())
    }

    /// Erster Kontrollpunkt des Pfads.
    pub fn first_control(&self) -> Option<&Control> {
        self.segments.first().and_then(|s| self.controls.get(s.first()))
    }

    /// Letzter Kontrollpunkt des Pfads.
    pub fn last_control(&self) -> Option<&Control> {
        self.segments.last().and_then(|s| self.controls.get(s.last()))
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Prüft die Struktur-Invarianten: 2 oder 4 Punkte je Segment, gemeinsame
    /// Endpunkte, alle IDs auflösbar, Endpunkte gerichtet, keine verwaisten
    /// Arena-Einträge.
    pub fn is_continuous(&self) -> bool {
        let well_formed = self
            .segments
            .iter()
            .all(|s| matches!(s.controls().len(), 2 | 4));
        if self.segments.is_empty() || !well_formed {
            return false;
        }
        let linked = self
            .segments
            .windows(2)
            .all(|pair| pair[0].last() == pair[1].first());
        let resolvable = self.segments.iter().all(|s| {
            s.controls().iter().enumerate().all(|(i, uid)| {
                let is_boundary = i == 0 || i == s.controls().len() - 1;
                self.controls
                    .get(uid)
                    .is_some_and(|c| c.is_end() == is_boundary)
            })
        });
        let referenced = self
            .controls
            .keys()
            .all(|uid| self.segments.iter().any(|s| s.contains_control(uid)));
        linked && resolvable && referenced
    }

    // ── Mutation ────────────────────────────────────────────────────

    /// Markiert die Geometrie als geändert.
    fn touch(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }

    /// Veränderlicher Zugriff auf einen Kontrollpunkt; erhöht die Revision.
    pub(crate) fn control_mut(&mut self, uid: &str) -> Option<&mut Control> {
        if !self.controls.contains_key(uid) {
            return None;
        }
        self.touch();
        self.controls.get_mut(uid)
    }

    /// Veränderlicher Zugriff auf ein Segment; erhöht die Revision.
    pub(crate) fn segment_mut(&mut self, uid: &str) -> Option<&mut Segment> {
        let index = self.segment_index(uid)?;
        self.touch();
        Some(&mut self.segments[index])
    }

    /// Setzt die Position eines Kontrollpunkts und liefert die vorherige.
    pub(crate) fn move_control(&mut self, uid: &str, position: Vector2) -> Option<Vector2> {
        let control = self.control_mut(uid)?;
        let previous = control.position;
        control.position.set_from(position);
        Some(previous)
    }

    /// Wendet einen geplanten Splice an.
    pub(crate) fn apply_splice(&mut self, splice: &SegmentSplice) {
        let end = (splice.index + splice.removed_segments.len()).min(self.segments.len());
        self.segments
            .splice(splice.index..end, splice.inserted_segments.iter().cloned());
        for control in &splice.removed_controls {
            self.controls.shift_remove(&control.uid);
        }
        for control in &splice.inserted_controls {
            self.controls.insert(control.uid.clone(), control.clone());
        }
        self.touch();
    }

    /// Nimmt einen zuvor angewendeten Splice exakt zurück.
    pub(crate) fn revert_splice(&mut self, splice: &SegmentSplice) {
        let end = (splice.index + splice.inserted_segments.len()).min(self.segments.len());
        self.segments
            .splice(splice.index..end, splice.removed_segments.iter().cloned());
        for control in &splice.inserted_controls {
            self.controls.shift_remove(&control.uid);
        }
        for control in &splice.removed_controls {
            self.controls.insert(control.uid.clone(), control.clone());
        }
        self.touch();
    }

    // ── Planung struktureller Änderungen ───────────────────────────

    /// Plant das Anhängen einer Geraden oder Kurve an das Pfadende.
    ///
    /// Eine Kurve hinter einer Kurve spiegelt deren letzten Stützpunkt am
    /// gemeinsamen Endpunkt, damit die Tangente stetig bleibt.
    pub fn plan_append(
        &self,
        variant: SegmentVariant,
        position: Vector2,
        heading: f64,
    ) -> Option<SegmentSplice> {
        let last = self.segments.last()?;
        let start = self.controls.get(last.last())?.position;
        let end = Control::end(position, heading);

        let (segment, mut inserted_controls) = match variant {
            SegmentVariant::Linear => (Segment::line(last.last(), &end.uid), Vec::new()),
            SegmentVariant::Cubic => {
                let cp1 = match last.variant() {
                    SegmentVariant::Cubic => {
                        self.controls.get(&last.controls()[2])?.position.mirror(start)
                    }
                    SegmentVariant::Linear => start.lerp(position, 1.0 / 3.0),
                };
                let cp1 = Control::waypoint(cp1);
                let cp2 = Control::waypoint(start.lerp(position, 2.0 / 3.0));
                let segment = Segment::cubic(last.last(), &cp1.uid, &cp2.uid, &end.uid);
                (segment, vec![cp1, cp2])
            }
        };
        inserted_controls.push(end);

        Some(SegmentSplice {
            index: self.segments.len(),
            removed_segments: Vec::new(),
            inserted_segments: vec![segment],
            removed_controls: Vec::new(),
            inserted_controls,
        })
    }

    /// Plant das Umwandeln eines Segments in die angegebene Variante.
    pub fn plan_convert(&self, segment_uid: &str, to: SegmentVariant) -> Option<SegmentSplice> {
        let index = self.segment_index(segment_uid)?;
        let segment = &self.segments[index];
        if segment.variant() == to {
            return None;
        }

        let (converted, removed_controls, inserted_controls) = match to {
            SegmentVariant::Cubic => {
                let previous = index.checked_sub(1).map(|i| &self.segments[i]);
                let next = self.segments.get(index + 1);
                let (curve, controls) = segment.to_curve(&self.controls, previous, next)?;
                (curve, Vec::new(), controls)
            }
            SegmentVariant::Linear => {
                let removed = self.resolve_all(segment.interior())?;
                (segment.to_line()?, removed, Vec::new())
            }
        };

        Some(SegmentSplice {
            index,
            removed_segments: vec![segment.clone()],
            inserted_segments: vec![converted],
            removed_controls,
            inserted_controls,
        })
    }

    /// Plant das Teilen eines Segments an `point`.
    pub fn plan_split(&self, segment_uid: &str, point: Vector2) -> Option<SegmentSplice> {
        let index = self.segment_index(segment_uid)?;
        let segment = &self.segments[index];
        let split = segment.split(&self.controls, point)?;

        Some(SegmentSplice {
            index,
            removed_segments: vec![segment.clone()],
            inserted_segments: vec![split.first, split.second],
            removed_controls: self.resolve_all(segment.interior())?,
            inserted_controls: split.new_controls,
        })
    }

    /// Plant das Entfernen eines Kontrollpunkts.
    ///
    /// - innerer Stützpunkt: die Kurve wird zur Geraden
    /// - erster/letzter Pfadpunkt: das erste/letzte Segment entfällt
    /// - gemeinsamer Endpunkt: das spätere Segment entfällt, das frühere
    ///   endet am Endpunkt des späteren
    ///
    /// Ein Pfad mit nur einem Segment verliert dieses nie.
    pub fn plan_remove(&self, control_uid: &str) -> Option<SegmentSplice> {
        let control = self.controls.get(control_uid)?;

        if !control.is_end() {
            let owner = self
                .segments
                .iter()
                .find(|s| s.contains_control(control_uid))?;
            return self.plan_convert(&owner.uid, SegmentVariant::Linear);
        }

        if self.segments.len() < 2 {
            log::debug!("Letztes Segment von Pfad {} bleibt erhalten", self.uid);
            return None;
        }

        let last_index = self.segments.len() - 1;
        let first = &self.segments[0];
        let last = &self.segments[last_index];

        if first.first() == control_uid {
            let keep = first.last();
            let removed = first.controls().iter().filter(|uid| *uid != keep);
            return Some(SegmentSplice {
                index: 0,
                removed_segments: vec![first.clone()],
                inserted_segments: Vec::new(),
                removed_controls: self.resolve_all(removed)?,
                inserted_controls: Vec::new(),
            });
        }

        if last.last() == control_uid {
            let keep = last.first();
            let removed = last.controls().iter().filter(|uid| *uid != keep);
            return Some(SegmentSplice {
                index: last_index,
                removed_segments: vec![last.clone()],
                inserted_segments: Vec::new(),
                removed_controls: self.resolve_all(removed)?,
                inserted_controls: Vec::new(),
            });
        }

        let index = self
            .segments
            .windows(2)
            .position(|pair| pair[0].last() == control_uid)?;
        let earlier = &self.segments[index];
        let later = &self.segments[index + 1];

        let mut joined = earlier.clone();
        joined.set_last(later.last());

        let mut removed_controls = vec![control.clone()];
        removed_controls.extend(self.resolve_all(later.interior())?);

        Some(SegmentSplice {
            index,
            removed_segments: vec![earlier.clone(), later.clone()],
            inserted_segments: vec![joined],
            removed_controls,
            inserted_controls: Vec::new(),
        })
    }

    /// Löst IDs zu Kontrollpunkt-Kopien auf; `None`, wenn eine fehlt.
    fn resolve_all<'a>(&self, uids: impl IntoIterator<Item = &'a String>) -> Option<Vec<Control>> {
        uids.into_iter()
            .map(|uid| self.controls.get(uid).cloned())
            .collect()
    }

    // ── Knoten ──────────────────────────────────────────────────────

    /// Berechnet die Fahrknoten ohne Cache.
    pub fn calculate_knots(&self, general: &GeneralConfig, speed: &SpeedConfig) -> Vec<Knot> {
        let view = PathView {
            controls: &self.controls,
            segments: &self.segments,
        };
        knots::calculate(&view, general, speed)
    }

    /// Liefert die Fahrknoten; nutzt den Cache, solange Geometrie und
    /// Konfiguration unverändert sind.
    pub fn knots(&mut self, general: &GeneralConfig, speed: &SpeedConfig) -> &[Knot] {
        let revision = self.revision;
        let Self {
            knot_cache,
            controls,
            segments,
            ..
        } = self;
        let view = PathView {
            controls: &*controls,
            segments: segments.as_slice(),
        };
        knot_cache.get_or_compute(revision, general, speed, || {
            knots::calculate(&view, general, speed)
        })
    }

    /// Zuletzt berechnete Knoten, falls noch aktuell.
    pub fn cached_knots(&self) -> Option<&[Knot]> {
        self.knot_cache.get(self.revision)
    }

    /// Tiefe Kopie mit frischen IDs für Pfad, Segmente, Kontrollpunkte und Keyframes.
    pub fn with_fresh_uids(&self) -> Path {
        let mut renamed = ControlArena::new();
        let mut mapping = std::collections::HashMap::new();
        for (uid, control) in &self.controls {
            let mut control = control.clone();
            control.uid = make_uid();
            mapping.insert(uid.clone(), control.uid.clone());
            renamed.insert(control.uid.clone(), control);
        }

        let segments = self
            .segments
            .iter()
            .map(|segment| {
                let mut segment = segment.clone();
                segment.uid = make_uid();
                let controls = segment
                    .controls()
                    .iter()
                    .map(|uid| mapping.get(uid).cloned().unwrap_or_else(|| uid.clone()))
                    .collect();
                segment.set_controls(controls);
                segment.renew_keyframe_uids();
                segment
            })
            .collect();

        Path {
            uid: make_uid(),
            name: self.name.clone(),
            locked: self.locked,
            visible: self.visible,
            controls: renamed,
            segments,
            revision: 0,
            knot_cache: KnotCache::default(),
        }
    }

    /// Wendet `f` auf alle Positionen an (z.B. Einheitenumrechnung).
    pub(crate) fn map_positions(&mut self, f: impl Fn(Vector2) -> Vector2) {
        for control in self.controls.values_mut() {
            control.position = f(control.position);
        }
        self.touch();
    }

    /// Bringt deserialisierte Werte in die kanonische Form: Positionen auf
    /// drei Nachkommastellen, Richtungen in `[0, 360)`, Keyframes begrenzt
    /// und sortiert.
    pub(crate) fn normalize_values(&mut self) {
        for control in self.controls.values_mut() {
            let position = control.position;
            control.position.set_from(position);
            if let Some(heading) = control.heading() {
                control.set_heading(heading);
            }
        }
        for segment in &mut self.segments {
            segment.normalize_keyframes();
        }
        self.touch();
    }
}

/// Geteilte Lesesicht auf Arena und Segmente für die Knotenberechnung.
pub(crate) struct PathView<'a> {
    pub controls: &'a ControlArena,
    pub segments: &'a [Segment],
}
