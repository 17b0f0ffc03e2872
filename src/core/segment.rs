//! Segmente: Gerade (2 Kontrollpunkte) oder kubische Bézier-Kurve (4 Kontrollpunkte).
//!
//! Ein Segment speichert nur die IDs seiner Kontrollpunkte. Die Geometrie wird
//! über die Arena des Pfads aufgelöst (`Segment::curve`) und dann rein
//! funktional ausgewertet (`SegmentCurve`).

use super::control::{Control, ControlArena};
use super::keyframe::{self, Keyframe};
use super::knot::Knot;
use super::vector::Vector2;
use crate::shared::make_uid;
use glam::DVec2;
use serde::{Deserialize, Serialize};

/// Schrittweite der numerischen Bogenlängen-Integration.
pub const ARC_LENGTH_STEP: f64 = 0.05;
/// Obergrenze der Abtastschritte pro Segment.
pub const MAX_SAMPLES_PER_SEGMENT: usize = 100_000;

/// Gerade oder kubische Kurve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SegmentVariant {
    Linear,
    Cubic,
}

/// Ein Segment eines Pfads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub uid: String,
    /// 2 oder 4 Kontrollpunkt-IDs; erste und letzte sind Endpunkte
    controls: Vec<String>,
    /// Geschwindigkeits-Keyframes, aufsteigend nach `x_pos`
    speed_profiles: Vec<Keyframe>,
}

impl Segment {
    /// Neue Gerade zwischen zwei Endpunkten.
    pub fn line(start: &str, end: &str) -> Self {
        Self {
            uid: make_uid(),
            controls: vec![start.to_string(), end.to_string()],
            speed_profiles: Vec::new(),
        }
    }

    /// Neue kubische Kurve.
    pub fn cubic(start: &str, cp1: &str, cp2: &str, end: &str) -> Self {
        Self {
            uid: make_uid(),
            controls: vec![
                start.to_string(),
                cp1.to_string(),
                cp2.to_string(),
                end.to_string(),
            ],
            speed_profiles: Vec::new(),
        }
    }

    pub fn variant(&self) -> SegmentVariant {
        if self.controls.len() == 4 {
            SegmentVariant::Cubic
        } else {
            SegmentVariant::Linear
        }
    }

    /// Alle Kontrollpunkt-IDs in Reihenfolge.
    pub fn controls(&self) -> &[String] {
        &self.controls
    }

    pub fn first(&self) -> &str {
        &self.controls[0]
    }

    pub fn last(&self) -> &str {
        &self.controls[self.controls.len() - 1]
    }

    /// Innere Stützpunkte (leer bei Geraden).
    pub fn interior(&self) -> &[String] {
        &self.controls[1..self.controls.len() - 1]
    }

    pub fn contains_control(&self, uid: &str) -> bool {
        self.controls.iter().any(|c| c == uid)
    }

    /// Ersetzt den Endpunkt (Umhängen beim Zusammenführen zweier Segmente).
    pub(crate) fn set_last(&mut self, uid: &str) {
        let last = self.controls.len() - 1;
        self.controls[last] = uid.to_string();
    }

    pub(crate) fn set_controls(&mut self, controls: Vec<String>) {
        self.controls = controls;
    }

    pub fn keyframes(&self) -> &[Keyframe] {
        &self.speed_profiles
    }

    pub fn keyframe(&self, uid: &str) -> Option<&Keyframe> {
        self.speed_profiles.iter().find(|k| k.uid == uid)
    }

    /// Fügt einen Keyframe sortiert ein und liefert seinen Index.
    pub(crate) fn insert_keyframe(&mut self, keyframe: Keyframe) -> usize {
        keyframe::insert_sorted(&mut self.speed_profiles, keyframe)
    }

    /// Entnimmt einen Keyframe samt seinem bisherigen Index.
    pub(crate) fn take_keyframe(&mut self, uid: &str) -> Option<(usize, Keyframe)> {
        let index = self.speed_profiles.iter().position(|k| k.uid == uid)?;
        Some((index, self.speed_profiles.remove(index)))
    }

    /// Setzt einen entnommenen Keyframe an seinen alten Index zurück.
    pub(crate) fn restore_keyframe(&mut self, index: usize, keyframe: Keyframe) {
        let index = index.min(self.speed_profiles.len());
        self.speed_profiles.insert(index, keyframe);
    }

    /// Begrenzt alle Keyframes auf `[0, 1]` und sortiert sie stabil nach `x_pos`.
    pub(crate) fn normalize_keyframes(&mut self) {
        for keyframe in &mut self.speed_profiles {
            let (x, y) = (keyframe.x_pos, keyframe.y_pos);
            keyframe.set_position(x, y);
        }
        self.speed_profiles
            .sort_by(|a, b| a.x_pos.total_cmp(&b.x_pos));
    }

    /// Vergibt allen Keyframes neue IDs (Einfügen als neue Entitäten).
    pub(crate) fn renew_keyframe_uids(&mut self) {
        for keyframe in &mut self.speed_profiles {
            keyframe.uid = make_uid();
        }
    }

    /// Löst die Geometrie über die Arena auf.
    ///
    /// `None`, wenn eine ID fehlt oder die Struktur ungültig ist.
    pub fn curve(&self, arena: &ControlArena) -> Option<SegmentCurve> {
        let resolve = |uid: &String| arena.get(uid);
        let first = resolve(&self.controls[0])?;
        let last = resolve(&self.controls[self.controls.len() - 1])?;
        let points = match self.controls.as_slice() {
            [_, _] => CurvePoints::Linear([first.position, last.position]),
            [_, cp1, cp2, _] => CurvePoints::Cubic([
                first.position,
                resolve(cp1)?.position,
                resolve(cp2)?.position,
                last.position,
            ]),
            _ => return None,
        };
        Some(SegmentCurve {
            points,
            start_heading: first.heading()?,
            end_heading: last.heading()?,
        })
    }

    /// Wandelt eine Gerade in eine kubische Kurve.
    ///
    /// Der erste Stützpunkt spiegelt den vorletzten Punkt des Vorgängers am
    /// gemeinsamen Startpunkt, der zweite den zweiten Punkt des Nachfolgers am
    /// gemeinsamen Endpunkt. Am Pfadrand wird die Sehne gedrittelt.
    /// Liefert das umgebaute Segment (gleiche ID) und die neuen Stützpunkte.
    pub fn to_curve(
        &self,
        arena: &ControlArena,
        previous: Option<&Segment>,
        next: Option<&Segment>,
    ) -> Option<(Segment, Vec<Control>)> {
        if self.variant() != SegmentVariant::Linear {
            return None;
        }
        let start = arena.get(self.first())?.position;
        let end = arena.get(self.last())?.position;

        let cp1 = match previous {
            Some(prev) => {
                let before = &prev.controls[prev.controls.len() - 2];
                arena.get(before)?.position.mirror(start)
            }
            None => start.lerp(end, 1.0 / 3.0),
        };
        let cp2 = match next {
            Some(next) => arena.get(&next.controls[1])?.position.mirror(end),
            None => start.lerp(end, 2.0 / 3.0),
        };

        let cp1 = Control::waypoint(cp1);
        let cp2 = Control::waypoint(cp2);
        let mut curve = self.clone();
        curve.controls = vec![
            self.first().to_string(),
            cp1.uid.clone(),
            cp2.uid.clone(),
            self.last().to_string(),
        ];
        Some((curve, vec![cp1, cp2]))
    }

    /// Wandelt eine Kurve in eine Gerade; die inneren Stützpunkte entfallen.
    pub fn to_line(&self) -> Option<Segment> {
        if self.variant() != SegmentVariant::Cubic {
            return None;
        }
        let mut line = self.clone();
        line.controls = vec![self.first().to_string(), self.last().to_string()];
        Some(line)
    }

    /// Teilt das Segment an einem eingefügten Punkt.
    ///
    /// Geraden werden linear unterteilt, Kurven per De-Casteljau-Mittelung.
    /// Beide Hälften sind neue Segmente und teilen sich den eingefügten Endpunkt.
    pub fn split(&self, arena: &ControlArena, point: Vector2) -> Option<SegmentSplit> {
        let injected = Control::end(point, 0.0);
        let start = arena.get(self.first())?.position;
        let end = arena.get(self.last())?.position;

        let (mut first, mut second, mut new_controls, ratio) = match self.variant() {
            SegmentVariant::Linear => {
                let before = start.distance(point);
                let total = before + point.distance(end);
                let ratio = if total > 0.0 { before / total } else { 0.5 };
                (
                    Segment::line(self.first(), &injected.uid),
                    Segment::line(&injected.uid, self.last()),
                    Vec::new(),
                    ratio,
                )
            }
            SegmentVariant::Cubic => {
                let p1 = arena.get(&self.controls[1])?.position;
                let p2 = arena.get(&self.controls[2])?.position;
                let m01 = start.midpoint(p1);
                let m12 = p1.midpoint(p2);
                let m23 = p2.midpoint(end);
                let m012 = m01.midpoint(m12);
                let m123 = m12.midpoint(m23);

                let controls: Vec<Control> = [m01, m012, m123, m23]
                    .into_iter()
                    .map(Control::waypoint)
                    .collect();
                (
                    Segment::cubic(self.first(), &controls[0].uid, &controls[1].uid, &injected.uid),
                    Segment::cubic(&injected.uid, &controls[2].uid, &controls[3].uid, self.last()),
                    controls,
                    0.5,
                )
            }
        };

        for kf in &self.speed_profiles {
            let mut kf = kf.clone();
            if kf.x_pos < ratio {
                kf.x_pos = if ratio > 0.0 { kf.x_pos / ratio } else { 0.0 };
                first.insert_keyframe(kf);
            } else {
                kf.x_pos = if ratio < 1.0 {
                    (kf.x_pos - ratio) / (1.0 - ratio)
                } else {
                    0.0
                };
                second.insert_keyframe(kf);
            }
        }

        new_controls.insert(0, injected);
        Some(SegmentSplit {
            first,
            second,
            new_controls,
        })
    }
}

/// Ergebnis von `Segment::split`.
#[derive(Debug, Clone)]
pub struct SegmentSplit {
    pub first: Segment,
    pub second: Segment,
    /// Eingefügter Endpunkt (Index 0) und ggf. neue Stützpunkte
    pub new_controls: Vec<Control>,
}

/// Aufgelöste Kontrollpunkt-Positionen eines Segments.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CurvePoints {
    Linear([Vector2; 2]),
    Cubic([Vector2; 4]),
}

impl CurvePoints {
    pub fn as_slice(&self) -> &[Vector2] {
        match self {
            CurvePoints::Linear(points) => points,
            CurvePoints::Cubic(points) => points,
        }
    }
}

/// Reine Geometrie eines Segments inkl. Richtungen an beiden Enden.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentCurve {
    pub points: CurvePoints,
    pub start_heading: f64,
    pub end_heading: f64,
}

/// Binomialkoeffizient per iterativem Produkt/Quotient.
fn binomial(n: usize, k: usize) -> f64 {
    let mut result = 1.0;
    for i in 1..=k {
        result = result * (n + 1 - i) as f64 / i as f64;
    }
    result
}

impl SegmentCurve {
    pub fn start(&self) -> Vector2 {
        self.points.as_slice()[0]
    }

    pub fn end(&self) -> Vector2 {
        let points = self.points.as_slice();
        points[points.len() - 1]
    }

    /// Bernstein-Auswertung bei `t ∈ [0, 1]`.
    pub fn evaluate_at(&self, t: f64) -> Vector2 {
        let points = self.points.as_slice();
        let n = points.len() - 1;
        let mut acc = DVec2::ZERO;
        for (i, point) in points.iter().enumerate() {
            let weight = binomial(n, i) * (1.0 - t).powi((n - i) as i32) * t.powi(i as i32);
            acc += DVec2::from(*point) * weight;
        }
        acc.into()
    }

    /// Bogenlänge über Sehnen mit fester Schrittweite `ARC_LENGTH_STEP`.
    pub fn total_arc_length(&self) -> f64 {
        let steps = (1.0 / ARC_LENGTH_STEP).round() as usize;
        let mut length = 0.0;
        let mut prev = self.evaluate_at(0.0);
        for i in 1..=steps {
            let p = self.evaluate_at(i as f64 / steps as f64);
            length += prev.distance(p);
            prev = p;
        }
        length
    }

    /// Lazy, neu startbare Knotenfolge mit mittlerem Abstand `target_interval`.
    ///
    /// Der letzte Knoten liegt immer exakt auf dem End-Kontrollpunkt.
    pub fn resample(&self, target_interval: f64, starting_integral: f64) -> SegmentKnots<'_> {
        let length = self.total_arc_length();
        let steps = if target_interval.is_finite() && target_interval > 0.0 && length > 0.0 {
            (length / target_interval).ceil().min(MAX_SAMPLES_PER_SEGMENT as f64) as usize
        } else {
            1
        };
        SegmentKnots {
            curve: self,
            steps: steps.max(1),
            index: 0,
            previous: None,
            integral: starting_integral,
        }
    }
}

/// Iterator über die Knoten eines Segments. `Clone` startet die Folge neu.
#[derive(Debug, Clone)]
pub struct SegmentKnots<'a> {
    curve: &'a SegmentCurve,
    steps: usize,
    index: usize,
    previous: Option<Vector2>,
    integral: f64,
}

impl Iterator for SegmentKnots<'_> {
    type Item = Knot;

    fn next(&mut self) -> Option<Knot> {
        if self.index > self.steps {
            return None;
        }
        let (position, heading) = if self.index == self.steps {
            (self.curve.end(), Some(self.curve.end_heading))
        } else if self.index == 0 {
            (self.curve.start(), Some(self.curve.start_heading))
        } else {
            let t = self.index as f64 / self.steps as f64;
            (self.curve.evaluate_at(t), None)
        };
        let delta = self.previous.map_or(0.0, |p| p.distance(position));
        self.integral += delta;
        self.previous = Some(position);
        self.index += 1;
        Some(Knot::new(position, delta, self.integral, heading))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.steps + 1).saturating_sub(self.index);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for SegmentKnots<'_> {}
