//! Zweistufiges Resampling eines Pfads in Fahrknoten.
//!
//! Stufe 1 tastet jedes Segment fein ab und formt die Geschwindigkeit,
//! Stufe 2 verteilt die Knoten gleichmäßig im Abstand `knot_spacing`.

use super::PathView;
use crate::core::keyframe;
use crate::core::knot::Knot;
use crate::core::speed::SpeedProfile;
use crate::core::vector::Vector2;
use crate::shared::{GeneralConfig, SpeedConfig};

/// Unterhalb dieser Länge gilt ein Pfad als punktförmig.
const MIN_PATH_LENGTH: f64 = 1e-9;
/// Zielpunkte näher als dieser Anteil des Abstands am Pfadende entfallen.
const END_TOLERANCE: f64 = 0.01;
/// Feine Knoten innerhalb dieses Anteils des Abstands gelten als erreicht.
const REACH_TOLERANCE: f64 = 1e-6;

pub(crate) fn calculate(view: &PathView, general: &GeneralConfig, speed: &SpeedConfig) -> Vec<Knot> {
    let mut fine = fine_knots(view, general);
    if fine.len() < 2 {
        for knot in &mut fine {
            knot.speed = 0.0;
        }
        return fine;
    }

    let total = fine[fine.len() - 1].integral - fine[0].integral;
    let profile = SpeedProfile::new(speed, total);
    for knot in &mut fine {
        // Knoten trägt bis hier nur den normierten Keyframe-Wert
        knot.speed = profile.shape(knot, profile.keyframe_speed(knot.speed));
    }

    even_knots(view, &fine, general.knot_spacing(), total)
}

/// Stufe 1: feines Abtasten aller Segmente ohne doppelte Grenzknoten.
///
/// `speed` enthält danach den normierten Keyframe-Wert des Knotens.
pub(crate) fn fine_knots(view: &PathView, general: &GeneralConfig) -> Vec<Knot> {
    let interval = general.sample_interval();
    let mut knots: Vec<Knot> = Vec::new();
    let mut keyframe_y = 1.0;

    for (index, segment) in view.segments.iter().enumerate() {
        let Some(curve) = segment.curve(view.controls) else {
            log::debug!("Segment {} nicht auflösbar, übersprungen", segment.uid);
            continue;
        };
        let start_integral = knots.last().map_or(0.0, |k| k.integral);
        let mut sampled: Vec<Knot> = curve.resample(interval, start_integral).collect();
        let length = sampled[sampled.len() - 1].integral - start_integral;

        for knot in &mut sampled {
            let x = if length > 0.0 {
                (knot.integral - start_integral) / length
            } else {
                0.0
            };
            if let Some(active) = keyframe::active_at(segment.keyframes(), x) {
                keyframe_y = active.y_pos;
            }
            knot.speed = keyframe_y;
        }

        let skip = usize::from(index > 0 && !knots.is_empty());
        knots.extend(sampled.into_iter().skip(skip));
    }
    knots
}

/// Stufe 2: gleichmäßige Verteilung mit festen Endknoten.
fn even_knots(view: &PathView, fine: &[Knot], spacing: f64, total: f64) -> Vec<Knot> {
    let first_control = view
        .segments
        .first()
        .and_then(|s| view.controls.get(s.first()));
    let last_control = view
        .segments
        .last()
        .and_then(|s| view.controls.get(s.last()));
    let (Some(first_control), Some(last_control)) = (first_control, last_control) else {
        return fine.to_vec();
    };

    let mut first = Knot::new(first_control.position, 0.0, 0.0, first_control.heading());
    first.speed = fine[0].speed;
    let mut knots = vec![first];

    if total >= MIN_PATH_LENGTH && spacing.is_finite() && spacing > 0.0 {
        let step = 1.0 / (total / spacing);
        let mut bracket = 0;
        let mut heading = None;
        let mut k = 1usize;
        loop {
            let target = k as f64 * step * total;
            if total - target < spacing * END_TOLERANCE {
                break;
            }
            // Ein genau getroffener Grenzknoten gibt seine Richtung an diesen Knoten
            let reach = target + spacing * REACH_TOLERANCE;
            while bracket + 2 < fine.len() && fine[bracket + 1].integral <= reach {
                bracket += 1;
                if fine[bracket].heading.is_some() {
                    heading = fine[bracket].heading;
                }
            }

            let a = &fine[bracket];
            let b = &fine[bracket + 1];
            let span = b.integral - a.integral;
            let ratio = if span > 0.0 {
                ((target - a.integral) / span).clamp(0.0, 1.0)
            } else {
                0.0
            };
            let position = Vector2::new(a.x + (b.x - a.x) * ratio, a.y + (b.y - a.y) * ratio);
            let delta = knots[knots.len() - 1].position().distance(position);
            let mut knot = Knot::new(position, delta, target, heading.take());
            knot.speed = a.speed + (b.speed - a.speed) * ratio;
            knots.push(knot);
            k += 1;
        }
    }

    let delta = knots[knots.len() - 1]
        .position()
        .distance(last_control.position);
    knots.push(Knot::new(
        last_control.position,
        delta,
        total,
        last_control.heading(),
    ));
    knots
}
