//! Core-Domänentypen: Vektoren, Kontrollpunkte, Segmente, Pfade, Knoten.
//!
//! Alles hier ist frei von UI und History; Mutationen erfolgen ausschließlich
//! über die Commands in `app`.

pub mod control;
pub mod document;
pub mod keyframe;
pub mod knot;
pub mod path;
pub mod segment;
pub mod speed;
pub mod vector;

pub use control::{Control, ControlArena, ControlKind};
pub use document::Document;
pub use keyframe::Keyframe;
pub use knot::{Knot, KnotCache};
pub use path::{Path, SegmentSplice};
pub use segment::{CurvePoints, Segment, SegmentCurve, SegmentKnots, SegmentSplit, SegmentVariant};
pub use speed::SpeedProfile;
pub use vector::{normalize_heading, round3, Vector2};
