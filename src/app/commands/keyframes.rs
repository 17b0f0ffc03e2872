//! Keyframe-Commands. Keyframes bleiben je Segment nach `x_pos` sortiert.

use super::EditCommand;
use crate::core::{Document, Keyframe};

/// Fügt einem Segment einen Keyframe hinzu.
#[derive(Debug, Clone)]
pub struct AddKeyframe {
    path: String,
    segment: String,
    keyframe: Keyframe,
}

impl AddKeyframe {
    pub fn new(path: &str, segment: &str, keyframe: Keyframe) -> Self {
        Self {
            path: path.to_string(),
            segment: segment.to_string(),
            keyframe,
        }
    }

    pub fn keyframe_uid(&self) -> &str {
        &self.keyframe.uid
    }

    fn insert(&self, doc: &mut Document) -> bool {
        match doc
            .path_mut(&self.path)
            .and_then(|p| p.segment_mut(&self.segment))
        {
            Some(segment) => {
                segment.insert_keyframe(self.keyframe.clone());
                true
            }
            None => false,
        }
    }
}

impl EditCommand for AddKeyframe {
    fn execute(&mut self, doc: &mut Document) -> bool {
        self.insert(doc)
    }

    fn undo(&mut self, doc: &mut Document) {
        if let Some(segment) = doc
            .path_mut(&self.path)
            .and_then(|p| p.segment_mut(&self.segment))
        {
            segment.take_keyframe(&self.keyframe.uid);
        }
    }

    fn redo(&mut self, doc: &mut Document) {
        self.insert(doc);
    }
}

/// Lage eines Keyframes: Segment, Index in dessen Liste und Position.
#[derive(Debug, Clone, PartialEq)]
struct Placement {
    segment: String,
    index: usize,
    x_pos: f64,
    y_pos: f64,
}

/// Verschiebt einen Keyframe, auch in ein anderes Segment desselben Pfads.
#[derive(Debug, Clone)]
pub struct MoveKeyframe {
    path: String,
    keyframe: String,
    segment: String,
    x_pos: f64,
    y_pos: f64,
    origin: Option<Placement>,
}

impl MoveKeyframe {
    pub fn new(path: &str, keyframe: &str, segment: &str, x_pos: f64, y_pos: f64) -> Self {
        Self {
            path: path.to_string(),
            keyframe: keyframe.to_string(),
            segment: segment.to_string(),
            x_pos,
            y_pos,
            origin: None,
        }
    }

    /// Entnimmt den Keyframe und fügt ihn sortiert ins Zielsegment ein.
    fn relocate(&self, doc: &mut Document) -> Option<Placement> {
        let path = doc.path_mut(&self.path)?;
        path.segment(&self.segment)?;
        let source = path.segment_of_keyframe(&self.keyframe)?.uid.clone();

        let (index, mut keyframe) = path.segment_mut(&source)?.take_keyframe(&self.keyframe)?;
        let origin = Placement {
            segment: source,
            index,
            x_pos: keyframe.x_pos,
            y_pos: keyframe.y_pos,
        };
        keyframe.set_position(self.x_pos, self.y_pos);
        path.segment_mut(&self.segment)?.insert_keyframe(keyframe);
        Some(origin)
    }
}

impl EditCommand for MoveKeyframe {
    fn execute(&mut self, doc: &mut Document) -> bool {
        self.origin = self.relocate(doc);
        self.origin.is_some()
    }

    fn undo(&mut self, doc: &mut Document) {
        let Some(origin) = &self.origin else {
            return;
        };
        let Some(path) = doc.path_mut(&self.path) else {
            return;
        };
        let Some((_, mut keyframe)) = path
            .segment_mut(&self.segment)
            .and_then(|s| s.take_keyframe(&self.keyframe))
        else {
            return;
        };
        keyframe.x_pos = origin.x_pos;
        keyframe.y_pos = origin.y_pos;
        if let Some(segment) = path.segment_mut(&origin.segment) {
            segment.restore_keyframe(origin.index, keyframe);
        }
    }

    fn redo(&mut self, doc: &mut Document) {
        self.relocate(doc);
    }

    /// Gleicher Keyframe: Ursprung bleibt, Ziel wird übernommen.
    fn merge(&mut self, newer: &Self) -> bool {
        if self.path != newer.path || self.keyframe != newer.keyframe {
            return false;
        }
        self.segment.clone_from(&newer.segment);
        self.x_pos = newer.x_pos;
        self.y_pos = newer.y_pos;
        true
    }
}

/// Entfernt einen Keyframe.
#[derive(Debug, Clone)]
pub struct RemoveKeyframe {
    path: String,
    keyframe: String,
    removed: Option<(String, usize, Keyframe)>,
}

impl RemoveKeyframe {
    pub fn new(path: &str, keyframe: &str) -> Self {
        Self {
            path: path.to_string(),
            keyframe: keyframe.to_string(),
            removed: None,
        }
    }
}

impl EditCommand for RemoveKeyframe {
    fn execute(&mut self, doc: &mut Document) -> bool {
        let Some(path) = doc.path_mut(&self.path) else {
            return false;
        };
        let Some(segment) = path.segment_of_keyframe(&self.keyframe).map(|s| s.uid.clone()) else {
            return false;
        };
        self.removed = path
            .segment_mut(&segment)
            .and_then(|s| s.take_keyframe(&self.keyframe))
            .map(|(index, keyframe)| (segment, index, keyframe));
        self.removed.is_some()
    }

    fn undo(&mut self, doc: &mut Document) {
        if let Some((segment, index, keyframe)) = &self.removed {
            if let Some(s) = doc
                .path_mut(&self.path)
                .and_then(|p| p.segment_mut(segment))
            {
                s.restore_keyframe(*index, keyframe.clone());
            }
        }
    }

    fn redo(&mut self, doc: &mut Document) {
        if let Some((segment, _, _)) = &self.removed {
            if let Some(s) = doc
                .path_mut(&self.path)
                .and_then(|p| p.segment_mut(segment))
            {
                s.take_keyframe(&self.keyframe);
            }
        }
    }
}
