//! Editor modes

use std::fmt;

/// The four interaction modes of the sketch editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EditorMode {
    /// Click points on the ground; right click closes the polygon.
    #[default]
    Draw,
    /// Drag extruded solids across the ground.
    Move,
    /// Entered once all shapes have been extruded.
    ExtrudeShape,
    /// Drag the vertex handles of extruded solids.
    EditVertex,
}

impl EditorMode {
    /// Internal identifier, camelCase.
    pub fn id(self) -> &'static str {
        match self {
            EditorMode::Draw => "draw",
            EditorMode::Move => "move",
            EditorMode::ExtrudeShape => "extrudeShape",
            EditorMode::EditVertex => "editVertex",
        }
    }

    /// Whether pointer presses in this mode grab existing solids.
    pub fn grabs_solids(self) -> bool {
        matches!(self, EditorMode::Move | EditorMode::EditVertex)
    }
}

impl fmt::Display for EditorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}
