//! Symbol table: ordinary faces, reserved forced-outcome faces and the picker

use std::fmt;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::position::ReelPosition;

/// Texture atlas columns (faces are cut from a 3 × 4 sheet)
pub const ATLAS_COLUMNS: u8 = 3;
/// Texture atlas rows
pub const ATLAS_ROWS: u8 = 4;

/// Cell of the reel texture atlas holding one face
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AtlasCell {
    pub column: u8,
    pub row: u8,
}

impl AtlasCell {
    pub const fn new(column: u8, row: u8) -> Self {
        Self { column, row }
    }

    /// UV rectangle `[u0, v0, u1, v1]` of this cell
    pub fn uv(&self) -> [f32; 4] {
        let du = 1.0 / ATLAS_COLUMNS as f32;
        let dv = 1.0 / ATLAS_ROWS as f32;
        [
            self.column as f32 * du,
            self.row as f32 * dv,
            (self.column + 1) as f32 * du,
            (self.row + 1) as f32 * dv,
        ]
    }
}

/// A displayable reel face
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Symbol {
    Gold,
    Cherry,
    Bell,
    Melon,
    Grape,
    Seven,
    Plum,
    Orange,
    /// "W": forced face of the left reel
    WinLeft,
    /// "I": forced face of the middle reel
    WinMiddle,
    /// "N": forced face of the right reel
    WinRight,
}

/// Faces the random picker draws from
pub const ORDINARY_SYMBOLS: [Symbol; 8] = [
    Symbol::Gold,
    Symbol::Grape,
    Symbol::Cherry,
    Symbol::Seven,
    Symbol::Bell,
    Symbol::Plum,
    Symbol::Melon,
    Symbol::Orange,
];

/// Faces only the outcome logic may plant
pub const FORCED_SYMBOLS: [Symbol; 3] = [Symbol::WinLeft, Symbol::WinMiddle, Symbol::WinRight];

impl Symbol {
    /// Atlas cell this face is cut from
    pub fn atlas_cell(&self) -> AtlasCell {
        match self {
            Self::Gold => AtlasCell::new(0, 0),
            Self::Cherry => AtlasCell::new(0, 1),
            Self::Bell => AtlasCell::new(0, 2),
            Self::Melon => AtlasCell::new(0, 3),
            Self::Grape => AtlasCell::new(1, 0),
            Self::Seven => AtlasCell::new(1, 1),
            Self::Plum => AtlasCell::new(1, 2),
            Self::Orange => AtlasCell::new(1, 3),
            Self::WinLeft => AtlasCell::new(2, 3),
            Self::WinMiddle => AtlasCell::new(2, 2),
            Self::WinRight => AtlasCell::new(2, 1),
        }
    }

    /// UV rectangle for the renderer
    pub fn uv(&self) -> [f32; 4] {
        self.atlas_cell().uv()
    }

    /// Is this one of the reserved forced-outcome faces?
    pub fn is_forced(&self) -> bool {
        matches!(self, Self::WinLeft | Self::WinMiddle | Self::WinRight)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Gold => "gold",
            Self::Cherry => "cherry",
            Self::Bell => "bell",
            Self::Melon => "melon",
            Self::Grape => "grape",
            Self::Seven => "seven",
            Self::Plum => "plum",
            Self::Orange => "orange",
            Self::WinLeft => "W",
            Self::WinMiddle => "I",
            Self::WinRight => "N",
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Uniform pick among the ordinary faces
pub fn pick_random_ordinary_symbol<R: Rng + ?Sized>(rng: &mut R) -> Symbol {
    ORDINARY_SYMBOLS[rng.random_range(0..ORDINARY_SYMBOLS.len())]
}

/// Forced face reserved for a reel position
pub fn forced_face_for(position: ReelPosition) -> Option<Symbol> {
    match position {
        ReelPosition::Left => Some(Symbol::WinLeft),
        ReelPosition::Middle => Some(Symbol::WinMiddle),
        ReelPosition::Right => Some(Symbol::WinRight),
        ReelPosition::Unassigned => None,
    }
}

/// Owned random source for one reel's blurred faces
#[derive(Debug, Clone)]
pub struct SymbolPicker {
    rng: StdRng,
}

impl SymbolPicker {
    /// Picker seeded from the OS
    pub fn from_os_rng() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Reproducible picker
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn pick(&mut self) -> Symbol {
        pick_random_ordinary_symbol(&mut self.rng)
    }
}

impl Default for SymbolPicker {
    fn default() -> Self {
        Self::from_os_rng()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_forced_and_ordinary_are_disjoint() {
        for symbol in ORDINARY_SYMBOLS {
            assert!(!symbol.is_forced());
            assert!(!FORCED_SYMBOLS.contains(&symbol));
        }
        for symbol in FORCED_SYMBOLS {
            assert!(symbol.is_forced());
        }
    }

    #[test]
    fn test_picker_never_returns_forced_face() {
        let mut picker = SymbolPicker::seeded(7);
        let mut seen = HashSet::new();
        for _ in 0..2000 {
            let symbol = picker.pick();
            assert!(!symbol.is_forced());
            seen.insert(symbol);
        }
        // Uniform over 8 faces: 2000 draws hit all of them
        assert_eq!(seen.len(), ORDINARY_SYMBOLS.len());
    }

    #[test]
    fn test_forced_face_lookup() {
        assert_eq!(forced_face_for(ReelPosition::Left), Some(Symbol::WinLeft));
        assert_eq!(forced_face_for(ReelPosition::Middle), Some(Symbol::WinMiddle));
        assert_eq!(forced_face_for(ReelPosition::Right), Some(Symbol::WinRight));
        assert_eq!(forced_face_for(ReelPosition::Unassigned), None);
    }

    #[test]
    fn test_atlas_cells_are_unique() {
        let cells: HashSet<_> = ORDINARY_SYMBOLS
            .iter()
            .chain(FORCED_SYMBOLS.iter())
            .map(|s| s.atlas_cell())
            .collect();
        assert_eq!(cells.len(), 11);
    }

    #[test]
    fn test_uv_rect() {
        let uv = Symbol::Seven.uv();
        assert!((uv[0] - 1.0 / 3.0).abs() < 1e-6);
        assert!((uv[1] - 0.25).abs() < 1e-6);
        assert!((uv[2] - 2.0 / 3.0).abs() < 1e-6);
        assert!((uv[3] - 0.5).abs() < 1e-6);
    }
}
