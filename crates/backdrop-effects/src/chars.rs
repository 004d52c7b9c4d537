//! Glyph sets and label text used by the effects.

/// Default glyphs for data rain.
pub const DATA_RAIN_CHARS: &[char] = &['0', '1', 'あ', 'ｑ', 'Æ', 'Ψ'];

/// Glyphs for the binary matrix.
pub const BINARY_CHARS: &[char] = &['0', '1'];

/// Labels that fade in over the constellation field.
pub const CONSTELLATION_NAMES: &[&str] = &["Orion", "Lyra", "Cygnus", "Draco", "Cassiopeia", "Andromeda"];
