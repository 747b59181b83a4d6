//! Conversion between [`CubeState`] and the 54-character facelet string
//! consumed and produced by the external solver.

use std::{collections::HashMap, sync::LazyLock};

use crate::{Color, CubeState, Face};

/// The facelet string of the solved cube.
pub const SOLVED_FACELETS: &str = "UUUUUUUUURRRRRRRRRFFFFFFFFFDDDDDDDDDLLLLLLLLLBBBBBBBBB";

static COLOR_TO_LETTER: LazyLock<HashMap<Color, char>> = LazyLock::new(|| {
    Color::ALL
        .iter()
        .map(|&color| (color, color.home_face().letter()))
        .collect()
});

// Derived from the forward table so the two can never disagree.
static LETTER_TO_COLOR: LazyLock<HashMap<char, Color>> = LazyLock::new(|| {
    let inverse: HashMap<char, Color> = COLOR_TO_LETTER
        .iter()
        .map(|(&color, &letter)| (letter, color))
        .collect();
    assert_eq!(inverse.len(), Color::ALL.len());
    inverse
});

/// Serialize a cube surface: nine letters per face, faces in canonical
/// U, R, F, D, L, B order. Total and deterministic.
pub fn to_facelets(state: &CubeState) -> String {
    let mut out = String::with_capacity(54);
    for face in Face::ALL {
        for &color in &state[face] {
            out.push(COLOR_TO_LETTER[&color]);
        }
    }
    out
}

/// Parse a facelet string back into a [`CubeState`].
///
/// The string usually comes from the external randomizer, which is not
/// fully trusted: unrecognized letters become White and each face is
/// padded or truncated to exactly nine stickers, so the result is
/// well-formed no matter how malformed the input. This normalization is
/// policy, not an accident; see the tests below.
pub fn from_facelets(facelets: &str) -> CubeState {
    let colors = facelets
        .chars()
        .map(|letter| {
            LETTER_TO_COLOR
                .get(&letter)
                .copied()
                .unwrap_or(Color::White)
        })
        .collect::<Vec<_>>();

    let mut faces = [[Color::White; 9]; 6];
    for (i, face) in faces.iter_mut().enumerate() {
        let start = (i * 9).min(colors.len());
        let end = ((i + 1) * 9).min(colors.len());
        *face = normalize_face(&colors[start..end]);
    }
    CubeState::from_faces(faces)
}

/// Pad or truncate a loose sticker sequence to exactly nine entries,
/// defaulting missing stickers to White. The only way loose data becomes
/// a face.
pub fn normalize_face(stickers: &[Color]) -> [Color; 9] {
    let mut face = [Color::White; 9];
    for (slot, &color) in face.iter_mut().zip(stickers) {
        *slot = color;
    }
    face
}

#[cfg(test)]
mod tests {
    use super::*;

    // A real scramble, as the randomizer would emit it.
    const SCRAMBLED: &str = "FLLLULFRFRUURRRBBBLDDFFUBRUDFRDDUFLDUFUFLDLBRBDRBBULBD";

    #[test]
    fn test_solved_state_serializes_to_solved_facelets() {
        assert_eq!(to_facelets(&CubeState::default()), SOLVED_FACELETS);
    }

    #[test]
    fn test_round_trip() {
        let solved = CubeState::default();
        assert_eq!(from_facelets(&to_facelets(&solved)), solved);

        let scrambled = from_facelets(SCRAMBLED);
        assert!(scrambled.is_balanced());
        assert_eq!(to_facelets(&scrambled), SCRAMBLED);
    }

    #[test]
    fn test_tables_are_exact_inverses() {
        for color in Color::ALL {
            let letter = COLOR_TO_LETTER[&color];
            assert_eq!(LETTER_TO_COLOR[&letter], color);
        }
    }

    #[test]
    fn test_unknown_letters_default_to_white() {
        let state = from_facelets(&"X".repeat(54));
        assert_eq!(to_facelets(&state), "U".repeat(54));
    }

    #[test]
    fn test_short_input_is_padded() {
        // Only the first face present; everything else defaults
        let state = from_facelets("RRRRRRRRR");
        assert_eq!(state[Face::U], [Color::Red; 9]);
        for face in [Face::R, Face::F, Face::D, Face::L, Face::B] {
            assert_eq!(state[face], [Color::White; 9]);
        }
    }

    #[test]
    fn test_long_input_is_truncated() {
        let mut long = SCRAMBLED.to_owned();
        long.push_str("DDDDDD");
        assert_eq!(from_facelets(&long), from_facelets(SCRAMBLED));
    }

    #[test]
    fn test_normalize_face() {
        assert_eq!(normalize_face(&[]), [Color::White; 9]);
        assert_eq!(
            normalize_face(&[Color::Blue; 3]),
            [
                Color::Blue,
                Color::Blue,
                Color::Blue,
                Color::White,
                Color::White,
                Color::White,
                Color::White,
                Color::White,
                Color::White,
            ]
        );
        assert_eq!(normalize_face(&[Color::Green; 12]), [Color::Green; 9]);
    }
}
