//! The mutable sticker grid and the color-balance check that gates a
//! solve request.

use std::ops::Index;

use itertools::Itertools;

use crate::{Color, Face};

/// The full sticker assignment of a cube: nine stickers per face in
/// row-major order, faces in canonical order.
///
/// Position 4 of each face is the fixed center. Partially edited states
/// may be unbalanced; only a solve request requires balance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CubeState([[Color; 9]; 6]);

impl Default for CubeState {
    /// The solved configuration: every face uniformly its home color.
    fn default() -> Self {
        CubeState(Face::ALL.map(|face| [face.home_color(); 9]))
    }
}

impl Index<Face> for CubeState {
    type Output = [Color; 9];

    fn index(&self, index: Face) -> &Self::Output {
        &self.0[index as usize]
    }
}

impl CubeState {
    pub(crate) fn from_faces(faces: [[Color; 9]; 6]) -> Self {
        CubeState(faces)
    }

    /// Replace the color at one position.
    ///
    /// No validation happens here; the user is allowed to pass through
    /// arbitrarily unbalanced states while editing.
    pub fn set_sticker(&mut self, face: Face, index: usize, color: Color) {
        self.0[face as usize][index] = color;
    }

    pub fn sticker(&self, face: Face, index: usize) -> Color {
        self.0[face as usize][index]
    }

    /// All 54 stickers in canonical face order.
    pub fn stickers(&self) -> impl Iterator<Item = Color> + '_ {
        self.0.iter().flatten().copied()
    }

    /// Structural equality against the canonical solved assignment.
    pub fn is_solved(&self) -> bool {
        *self == CubeState::default()
    }

    /// Occurrence count of every color, indexed like [`Color::ALL`].
    pub fn color_counts(&self) -> [usize; 6] {
        let counts = self.stickers().counts();
        Color::ALL.map(|color| counts.get(&color).copied().unwrap_or(0))
    }

    /// A configuration can exist on a physical cube only if each color
    /// is used exactly nine times. Reachability from the solved state is
    /// not checked here; the solver rejects unreachable configurations
    /// itself.
    pub fn is_balanced(&self) -> bool {
        self.color_counts() == [9; 6]
    }
}
