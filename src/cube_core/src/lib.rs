//! The in-memory model of a 3x3 cube: faces, sticker colors, the full
//! sticker grid, and the facelet-string serialization the solver speaks.

use std::str::FromStr;

pub mod facelets;
pub mod state;

pub use state::CubeState;

/// One of the six cube faces.
///
/// The declaration order U, R, F, D, L, B is the canonical serialization
/// order and must never vary.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Face {
    U,
    R,
    F,
    D,
    L,
    B,
}

impl Face {
    pub const ALL: [Self; 6] = {
        use Face::*;
        let v = [U, R, F, D, L, B];

        let mut i = 0;
        while i < v.len() {
            assert!(i == v[i] as usize);
            i += 1;
        }

        v
    };

    /// The facelet letter identifying this face on the wire.
    pub fn letter(self) -> char {
        match self {
            Face::U => 'U',
            Face::R => 'R',
            Face::F => 'F',
            Face::D => 'D',
            Face::L => 'L',
            Face::B => 'B',
        }
    }

    /// The color of this face in the solved configuration.
    pub fn home_color(self) -> Color {
        match self {
            Face::U => Color::White,
            Face::R => Color::Red,
            Face::F => Color::Green,
            Face::D => Color::Yellow,
            Face::L => Color::Orange,
            Face::B => Color::Blue,
        }
    }

    /// Human-readable label for display on the face's center.
    pub fn label(self) -> &'static str {
        match self {
            Face::U => "TOP",
            Face::R => "RIGHT",
            Face::F => "FRONT",
            Face::D => "DOWN",
            Face::L => "LEFT",
            Face::B => "BACK",
        }
    }
}

impl FromStr for Face {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "U" => Ok(Face::U),
            "R" => Ok(Face::R),
            "F" => Ok(Face::F),
            "D" => Ok(Face::D),
            "L" => Ok(Face::L),
            "B" => Ok(Face::B),
            _ => Err(()),
        }
    }
}

/// One of the six logical sticker colors.
///
/// Each color belongs to exactly one face in the solved state; that
/// assignment is the basis of the facelet-letter mapping.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Color {
    White,
    Red,
    Green,
    Yellow,
    Orange,
    Blue,
}

impl Color {
    pub const ALL: [Self; 6] = {
        use Color::*;
        let v = [White, Red, Green, Yellow, Orange, Blue];

        let mut i = 0;
        while i < v.len() {
            assert!(i == v[i] as usize);
            i += 1;
        }

        v
    };

    /// The face this color sits on in the solved configuration.
    pub fn home_face(self) -> Face {
        match self {
            Color::White => Face::U,
            Color::Red => Face::R,
            Color::Green => Face::F,
            Color::Yellow => Face::D,
            Color::Orange => Face::L,
            Color::Blue => Face::B,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Color::White => "White",
            Color::Red => "Red",
            Color::Green => "Green",
            Color::Yellow => "Yellow",
            Color::Orange => "Orange",
            Color::Blue => "Blue",
        }
    }
}

impl FromStr for Color {
    type Err = ();

    /// Accepts the full color name (case-insensitive) or its initial.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "w" | "white" => Ok(Color::White),
            "r" | "red" => Ok(Color::Red),
            "g" | "green" => Ok(Color::Green),
            "y" | "yellow" => Ok(Color::Yellow),
            "o" | "orange" => Ok(Color::Orange),
            "b" | "blue" => Ok(Color::Blue),
            _ => Err(()),
        }
    }
}
