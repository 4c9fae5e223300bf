// Static color tables for the widget.
// Rank colors cycle every five ranks; light and dark themes swap text and background colors.

use std::fmt;

/// An sRGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const fn from_hex(hex: u32) -> Self {
        Self((hex >> 16) as u8, (hex >> 8) as u8, hex as u8)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.0, self.1, self.2)
    }
}

/// Color of a rank number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankColor {
    Red,
    Orange,
    Yellow,
    Blue,
    Purple,
}

impl RankColor {
    const CYCLE: [RankColor; 5] = [
        RankColor::Red,
        RankColor::Orange,
        RankColor::Yellow,
        RankColor::Blue,
        RankColor::Purple,
    ];

    /// Color for a 1-based rank. Repeats every five ranks.
    pub fn for_rank(rank: u32) -> Self {
        let index = (rank as i64 - 1).rem_euclid(Self::CYCLE.len() as i64) as usize;
        Self::CYCLE[index]
    }

    pub fn rgb(&self) -> Rgb {
        match self {
            RankColor::Red => Rgb::from_hex(0xFF6B6B),
            RankColor::Orange => Rgb::from_hex(0xFF9F43),
            RankColor::Yellow => Rgb::from_hex(0xFFA502),
            RankColor::Blue => Rgb::from_hex(0x70A1FF),
            RankColor::Purple => Rgb::from_hex(0x5F27CD),
        }
    }
}

/// Text and background colors for one appearance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub background: Rgb,
    /// Title and keyword text.
    pub text: Rgb,
    /// Empty-state message.
    pub secondary: Rgb,
    pub last_update: Rgb,
    pub error: Rgb,
}

impl Theme {
    pub const LIGHT: Theme = Theme {
        background: Rgb::from_hex(0xFFFFFF),
        text: Rgb::from_hex(0x333333),
        secondary: Rgb::from_hex(0x666666),
        last_update: Rgb::from_hex(0x999999),
        error: Rgb::from_hex(0xFF6B6B),
    };

    pub const DARK: Theme = Theme {
        background: Rgb::from_hex(0x1E1E1E),
        text: Rgb::from_hex(0xFFFFFF),
        secondary: Rgb::from_hex(0xAAAAAA),
        last_update: Rgb::from_hex(0xAAAAAA),
        error: Rgb::from_hex(0xFF8A8A),
    };

    pub fn for_mode(dark_mode: bool) -> Self {
        if dark_mode { Self::DARK } else { Self::LIGHT }
    }
}
