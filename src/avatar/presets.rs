//! Fixed preset vocabulary (VRM 0.x blend-shape presets) and the viseme
//! table that maps phoneme labels onto the mouth presets.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum BlendShapePreset {
    Neutral,
    A,
    I,
    U,
    E,
    O,
    Blink,
    Joy,
    Angry,
    Sorrow,
    Fun,
    LookUp,
    LookDown,
    LookLeft,
    LookRight,
    #[serde(rename = "Blink_L")]
    BlinkL,
    #[serde(rename = "Blink_R")]
    BlinkR,
}

impl BlendShapePreset {
    pub const ALL: [BlendShapePreset; 17] = [
        BlendShapePreset::Neutral,
        BlendShapePreset::A,
        BlendShapePreset::I,
        BlendShapePreset::U,
        BlendShapePreset::E,
        BlendShapePreset::O,
        BlendShapePreset::Blink,
        BlendShapePreset::Joy,
        BlendShapePreset::Angry,
        BlendShapePreset::Sorrow,
        BlendShapePreset::Fun,
        BlendShapePreset::LookUp,
        BlendShapePreset::LookDown,
        BlendShapePreset::LookLeft,
        BlendShapePreset::LookRight,
        BlendShapePreset::BlinkL,
        BlendShapePreset::BlinkR,
    ];

    /// Preset name as it appears in VRM files ("Joy", "Blink_L", ...).
    pub fn name(&self) -> &'static str {
        match self {
            BlendShapePreset::Neutral => "Neutral",
            BlendShapePreset::A => "A",
            BlendShapePreset::I => "I",
            BlendShapePreset::U => "U",
            BlendShapePreset::E => "E",
            BlendShapePreset::O => "O",
            BlendShapePreset::Blink => "Blink",
            BlendShapePreset::Joy => "Joy",
            BlendShapePreset::Angry => "Angry",
            BlendShapePreset::Sorrow => "Sorrow",
            BlendShapePreset::Fun => "Fun",
            BlendShapePreset::LookUp => "LookUp",
            BlendShapePreset::LookDown => "LookDown",
            BlendShapePreset::LookLeft => "LookLeft",
            BlendShapePreset::LookRight => "LookRight",
            BlendShapePreset::BlinkL => "Blink_L",
            BlendShapePreset::BlinkR => "Blink_R",
        }
    }

    /// Second-stage lookup for expression names the model emits.
    /// Case-insensitive; `_` and `-` are ignored so "blink-l" finds `Blink_L`.
    pub fn from_name(name: &str) -> Option<Self> {
        let wanted = normalize(name);
        Self::ALL
            .iter()
            .copied()
            .find(|preset| normalize(preset.name()) == wanted)
    }

    /// Nearest mouth preset for a viseme label, if any.
    pub fn for_viseme(label: &str) -> Option<Self> {
        match normalize(label).as_str() {
            "a" | "aa" | "ah" | "ae" => Some(BlendShapePreset::A),
            "i" | "ih" | "iy" | "ee" => Some(BlendShapePreset::I),
            "u" | "ou" | "uw" | "oo" => Some(BlendShapePreset::U),
            "e" | "eh" | "ey" => Some(BlendShapePreset::E),
            "o" | "oh" | "ow" | "ao" => Some(BlendShapePreset::O),
            _ => None,
        }
    }
}

impl fmt::Display for BlendShapePreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn normalize(name: &str) -> String {
    name.trim()
        .chars()
        .filter(|c| *c != '_' && *c != '-')
        .flat_map(char::to_lowercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip_through_lookup() {
        for preset in BlendShapePreset::ALL {
            assert_eq!(BlendShapePreset::from_name(preset.name()), Some(preset));
        }
    }

    #[test]
    fn lookup_is_forgiving_about_case_and_separators() {
        assert_eq!(BlendShapePreset::from_name("joy"), Some(BlendShapePreset::Joy));
        assert_eq!(BlendShapePreset::from_name(" SORROW "), Some(BlendShapePreset::Sorrow));
        assert_eq!(BlendShapePreset::from_name("blink-l"), Some(BlendShapePreset::BlinkL));
        assert_eq!(BlendShapePreset::from_name("look_up"), Some(BlendShapePreset::LookUp));
    }

    #[test]
    fn unknown_names_are_not_presets() {
        assert_eq!(BlendShapePreset::from_name("Zorp"), None);
        assert_eq!(BlendShapePreset::from_name(""), None);
    }

    #[test]
    fn visemes_map_to_mouth_shapes() {
        assert_eq!(BlendShapePreset::for_viseme("AA"), Some(BlendShapePreset::A));
        assert_eq!(BlendShapePreset::for_viseme("ih"), Some(BlendShapePreset::I));
        assert_eq!(BlendShapePreset::for_viseme("OU"), Some(BlendShapePreset::U));
        assert_eq!(BlendShapePreset::for_viseme("E"), Some(BlendShapePreset::E));
        assert_eq!(BlendShapePreset::for_viseme("oh"), Some(BlendShapePreset::O));
        assert_eq!(BlendShapePreset::for_viseme("sil"), None);
        assert_eq!(BlendShapePreset::for_viseme("PP"), None);
    }
}
