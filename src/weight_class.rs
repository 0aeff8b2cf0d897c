//! Weight class enumeration offered to the user

use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WeightClass {
    pub name: &'static str,
    /// Upper limit in pounds
    pub pounds: u16,
}

impl WeightClass {
    /// Display label, e.g. "Heavyweight (265 lbs)"
    pub fn label(&self) -> String {
        self.to_string()
    }

    /// Look up a class by its label or bare name (case-insensitive)
    pub fn from_label(label: &str) -> Option<&'static WeightClass> {
        let wanted = label.trim();
        WEIGHT_CLASSES.iter().find(|class| {
            class.label().eq_ignore_ascii_case(wanted) || class.name.eq_ignore_ascii_case(wanted)
        })
    }
}

impl fmt::Display for WeightClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} lbs)", self.name, self.pounds)
    }
}

pub static WEIGHT_CLASSES: [WeightClass; 9] = [
    WeightClass { name: "Strawweight", pounds: 115 },
    WeightClass { name: "Flyweight", pounds: 125 },
    WeightClass { name: "Bantamweight", pounds: 135 },
    WeightClass { name: "Featherweight", pounds: 145 },
    WeightClass { name: "Lightweight", pounds: 155 },
    WeightClass { name: "Welterweight", pounds: 170 },
    WeightClass { name: "Middleweight", pounds: 185 },
    WeightClass { name: "Light Heavyweight", pounds: 205 },
    WeightClass { name: "Heavyweight", pounds: 265 },
];
