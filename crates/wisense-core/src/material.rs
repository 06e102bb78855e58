//! Experimental conditions: the material placed between client and AP,
//! and the frequency band label attached to exported rows.

use std::fmt;

/// The physical obstruction under test. `Baseline` means nothing is in
/// the signal path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Material {
    #[default]
    Baseline,
    Wood,
    Plastic,
    Glass,
    Aluminium,
    Copper,
    Steel,
}

impl Material {
    /// Declaration order — also the order keys 1..7 map to and the order
    /// the statistics view lists groups in.
    pub const ALL: [Material; 7] = [
        Material::Baseline,
        Material::Wood,
        Material::Plastic,
        Material::Glass,
        Material::Aluminium,
        Material::Copper,
        Material::Steel,
    ];

    /// Map the `1`..`7` keyboard row onto materials.
    pub fn from_digit(c: char) -> Option<Material> {
        let idx = c.to_digit(10)? as usize;
        if (1..=Self::ALL.len()).contains(&idx) {
            Some(Self::ALL[idx - 1])
        } else {
            None
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Material::Baseline => "baseline",
            Material::Wood => "wood",
            Material::Plastic => "plastic",
            Material::Glass => "glass",
            Material::Aluminium => "aluminium",
            Material::Copper => "copper",
            Material::Steel => "steel",
        }
    }
}

impl fmt::Display for Material {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Wi-Fi frequency band label. Purely an annotation on exported rows —
/// wdutil reports whatever the interface is on regardless.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Band {
    #[default]
    Ghz24,
    Ghz5,
}

impl Band {
    pub fn toggled(self) -> Band {
        match self {
            Band::Ghz24 => Band::Ghz5,
            Band::Ghz5 => Band::Ghz24,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Band::Ghz24 => "2.4",
            Band::Ghz5 => "5",
        }
    }
}

impl fmt::Display for Band {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
