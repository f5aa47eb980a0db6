use plotters::style::RGBColor;

/// One tracked journal or model.
#[derive(Debug, Clone, Copy)]
pub struct Entity {
    pub code: &'static str,  // Short code used in count file names
    pub label: &'static str, // Display name used in figure legends
}

/// A fixed collection of entities sharing a data subdirectory and a figure.
#[derive(Debug, Clone, Copy)]
pub struct EntityGroup {
    pub name: &'static str,   // Name used in logs and the printed summary
    pub subdir: &'static str, // Subdirectory holding this group's count files
    pub entities: &'static [Entity],
}

impl EntityGroup {
    pub fn codes(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entities.iter().map(|e| e.code)
    }

    pub fn labels(&self) -> Vec<&'static str> {
        self.entities.iter().map(|e| e.label).collect()
    }
}

/// Selected hydrology journals, bottom of the stack first.
pub const JOURNALS: EntityGroup = EntityGroup {
    name: "journals",
    subdir: "by_journals",
    entities: &[
        Entity { code: "JH", label: "Journal of Hydrology" },
        Entity { code: "HP", label: "Hydrological Processes" },
        Entity { code: "WRR", label: "Water Resources Research" },
        Entity { code: "HESS", label: "Hydrol. Earth Syst. Sci." },
        Entity { code: "HS", label: "Hydrological Sciences Journal" },
        Entity { code: "JHM", label: "Journal of Hydrometeorology" },
        Entity { code: "ESM", label: "Environmental Software & Modelling" },
        Entity { code: "GRL", label: "Geophysical Research Letters" },
        Entity { code: "AWR", label: "Advances in Water Resources" },
        Entity { code: "ERL", label: "Environmental Research Letters" },
        Entity { code: "GMD", label: "Geosci. Model Dev." },
    ],
};

/// Soil-hydrology models, in stacking order. Codes double as display labels.
pub const MODELS: EntityGroup = EntityGroup {
    name: "models",
    subdir: "by_models",
    entities: &[
        Entity { code: "HYDRUS", label: "HYDRUS" },
        Entity { code: "Hydrogeosphere", label: "Hydrogeosphere" },
        Entity { code: "ParFlow", label: "ParFlow" },
        Entity { code: "mHM", label: "mHM" },
    ],
};

/// Journal fill colors in stacking order: an evenly spaced twelve-hue wheel
/// with the leading red dropped.
pub const JOURNAL_PALETTE: [RGBColor; 11] = [
    RGBColor(230, 131, 50),
    RGBColor(187, 152, 50),
    RGBColor(151, 164, 49),
    RGBColor(80, 177, 49),
    RGBColor(52, 175, 132),
    RGBColor(54, 173, 164),
    RGBColor(56, 170, 191),
    RGBColor(59, 163, 236),
    RGBColor(164, 140, 244),
    RGBColor(232, 102, 244),
    RGBColor(245, 101, 204),
];

/// Model fill colors, one per model in stacking order.
pub const MODEL_PALETTE: [RGBColor; 4] = [
    RGBColor(178, 223, 138), // #b2df8a
    RGBColor(253, 191, 111), // #fdbf6f
    RGBColor(202, 178, 214), // #cab2d6
    RGBColor(166, 206, 227), // #a6cee3
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn palettes_cover_every_entity() {
        assert_eq!(JOURNAL_PALETTE.len(), JOURNALS.entities.len());
        assert_eq!(MODEL_PALETTE.len(), MODELS.entities.len());
    }

    #[test]
    fn codes_are_unique_within_a_group() {
        for group in [JOURNALS, MODELS] {
            let codes: HashSet<&str> = group.codes().collect();
            assert_eq!(codes.len(), group.entities.len());
        }
    }
}
