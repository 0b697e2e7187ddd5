use super::normalize::normalize_header;

/// Canonical series keys, each with the header spellings accepted for it.
///
/// Both orders matter: keys are resolved in declaration order and, per key, the first alias
/// with an exact normalized match wins.
#[derive(Debug, Clone, Copy)]
pub struct AliasSet {
    entries: &'static [(&'static str, &'static [&'static str])],
}

impl AliasSet {
    pub const fn new(entries: &'static [(&'static str, &'static [&'static str])]) -> Self {
        Self { entries }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &'static [&'static str])> + '_ {
        self.entries.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The first key with an alias equal to `text` after normalization.
    pub fn key_for(&self, text: &str) -> Option<&'static str> {
        let norm = normalize_header(text);
        if norm.is_empty() {
            return None;
        }
        self.iter()
            .find(|(_, aliases)| aliases.iter().any(|a| normalize_header(a) == norm))
            .map(|(key, _)| key)
    }
}

/// Generation timeseries (EIA figure 6).
///
/// `solar` and `wind` alone also satisfy `non_hydro_renewables`, while [`CAPACITY_SERIES`]
/// keeps them as separate keys. The asymmetry is kept as found, not unified.
pub const GENERATION_SERIES: AliasSet = AliasSet::new(&[
    ("coal", &["coal"]),
    ("natural_gas", &["natural gas", "gas"]),
    ("nuclear", &["nuclear"]),
    ("hydro", &["hydro", "hydropower", "hydroelectric"]),
    (
        "non_hydro_renewables",
        &[
            "non-hydro renewables",
            "other renewables",
            "renewables (non-hydro)",
            "solar",
            "wind",
        ],
    ),
    (
        "petroleum",
        &["petroleum", "petroleum-fired", "petroleum and other liquids"],
    ),
]);

/// Installed capacity snapshot (EIA figure 7).
pub const CAPACITY_SERIES: AliasSet = AliasSet::new(&[
    ("coal", &["coal"]),
    ("natural_gas", &["natural gas", "gas"]),
    ("oil", &["oil", "petroleum"]),
    ("nuclear", &["nuclear"]),
    ("hydro", &["hydro", "hydropower", "hydroelectric"]),
    ("solar", &["solar"]),
    ("wind", &["wind"]),
    ("storage", &["storage", "pumped-storage", "battery"]),
    ("other", &["other"]),
]);

/// Row labels read from the `Generation` sheet by the numeric-axis pivot, keyed by the
/// tidy-table column they become. Matched case-insensitively on the trimmed label.
pub const PIVOT_ROW_LABELS: &[(&str, &[&str])] = &[
    ("coal", &["coal"]),
    ("natural gas", &["natural gas", "gas"]),
    ("nuclear", &["nuclear"]),
    ("hydroelectric", &["hydroelectric", "hydro"]),
    ("petroleum", &["petroleum"]),
    ("solar", &["solar"]),
    ("wind", &["wind"]),
    ("biomass and waste", &["biomass and waste"]),
    ("geothermal", &["geothermal"]),
];

/// Summed into [`NON_HYDRO_RENEWABLES`] only when every one is present.
pub const NON_HYDRO_COMPONENTS: [&str; 4] = ["solar", "wind", "biomass and waste", "geothermal"];

pub const NON_HYDRO_RENEWABLES: &str = "Non-hydro Renewables";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_lookup_follows_declared_priority() {
        assert_eq!(GENERATION_SERIES.key_for("Gas"), Some("natural_gas"));
        assert_eq!(GENERATION_SERIES.key_for("Solar"), Some("non_hydro_renewables"));
        assert_eq!(CAPACITY_SERIES.key_for("Solar"), Some("solar"));
        assert_eq!(CAPACITY_SERIES.key_for("Petroleum"), Some("oil"));
        assert_eq!(GENERATION_SERIES.key_for("Petroleum"), Some("petroleum"));
        assert_eq!(GENERATION_SERIES.key_for(""), None);
        assert_eq!(GENERATION_SERIES.key_for("Total"), None);
    }

    #[test]
    fn sets_have_expected_sizes() {
        assert_eq!(GENERATION_SERIES.len(), 6);
        assert_eq!(CAPACITY_SERIES.len(), 9);
        assert!(!CAPACITY_SERIES.is_empty());
    }
}
