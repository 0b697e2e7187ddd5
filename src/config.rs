use std::{env, path::PathBuf, time::Duration};

const DEFAULT_DATA_DIR: &str = "data/eia";
const DEFAULT_OUTPUT_DIR: &str = "01-industry/images";
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// A remote workbook and the file name it is cached under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Source {
    pub url: &'static str,
    pub file_name: &'static str,
}

/// EIA China country analysis, figure 6: electricity generation by source.
pub const EIA_FIGURE6: Source = Source {
    url: "https://www.eia.gov/international/content/analysis/countries_long/China/content/analysis/countries_long/China/excel/figure6_data.xlsx",
    file_name: "figure6_data.xlsx",
};

/// EIA China country analysis, figure 7: installed generating capacity.
pub const EIA_FIGURE7: Source = Source {
    url: "https://www.eia.gov/international/content/analysis/countries_long/China/content/analysis/countries_long/China/excel/figure7_data.xlsx",
    file_name: "figure7_data.xlsx",
};

pub const EIA_REFERER: &str = "https://www.eia.gov/international/content/analysis/countries_long/China/";

/// Filesystem locations and network bounds shared by every chart program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Where downloaded workbooks are cached.
    pub data_dir: PathBuf,
    /// Checked when the cached workbook is absent from `data_dir`.
    pub alt_data_dir: Option<PathBuf>,
    /// Where rendered charts are written.
    pub output_dir: PathBuf,
    pub http_timeout: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            alt_data_dir: None,
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        }
    }
}

impl Settings {
    /// Build settings from `ENERGYMIX_*` environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            data_dir: non_empty("ENERGYMIX_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            alt_data_dir: non_empty("ENERGYMIX_ALT_DATA_DIR").map(PathBuf::from),
            output_dir: non_empty("ENERGYMIX_OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.output_dir),
            http_timeout: non_empty("ENERGYMIX_HTTP_TIMEOUT_SECS")
                .and_then(|v| v.trim().parse::<u64>().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.http_timeout),
        }
    }

    pub fn cache_path(&self, source: &Source) -> PathBuf {
        self.data_dir.join(source.file_name)
    }

    pub fn alt_cache_path(&self, source: &Source) -> Option<PathBuf> {
        self.alt_data_dir.as_ref().map(|dir| dir.join(source.file_name))
    }

    pub fn output_path(&self, file_name: &str) -> PathBuf {
        self.output_dir.join(file_name)
    }
}
