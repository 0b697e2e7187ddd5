use once_cell::sync::Lazy;
use regex::Regex;

static NOT_LOWER_ALPHA: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-z]").expect("static pattern should compile"));

/// Reduce a header to lowercase ASCII letters only.
///
/// `" Natural-Gas (TWh) "` and `"natural gas"` both become `"naturalgastwh"` / `"naturalgas"`;
/// digits, punctuation, whitespace and non-ASCII letters are all dropped.
pub fn normalize_header(raw: &str) -> String {
    NOT_LOWER_ALPHA
        .replace_all(&raw.trim().to_lowercase(), "")
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_case_space_and_punctuation() {
        assert_eq!(normalize_header("  Natural Gas "), "naturalgas");
        assert_eq!(normalize_header("Non-hydro renewables"), "nonhydrorenewables");
        assert_eq!(normalize_header("Renewables (non-hydro)"), "renewablesnonhydro");
        assert_eq!(normalize_header("YEAR"), "year");
    }

    #[test]
    fn digits_and_non_ascii_vanish() {
        assert_eq!(normalize_header("2024.0"), "");
        assert_eq!(normalize_header("Coal 煤炭"), "coal");
        assert_eq!(normalize_header("Pumped-storage\n"), "pumpedstorage");
    }
}
