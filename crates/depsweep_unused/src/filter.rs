use log::{trace, warn};
use regex::Regex;
use std::collections::HashSet;

/// Excludes packages from classification by exact name or wildcard pattern.
///
/// A pattern becomes a regex by turning its first `*` into `.*`; every other
/// character keeps its regex meaning, so `*.js` matches `chartxjs` too. The
/// regex is unanchored.
#[derive(Debug, Clone, Default)]
pub struct IgnoreFilter {
    names: HashSet<String>,
    patterns: Vec<Regex>,
}

pub fn pattern_to_regex(pattern: &str) -> Result<Regex, regex::Error> {
    Regex::new(&pattern.replacen('*', ".*", 1))
}

impl IgnoreFilter {
    pub fn new(names: &[String], patterns: &[String]) -> Self {
        let patterns = patterns
            .iter()
            .filter_map(|p| match pattern_to_regex(p) {
                Ok(re) => Some(re),
                Err(e) => {
                    warn!("Invalid ignore pattern '{}', ignoring: {}", p, e);
                    None
                }
            })
            .collect();
        Self { names: names.iter().cloned().collect(), patterns }
    }

    pub fn should_ignore(&self, package: &str) -> bool {
        if self.names.contains(package) {
            trace!("{} is in the ignore list", package);
            return true;
        }
        if let Some(re) = self.patterns.iter().find(|re| re.is_match(package)) {
            trace!("{} matches ignore pattern '{}'", package, re.as_str());
            return true;
        }
        false
    }
}

/// One-off form of [`IgnoreFilter::should_ignore`].
pub fn should_ignore(package: &str, ignore: &[String], ignore_patterns: &[String]) -> bool {
    IgnoreFilter::new(ignore, ignore_patterns).should_ignore(package)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_exact_names() {
        let filter = IgnoreFilter::new(&strings(&["eslint", "prettier"]), &[]);
        assert!(filter.should_ignore("eslint"));
        assert!(!filter.should_ignore("eslint-plugin-react"));
        assert!(!filter.should_ignore("lodash"));
    }

    #[test]
    fn test_scope_pattern() {
        let filter = IgnoreFilter::new(&[], &strings(&["@types/*"]));
        assert!(filter.should_ignore("@types/node"));
        assert!(filter.should_ignore("@types/react-dom"));
        assert!(!filter.should_ignore("typescript"));
    }

    #[test]
    fn test_suffix_pattern_is_unanchored() {
        let filter = IgnoreFilter::new(&[], &strings(&["*-loader"]));
        assert!(filter.should_ignore("css-loader"));
        // Unanchored: also matches in the middle of a name
        assert!(filter.should_ignore("css-loader-extra"));
        assert!(!filter.should_ignore("loader"));
    }

    #[test]
    fn test_only_first_wildcard_is_expanded() {
        let filter = IgnoreFilter::new(&[], &strings(&["eslint-*-*"]));
        // Second '*' stays a quantifier on '-'
        assert!(filter.should_ignore("eslint-plugin-"));
        assert!(filter.should_ignore("eslint-config"));
        assert!(!filter.should_ignore("prettier"));
    }

    #[test]
    fn test_regex_metacharacters_are_not_escaped() {
        let filter = IgnoreFilter::new(&[], &strings(&["chart.js"]));
        assert!(filter.should_ignore("chart.js"));
        assert!(filter.should_ignore("chartxjs"));
    }

    #[test]
    fn test_invalid_pattern_is_skipped() {
        let filter = IgnoreFilter::new(&[], &strings(&["(unclosed", "@types/*"]));
        assert!(filter.should_ignore("@types/node"));
        assert!(!filter.should_ignore("(unclosed"));
    }

    #[test]
    fn test_free_function() {
        let ignore = strings(&["husky"]);
        let patterns = strings(&["@babel/*"]);
        assert!(should_ignore("husky", &ignore, &patterns));
        assert!(should_ignore("@babel/core", &ignore, &patterns));
        assert!(!should_ignore("vite", &ignore, &patterns));
        assert!(!should_ignore("vite", &[], &[]));
    }
}
