//! Textual usage detection.
//!
//! A dependency counts as used when any cached file matches one of an ordered
//! list of pattern templates. This is a heuristic over raw text, not a parser:
//! commented-out imports still count, and the bare string-literal pattern
//! matches any quoted mention of the name. Both errors lean toward keeping a
//! package.

use depsweep_core::Corpus;
use log::{trace, warn};
use regex::Regex;
use std::path::Path;

/// Placeholder replaced by the escaped package name.
pub const NAME_PLACEHOLDER: &str = "{name}";

/// How much textual evidence is enough to call a package used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strictness {
    /// Any quoted mention of the name counts
    #[default]
    Conservative,
    /// Only import, require and dynamic import forms count
    Strict,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternTemplate {
    pub label: String,
    pub template: String,
    /// Matches any quoted occurrence; dropped in strict mode
    pub bare_literal: bool,
}

impl PatternTemplate {
    fn builtin(label: &str, template: &str, bare_literal: bool) -> Self {
        Self { label: label.to_string(), template: template.to_string(), bare_literal }
    }

    /// Compiles the template for one package name.
    fn compile(&self, escaped_name: &str) -> Result<Regex, regex::Error> {
        let pattern = self.template.replace(NAME_PLACEHOLDER, escaped_name);
        Regex::new(&format!("(?m){}", pattern))
    }
}

/// Built-in templates, in the order they are tried.
pub fn builtin_patterns() -> Vec<PatternTemplate> {
    vec![
        PatternTemplate::builtin("import", r#"import\s+[^;]+\s+from\s+['"`]{name}['"`]"#, false),
        PatternTemplate::builtin("side-effect import", r#"^\s*import\s+['"`]{name}['"`]"#, false),
        PatternTemplate::builtin("require", r#"require\s*\(\s*['"`]{name}['"`]\s*\)"#, false),
        PatternTemplate::builtin("dynamic import", r#"import\s*\(\s*['"`]{name}['"`]\s*\)"#, false),
        PatternTemplate::builtin("subpath import", r#"from\s+['"`]{name}/[^'"`]*['"`]"#, false),
        PatternTemplate::builtin(
            "subpath require",
            r#"require\s*\(\s*['"`]{name}/[^'"`]*['"`]\s*\)"#,
            false,
        ),
        PatternTemplate::builtin(
            "subpath dynamic import",
            r#"import\s*\(\s*['"`]{name}/[^'"`]*['"`]\s*\)"#,
            false,
        ),
        PatternTemplate::builtin("string literal", r#"['"`]{name}['"`]"#, true),
    ]
}

/// Where a package was found to be used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsageMatch<'c> {
    pub file: &'c Path,
    pub pattern: &'c str,
}

#[derive(Debug, Clone)]
pub struct UsageDetector {
    templates: Vec<PatternTemplate>,
}

impl Default for UsageDetector {
    fn default() -> Self {
        Self::new(Strictness::default(), &[])
    }
}

impl UsageDetector {
    /// Builds a detector from the built-in templates plus user templates.
    ///
    /// User templates without `{name}`, or that do not compile, are reported
    /// and left out.
    pub fn new(strictness: Strictness, extra_templates: &[String]) -> Self {
        let mut templates: Vec<PatternTemplate> = builtin_patterns()
            .into_iter()
            .filter(|t| strictness == Strictness::Conservative || !t.bare_literal)
            .collect();

        for (idx, template) in extra_templates.iter().enumerate() {
            if !template.contains(NAME_PLACEHOLDER) {
                warn!(
                    "Usage pattern '{}' has no {} placeholder, ignoring",
                    template, NAME_PLACEHOLDER
                );
                continue;
            }
            let custom = PatternTemplate {
                label: format!("custom pattern #{}", idx + 1),
                template: template.clone(),
                bare_literal: false,
            };
            if let Err(e) = custom.compile("pkg") {
                warn!("Invalid usage pattern '{}', ignoring: {}", template, e);
                continue;
            }
            templates.push(custom);
        }

        Self { templates }
    }

    pub fn templates(&self) -> &[PatternTemplate] {
        &self.templates
    }

    /// Finds the first file and pattern that reference `package`.
    ///
    /// Files are scanned in corpus order and each file is tried against every
    /// pattern before moving on; the scan stops at the first hit.
    pub fn find_usage<'c>(&'c self, package: &str, corpus: &'c Corpus) -> Option<UsageMatch<'c>> {
        let escaped = regex::escape(package);
        let matchers: Vec<(&str, Regex)> = self
            .templates
            .iter()
            .filter_map(|t| match t.compile(&escaped) {
                Ok(re) => Some((t.label.as_str(), re)),
                Err(e) => {
                    trace!("Skipping pattern '{}' for {}: {}", t.label, package, e);
                    None
                }
            })
            .collect();

        for file in corpus.iter() {
            for (label, re) in &matchers {
                if re.is_match(&file.text) {
                    trace!("{} matched '{}' in {}", package, label, file.path.display());
                    return Some(UsageMatch { file: file.path.as_path(), pattern: *label });
                }
            }
        }
        None
    }

    pub fn is_used(&self, package: &str, corpus: &Corpus) -> bool {
        self.find_usage(package, corpus).is_some()
    }
}

/// Whether `package` appears verbatim in any script command.
pub fn is_used_in_script<S: AsRef<str>>(package: &str, scripts: &[S]) -> bool {
    scripts.iter().any(|cmd| cmd.as_ref().contains(package))
}
