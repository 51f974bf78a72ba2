//! Packages justified by a companion artifact instead of an import.
//!
//! Tooling such as type-checkers, linters and bundlers is rarely imported from
//! source; its presence is implied by a config file, a manifest field or a
//! script. The registry is an ordered list of (matcher, rule) entries: the
//! first entry whose matcher accepts a package name decides.

use depsweep_core::{Manifest, PackageManager, TYPES_PREFIX};
use log::trace;
use std::{
    collections::{BTreeMap, HashSet},
    path::{Path, PathBuf},
};

/// What the special-case rules may inspect about the project.
#[derive(Debug, Clone)]
pub struct ProjectContext {
    root: PathBuf,
    manifest: Manifest,
    scripts: Vec<String>,
    package_manager: PackageManager,
    declared: HashSet<String>,
}

impl ProjectContext {
    pub fn new(root: &Path, manifest: &Manifest, package_manager: PackageManager) -> Self {
        Self {
            root: root.to_path_buf(),
            manifest: manifest.clone(),
            scripts: manifest.script_commands(),
            package_manager,
            declared: manifest.declared_dependencies().into_iter().map(|d| d.name).collect(),
        }
    }

    /// Whether a file or directory exists relative to the project root.
    pub fn has_file(&self, relative: &str) -> bool {
        self.root.join(relative).exists()
    }

    pub fn has_truthy_field(&self, key: &str) -> bool {
        self.manifest.has_truthy_field(key)
    }

    pub fn script_contains(&self, needle: &str) -> bool {
        self.scripts.iter().any(|cmd| cmd.contains(needle))
    }

    pub fn scripts(&self) -> &[String] {
        &self.scripts
    }

    pub fn package_manager(&self) -> PackageManager {
        self.package_manager
    }

    /// Declared in `dependencies` or `devDependencies`, regardless of verdict.
    pub fn is_declared(&self, package: &str) -> bool {
        self.declared.contains(package)
    }
}

/// Base package of a type-declaration package.
///
/// `@types/node` → `node`; scoped packages follow the DefinitelyTyped
/// convention, `@types/babel__core` → `@babel/core`.
pub fn types_base(package: &str) -> Option<String> {
    let rest = package.strip_prefix(TYPES_PREFIX)?;
    if rest.is_empty() {
        return None;
    }
    match rest.split_once("__") {
        Some((scope, name)) if !scope.is_empty() && !name.is_empty() => {
            Some(format!("@{}/{}", scope, name))
        }
        _ => Some(rest.to_string()),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Matcher {
    Exact(String),
    Prefix(String),
}

impl Matcher {
    pub fn matches(&self, package: &str) -> bool {
        match self {
            Matcher::Exact(name) => package == name,
            Matcher::Prefix(prefix) => package.starts_with(prefix.as_str()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rule {
    Always,
    /// Any of the files exists under the project root
    AnyFile(Vec<String>),
    /// The manifest has a truthy top-level field
    ManifestField(String),
    /// Some script command contains the text
    ScriptContains(String),
    ActivePackageManager(PackageManager),
    /// Another package is declared
    Declared(String),
    /// The base of a type-declaration package is declared
    TypesBaseDeclared,
    AnyOf(Vec<Rule>),
}

impl Rule {
    fn files(names: &[&str]) -> Self {
        Rule::AnyFile(names.iter().map(|n| n.to_string()).collect())
    }

    pub fn holds(&self, package: &str, ctx: &ProjectContext) -> bool {
        match self {
            Rule::Always => true,
            Rule::AnyFile(files) => files.iter().any(|f| ctx.has_file(f)),
            Rule::ManifestField(key) => ctx.has_truthy_field(key),
            Rule::ScriptContains(needle) => ctx.script_contains(needle),
            Rule::ActivePackageManager(pm) => ctx.package_manager() == *pm,
            Rule::Declared(other) => ctx.is_declared(other),
            Rule::TypesBaseDeclared => types_base(package).is_some_and(|b| ctx.is_declared(&b)),
            Rule::AnyOf(rules) => rules.iter().any(|r| r.holds(package, ctx)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecialCase {
    pub matcher: Matcher,
    pub rule: Rule,
}

impl SpecialCase {
    pub fn exact(name: &str, rule: Rule) -> Self {
        Self { matcher: Matcher::Exact(name.to_string()), rule }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SpecialCaseRegistry {
    entries: Vec<SpecialCase>,
}

impl SpecialCaseRegistry {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Well-known tooling packages.
    pub fn builtin() -> Self {
        use Rule::*;

        let entries = vec![
            // Build tools and configs
            SpecialCase::exact("typescript", Rule::files(&["tsconfig.json"])),
            SpecialCase::exact(
                "eslint",
                Rule::files(&[".eslintrc.json", ".eslintrc.js", "eslint.config.js"]),
            ),
            SpecialCase::exact(
                "prettier",
                Rule::files(&[".prettierrc", "prettier.config.js", ".prettierrc.json"]),
            ),
            SpecialCase::exact(
                "postcss",
                Rule::files(&["postcss.config.js", "postcss.config.mjs"]),
            ),
            SpecialCase::exact(
                "tailwindcss",
                Rule::files(&["tailwind.config.js", "tailwind.config.ts"]),
            ),
            // Bundlers and transpilers, often CLI-only
            SpecialCase::exact("babel", Rule::files(&[".babelrc", "babel.config.js"])),
            SpecialCase::exact("webpack", Rule::files(&["webpack.config.js"])),
            SpecialCase::exact("vite", Rule::files(&["vite.config.js", "vite.config.ts"])),
            SpecialCase::exact("rollup", Rule::files(&["rollup.config.js"])),
            // Git hooks
            SpecialCase::exact("husky", Rule::files(&[".husky"])),
            SpecialCase::exact("lint-staged", ManifestField("lint-staged".into())),
            // Test runners
            SpecialCase::exact(
                "jest",
                AnyOf(vec![Rule::files(&["jest.config.js"]), ManifestField("jest".into())]),
            ),
            SpecialCase::exact("vitest", Rule::files(&["vitest.config.js", "vitest.config.ts"])),
            SpecialCase::exact("cypress", Rule::files(&["cypress.config.js"])),
            SpecialCase::exact("dotenv", Rule::files(&[".env", ".env.local"])),
            SpecialCase::exact("next", ScriptContains("next".into())),
            SpecialCase::exact("pnpm", ActivePackageManager(PackageManager::Pnpm)),
            SpecialCase::exact("yarn", ActivePackageManager(PackageManager::Yarn)),
            // Type declarations
            SpecialCase::exact("@types/node", Always),
            SpecialCase::exact("@types/react", Declared("react".into())),
            SpecialCase::exact("@types/react-dom", Declared("react-dom".into())),
            SpecialCase { matcher: Matcher::Prefix(TYPES_PREFIX.into()), rule: TypesBaseDeclared },
        ];
        Self { entries }
    }

    /// Built-in entries preceded by user entries, so a user entry for a
    /// built-in name replaces it.
    pub fn with_overrides(special_packages: &BTreeMap<String, Vec<String>>) -> Self {
        let mut registry = Self::empty();
        for (name, files) in special_packages {
            registry.push(SpecialCase::exact(name, Rule::AnyFile(files.clone())));
        }
        registry.entries.extend(Self::builtin().entries);
        registry
    }

    pub fn push(&mut self, entry: SpecialCase) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[SpecialCase] {
        &self.entries
    }

    pub fn lookup(&self, package: &str) -> Option<&SpecialCase> {
        self.entries.iter().find(|e| e.matcher.matches(package))
    }

    pub fn is_special_cased(&self, package: &str, ctx: &ProjectContext) -> bool {
        let Some(entry) = self.lookup(package) else {
            return false;
        };
        let holds = entry.rule.holds(package, ctx);
        trace!("Special case {:?} for {}: {}", entry.rule, package, holds);
        holds
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use depsweep_core::parse_manifest;
    use std::fs;
    use tempfile::TempDir;

    fn context(root: &Path, manifest: &str, pm: PackageManager) -> ProjectContext {
        ProjectContext::new(root, &parse_manifest(manifest).unwrap(), pm)
    }

    #[test]
    fn test_types_base() {
        assert_eq!(types_base("@types/node").as_deref(), Some("node"));
        assert_eq!(types_base("@types/react-dom").as_deref(), Some("react-dom"));
        assert_eq!(types_base("@types/babel__core").as_deref(), Some("@babel/core"));
        assert_eq!(types_base("@types/"), None);
        assert_eq!(types_base("react"), None);
    }

    #[test]
    fn test_config_file_rules() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        let registry = SpecialCaseRegistry::builtin();
        let ctx = context(root, "{}", PackageManager::Npm);
        assert!(!registry.is_special_cased("typescript", &ctx));

        fs::write(root.join("tsconfig.json"), "{}").unwrap();
        fs::write(root.join("eslint.config.js"), "export default [];").unwrap();
        fs::create_dir_all(root.join(".husky")).unwrap();
        assert!(registry.is_special_cased("typescript", &ctx));
        assert!(registry.is_special_cased("eslint", &ctx));
        assert!(registry.is_special_cased("husky", &ctx));
        assert!(!registry.is_special_cased("prettier", &ctx));
    }

    #[test]
    fn test_manifest_field_rules() {
        let temp_dir = TempDir::new().unwrap();
        let registry = SpecialCaseRegistry::builtin();
        let ctx = context(
            temp_dir.path(),
            r#"{"lint-staged": {"*.ts": "eslint --fix"}, "jest": {"preset": "ts-jest"}}"#,
            PackageManager::Npm,
        );
        assert!(registry.is_special_cased("lint-staged", &ctx));
        assert!(registry.is_special_cased("jest", &ctx));
    }

    #[test]
    fn test_script_and_package_manager_rules() {
        let temp_dir = TempDir::new().unwrap();
        let registry = SpecialCaseRegistry::builtin();
        let ctx = context(
            temp_dir.path(),
            r#"{"scripts": {"dev": "next dev"}}"#,
            PackageManager::Pnpm,
        );
        assert!(registry.is_special_cased("next", &ctx));
        assert!(registry.is_special_cased("pnpm", &ctx));
        assert!(!registry.is_special_cased("yarn", &ctx));
    }

    #[test]
    fn test_types_rules_check_declaration_only() {
        let temp_dir = TempDir::new().unwrap();
        let registry = SpecialCaseRegistry::builtin();
        let ctx = context(
            temp_dir.path(),
            r#"{
                "dependencies": {"express": "^4", "@babel/core": "^7"},
                "devDependencies": {
                    "@types/express": "^4",
                    "@types/babel__core": "^7",
                    "@types/jquery": "^3"
                }
            }"#,
            PackageManager::Npm,
        );
        assert!(registry.is_special_cased("@types/node", &ctx));
        assert!(registry.is_special_cased("@types/express", &ctx));
        assert!(registry.is_special_cased("@types/babel__core", &ctx));
        assert!(!registry.is_special_cased("@types/jquery", &ctx));
        assert!(!registry.is_special_cased("@types/react", &ctx));
    }

    #[test]
    fn test_unknown_package_is_not_special() {
        let temp_dir = TempDir::new().unwrap();
        let registry = SpecialCaseRegistry::builtin();
        let ctx = context(temp_dir.path(), "{}", PackageManager::Npm);
        assert!(registry.lookup("left-pad").is_none());
        assert!(!registry.is_special_cased("left-pad", &ctx));
    }

    #[test]
    fn test_user_entries_extend_and_override() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir_all(root.join(".storybook")).unwrap();
        fs::write(root.join("tsconfig.json"), "{}").unwrap();

        let mut overrides = BTreeMap::new();
        overrides.insert("storybook".to_string(), vec![".storybook".to_string()]);
        overrides.insert("typescript".to_string(), vec!["tsconfig.build.json".to_string()]);
        let registry = SpecialCaseRegistry::with_overrides(&overrides);
        let ctx = context(root, "{}", PackageManager::Npm);

        assert!(registry.is_special_cased("storybook", &ctx));
        // The user entry for typescript shadows the built-in one
        assert!(!registry.is_special_cased("typescript", &ctx));
        assert_eq!(registry.entries().len(), SpecialCaseRegistry::builtin().entries().len() + 2);
    }
}
