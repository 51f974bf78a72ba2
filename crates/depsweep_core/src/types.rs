use std::path::{Path, PathBuf};

/// One cached source file.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub path: PathBuf,
    pub text: String,
}

/// The cached text of every scanned file, loaded once per analysis.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    files: Vec<SourceFile>,
}

impl Corpus {
    pub fn new(files: Vec<SourceFile>) -> Self {
        Self { files }
    }

    /// Builds a corpus from in-memory `(path, text)` pairs.
    pub fn from_pairs<P, T>(pairs: impl IntoIterator<Item = (P, T)>) -> Self
    where
        P: Into<PathBuf>,
        T: Into<String>,
    {
        let files = pairs
            .into_iter()
            .map(|(path, text)| SourceFile { path: path.into(), text: text.into() })
            .collect();
        Self { files }
    }

    pub fn iter(&self) -> impl Iterator<Item = &SourceFile> {
        self.files.iter()
    }

    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.files.iter().map(|f| f.path.as_path())
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// A name from `dependencies` or `devDependencies`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclaredDependency {
    pub name: String,
    /// Version range as declared; informational only
    pub version: String,
}
