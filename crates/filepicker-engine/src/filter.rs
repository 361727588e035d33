use std::path::Path;

/// Decides whether a child of a directory becomes a row in the listing.
pub trait EntryFilter {
    fn accept(&self, dir: &Path, name: &str, is_dir: bool) -> bool;
}

impl<F> EntryFilter for F
where
    F: Fn(&Path, &str, bool) -> bool,
{
    fn accept(&self, dir: &Path, name: &str, is_dir: bool) -> bool {
        self(dir, name, is_dir)
    }
}

/// Accepts every child
#[derive(Debug, Default, Clone, Copy)]
pub struct AcceptAll;

impl EntryFilter for AcceptAll {
    fn accept(&self, _dir: &Path, _name: &str, _is_dir: bool) -> bool {
        true
    }
}

/// Filters files by extension while always letting directories through so
/// the user can keep navigating.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ExtensionFilter {
    /// Lower-cased extensions without the leading dot. Empty accepts every file.
    extensions: Vec<String>,
    directories_only: bool,
}

impl ExtensionFilter {
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let extensions = extensions
            .into_iter()
            .filter_map(|ext| {
                let ext = ext.as_ref().trim().trim_start_matches('.').to_lowercase();
                (!ext.is_empty()).then_some(ext)
            })
            .collect();

        Self {
            extensions,
            directories_only: false,
        }
    }

    /// Filter that hides every file, used when only directories may be picked
    pub fn directories_only() -> Self {
        Self {
            extensions: Vec::new(),
            directories_only: true,
        }
    }

    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    pub fn is_directories_only(&self) -> bool {
        self.directories_only
    }

    fn matches_extension(&self, name: &str) -> bool {
        if self.extensions.is_empty() {
            return true;
        }
        let name = name.to_lowercase();
        self.extensions.iter().any(|ext| {
            name.len() > ext.len()
                && name.ends_with(ext.as_str())
                && name[..name.len() - ext.len()].ends_with('.')
        })
    }
}

impl EntryFilter for ExtensionFilter {
    fn accept(&self, _dir: &Path, name: &str, is_dir: bool) -> bool {
        if is_dir {
            return true;
        }
        !self.directories_only && self.matches_extension(name)
    }
}
