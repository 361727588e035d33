use filepicker_config::{Config, SelectionMode, SelectionType};
use filepicker_engine::{
    DirectoryEntry, DirectoryLister, ExtensionFilter, ListError, find_external_storage_root,
};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Row filter matching the configured selection type and extensions
pub fn filter_for(config: &Config) -> ExtensionFilter {
    if config.directories_only() {
        ExtensionFilter::directories_only()
    } else {
        ExtensionFilter::new(config.extensions.iter().flatten())
    }
}

/// State of the picker screen, independent of the terminal.
pub struct Picker {
    lister: DirectoryLister,
    filter: ExtensionFilter,
    selection_mode: SelectionMode,
    selection_type: SelectionType,
    current_dir: PathBuf,
    entries: Vec<DirectoryEntry>,
    /// Marked paths survive navigation, like a multi-directory selection
    marked: BTreeSet<PathBuf>,
    status: Option<String>,
}

impl Picker {
    pub fn open(config: &Config, directory: &Path) -> Result<Self, ListError> {
        let mut picker = Self {
            lister: DirectoryLister::new(),
            filter: filter_for(config),
            selection_mode: config.selection_mode,
            selection_type: config.selection_type,
            current_dir: directory.to_path_buf(),
            entries: Vec::new(),
            marked: BTreeSet::new(),
            status: None,
        };
        picker.navigate(directory)?;
        Ok(picker)
    }

    pub fn current_dir(&self) -> &Path {
        &self.current_dir
    }

    pub fn entries(&self) -> &[DirectoryEntry] {
        &self.entries
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn is_marked(&self, entry: &DirectoryEntry) -> bool {
        self.marked.contains(&entry.path)
    }

    pub fn marked(&self) -> impl Iterator<Item = &PathBuf> {
        self.marked.iter()
    }

    /// Show `directory`. On failure the previous listing stays on screen.
    pub fn navigate(&mut self, directory: &Path) -> Result<(), ListError> {
        match self.lister.list_with_parent(directory, &self.filter) {
            Ok(entries) => {
                self.current_dir =
                    std::path::absolute(directory).unwrap_or_else(|_| directory.to_path_buf());
                self.entries = entries;
                self.status = None;
                Ok(())
            }
            Err(e) => {
                self.status = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Open the row at `index` when it is a directory.
    ///
    /// Returns `true` when the screen changed.
    pub fn activate(&mut self, index: usize) -> bool {
        let Some(entry) = self.entries.get(index) else {
            return false;
        };
        if !entry.is_directory {
            return false;
        }
        let target = entry.path.clone();
        self.navigate(&target).is_ok()
    }

    pub fn go_parent(&mut self) -> bool {
        let Some(parent) = self.current_dir.parent().map(Path::to_path_buf) else {
            return false;
        };
        self.navigate(&parent).is_ok()
    }

    /// Jump to the removable storage volume, when one is mounted
    pub fn open_external_storage(&mut self) -> bool {
        match find_external_storage_root() {
            Some(root) => self.navigate(&root).is_ok(),
            None => {
                self.status = Some("No external storage found".to_string());
                false
            }
        }
    }

    /// Mark or unmark the row at `index`.
    ///
    /// Returns `true` when the selection changed.
    pub fn toggle_mark(&mut self, index: usize) -> bool {
        let Some(entry) = self.entries.get(index) else {
            return false;
        };
        if entry.is_parent_row() || !self.selection_type.allows(entry.is_directory) {
            return false;
        }

        let path = entry.path.clone();
        if self.marked.remove(&path) {
            return true;
        }
        if self.selection_mode == SelectionMode::Single {
            self.marked.clear();
        }
        self.marked.insert(path);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    fn sample_tree() -> TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("Music")).unwrap();
        fs::write(dir.path().join("Music").join("song.mp3"), "x").unwrap();
        fs::write(dir.path().join("b.txt"), "b").unwrap();
        fs::write(dir.path().join("A.txt"), "a").unwrap();
        fs::write(dir.path().join("photo.png"), "p").unwrap();
        dir
    }

    fn names(picker: &Picker) -> Vec<&str> {
        picker.entries().iter().map(|e| e.name.as_str()).collect()
    }

    fn index_of(picker: &Picker, name: &str) -> usize {
        picker
            .entries()
            .iter()
            .position(|e| e.name == name)
            .unwrap()
    }

    #[test]
    fn test_open_lists_parent_then_sorted_rows() {
        let dir = sample_tree();
        let picker = Picker::open(&Config::default(), dir.path()).unwrap();

        assert_eq!(names(&picker), vec!["..", "Music", "A.txt", "b.txt", "photo.png"]);
        assert_eq!(picker.current_dir(), dir.path());
        assert!(picker.status().is_none());
    }

    #[test]
    fn test_extensions_from_config_filter_files() {
        let dir = sample_tree();
        let config = Config {
            extensions: Some(vec!["txt".to_string()]),
            ..Config::default()
        };

        let picker = Picker::open(&config, dir.path()).unwrap();

        assert_eq!(names(&picker), vec!["..", "Music", "A.txt", "b.txt"]);
    }

    #[test]
    fn test_directory_selection_hides_files() {
        let dir = sample_tree();
        let config = Config {
            selection_type: SelectionType::Dir,
            ..Config::default()
        };

        let picker = Picker::open(&config, dir.path()).unwrap();

        assert_eq!(names(&picker), vec!["..", "Music"]);
    }

    #[test]
    fn test_activate_directory_and_go_back() {
        let dir = sample_tree();
        let mut picker = Picker::open(&Config::default(), dir.path()).unwrap();

        assert!(picker.activate(index_of(&picker, "Music")));
        assert_eq!(picker.current_dir(), dir.path().join("Music"));
        assert_eq!(names(&picker), vec!["..", "song.mp3"]);

        assert!(picker.activate(0));
        assert_eq!(picker.current_dir(), dir.path());

        assert!(picker.activate(index_of(&picker, "Music")));
        assert!(picker.go_parent());
        assert_eq!(picker.current_dir(), dir.path());
    }

    #[test]
    fn test_activate_file_does_nothing() {
        let dir = sample_tree();
        let mut picker = Picker::open(&Config::default(), dir.path()).unwrap();

        assert!(!picker.activate(index_of(&picker, "A.txt")));
        assert!(!picker.activate(99));
        assert_eq!(picker.current_dir(), dir.path());
    }

    #[test]
    fn test_failed_navigation_keeps_listing() {
        let dir = sample_tree();
        let mut picker = Picker::open(&Config::default(), dir.path()).unwrap();
        let before = names(&picker).join(",");

        let result = picker.navigate(&dir.path().join("missing"));

        assert!(result.is_err());
        assert_eq!(names(&picker).join(","), before);
        assert!(picker.status().unwrap().contains("Failed to list directory"));
    }

    #[test]
    fn test_single_mode_replaces_mark() {
        let dir = sample_tree();
        let mut picker = Picker::open(&Config::default(), dir.path()).unwrap();

        assert!(picker.toggle_mark(index_of(&picker, "A.txt")));
        assert!(picker.toggle_mark(index_of(&picker, "b.txt")));

        let marked: Vec<_> = picker.marked().cloned().collect();
        assert_eq!(marked, vec![dir.path().join("b.txt")]);
    }

    #[test]
    fn test_multi_mode_keeps_marks_across_directories() {
        let dir = sample_tree();
        let config = Config {
            selection_mode: SelectionMode::Multi,
            ..Config::default()
        };
        let mut picker = Picker::open(&config, dir.path()).unwrap();

        picker.toggle_mark(index_of(&picker, "A.txt"));
        picker.activate(index_of(&picker, "Music"));
        picker.toggle_mark(index_of(&picker, "song.mp3"));

        let marked: Vec<_> = picker.marked().cloned().collect();
        assert_eq!(
            marked,
            vec![
                dir.path().join("A.txt"),
                dir.path().join("Music").join("song.mp3"),
            ]
        );
    }

    #[test]
    fn test_toggle_twice_unmarks() {
        let dir = sample_tree();
        let mut picker = Picker::open(&Config::default(), dir.path()).unwrap();
        let index = index_of(&picker, "A.txt");

        picker.toggle_mark(index);
        assert!(picker.is_marked(&picker.entries()[index]));
        picker.toggle_mark(index);
        assert!(!picker.is_marked(&picker.entries()[index]));
    }

    #[test]
    fn test_selection_type_limits_marks() {
        let dir = sample_tree();
        let mut picker = Picker::open(&Config::default(), dir.path()).unwrap();

        // File selection: directories and the parent row cannot be marked
        assert!(!picker.toggle_mark(index_of(&picker, "Music")));
        assert!(!picker.toggle_mark(0));
        assert_eq!(picker.marked().count(), 0);

        let config = Config {
            selection_type: SelectionType::FileAndDir,
            ..Config::default()
        };
        let mut picker = Picker::open(&config, dir.path()).unwrap();
        assert!(picker.toggle_mark(index_of(&picker, "Music")));
    }
}
