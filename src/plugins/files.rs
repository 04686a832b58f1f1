//! Files and folders under the configured roots.

use std::path::{Path, PathBuf, MAIN_SEPARATOR};
use std::sync::Arc;
use walkdir::WalkDir;

use super::{IndexCell, SharedOptions};
use crate::config::{expand_folder, Config, FilesOptions};
use crate::core::item::{icons, AutoCompletionResult, IconRef, PluginType, SearchResultItem};
use crate::error::{OrbitError, OrbitResult};
use crate::executor::ExecutionAction;
use crate::i18n::TranslationSet;
use crate::platform::Platform;

/// A file found while scanning
#[derive(Debug, Clone)]
pub struct FileEntry {
    pub name: String,
    pub path: PathBuf,
    pub is_dir: bool,
}

impl FileEntry {
    /// Get path with ~ for home directory
    pub fn display_path(&self) -> String {
        if let Some(home) = dirs::home_dir() {
            if let Ok(suffix) = self.path.strip_prefix(&home) {
                return format!("~{}{}", MAIN_SEPARATOR, suffix.display());
            }
        }
        self.path.display().to_string()
    }

    fn into_item(self) -> SearchResultItem {
        let icon = if self.is_dir { icons::FOLDER } else { icons::FILE };
        let description = self.display_path();

        SearchResultItem::new(self.name, self.path.display().to_string(), PluginType::Files)
            .with_description(description)
            .with_icon(IconRef::Svg(icon.to_string()))
            .open_location(true)
            .auto_completion(self.is_dir)
    }
}

pub struct FilesPlugin {
    options: SharedOptions<FilesOptions>,
    index: IndexCell,
    platform: Arc<dyn Platform>,
}

impl FilesPlugin {
    pub fn new(options: FilesOptions, platform: Arc<dyn Platform>) -> Self {
        Self {
            options: SharedOptions::new(options),
            index: IndexCell::new(),
            platform,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.options.get().enabled
    }

    pub fn get_all(&self) -> OrbitResult<Arc<[SearchResultItem]>> {
        self.index.snapshot(PluginType::Files)
    }

    pub async fn refresh_index(&self) -> OrbitResult<()> {
        let options = self.options.get();
        let entries = tokio::task::spawn_blocking(move || scan_folders(&options))
            .await
            .map_err(|e| OrbitError::IndexRefresh {
                plugin: PluginType::Files,
                message: e.to_string(),
            })?;

        log::debug!("Indexed {} files", entries.len());
        self.index
            .replace(entries.into_iter().map(FileEntry::into_item).collect());
        Ok(())
    }

    pub async fn execute(&self, item: &SearchResultItem, _privileged: bool) -> OrbitResult<()> {
        ExecutionAction::OpenFile {
            path: item.execution_argument.clone(),
        }
        .perform(Arc::clone(&self.platform), false)
        .await
    }

    pub async fn open_location(&self, item: &SearchResultItem) -> OrbitResult<()> {
        ExecutionAction::OpenLocation {
            path: item.execution_argument.clone(),
        }
        .perform(Arc::clone(&self.platform), false)
        .await
    }

    /// Complete a folder to its path, ready for typing the next segment.
    pub fn auto_complete(&self, item: &SearchResultItem) -> OrbitResult<AutoCompletionResult> {
        let path = item.execution_argument.trim_end_matches(MAIN_SEPARATOR);
        Ok(AutoCompletionResult {
            updated_user_input: format!("{}{}", path, MAIN_SEPARATOR),
        })
    }

    pub fn update_config(&self, config: &Config, _translation: &TranslationSet) {
        self.options.set(config.files.clone());
    }
}

fn is_hidden(name: &str) -> bool {
    name.starts_with('.')
}

/// Walk every configured root. Missing roots are skipped.
pub fn scan_folders(options: &FilesOptions) -> Vec<FileEntry> {
    let mut entries = Vec::new();

    for folder in &options.folders {
        let root = expand_folder(folder);
        if !root.is_dir() {
            log::debug!("Skipping missing folder {}", root.display());
            continue;
        }
        scan_folder(&root, options, &mut entries);
    }

    entries
}

fn scan_folder(root: &Path, options: &FilesOptions, entries: &mut Vec<FileEntry>) {
    let walker = WalkDir::new(root)
        .min_depth(1)
        .max_depth(options.max_depth)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        // The root itself may be hidden; only its contents are filtered
        .filter_entry(|e| {
            e.depth() == 0 || options.include_hidden || !is_hidden(&e.file_name().to_string_lossy())
        });

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                log::debug!("Skipping unreadable entry under {}: {}", root.display(), e);
                continue;
            }
        };

        entries.push(FileEntry {
            name: entry.file_name().to_string_lossy().to_string(),
            path: entry.path().to_path_buf(),
            is_dir: entry.file_type().is_dir(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::testing::RecordingPlatform;
    use std::fs;

    fn options(root: &Path) -> FilesOptions {
        FilesOptions {
            enabled: true,
            folders: vec![root.display().to_string(), "/definitely/not/here".to_string()],
            max_depth: 2,
            include_hidden: false,
        }
    }

    fn fixture() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("projects/deep/deeper")).unwrap();
        fs::write(dir.path().join("notes.txt"), "").unwrap();
        fs::write(dir.path().join(".secret"), "").unwrap();
        fs::write(dir.path().join("projects/plan.md"), "").unwrap();
        fs::write(dir.path().join("projects/deep/deeper/lost.md"), "").unwrap();
        dir
    }

    fn names(entries: &[FileEntry]) -> Vec<String> {
        entries.iter().map(|e| e.name.clone()).collect()
    }

    #[test]
    fn test_scan_respects_depth_and_hidden() {
        let dir = fixture();
        let entries = scan_folders(&options(dir.path()));

        assert_eq!(names(&entries), vec!["notes.txt", "projects", "deep", "plan.md"]);
    }

    #[test]
    fn test_scan_can_include_hidden() {
        let dir = fixture();
        let mut options = options(dir.path());
        options.include_hidden = true;
        options.max_depth = 1;

        assert_eq!(names(&scan_folders(&options)), vec![".secret", "notes.txt", "projects"]);
    }

    #[tokio::test]
    async fn test_refresh_builds_items() {
        let dir = fixture();
        let plugin = FilesPlugin::new(options(dir.path()), Arc::new(RecordingPlatform::default()));

        assert!(plugin.get_all().is_err());
        plugin.refresh_index().await.unwrap();

        let entries = plugin.get_all().unwrap();
        let projects = entries.iter().find(|e| e.name == "projects").unwrap();
        assert!(projects.auto_completion_supported);
        assert!(projects.open_location_supported);
        let notes = entries.iter().find(|e| e.name == "notes.txt").unwrap();
        assert!(!notes.auto_completion_supported);
    }

    #[tokio::test]
    async fn test_auto_complete_appends_separator() {
        let dir = fixture();
        let plugin = FilesPlugin::new(options(dir.path()), Arc::new(RecordingPlatform::default()));
        plugin.refresh_index().await.unwrap();
        let entries = plugin.get_all().unwrap();
        let projects = entries.iter().find(|e| e.name == "projects").unwrap();

        let completion = plugin.auto_complete(projects).unwrap();

        assert!(completion.updated_user_input.ends_with(MAIN_SEPARATOR));
        assert!(completion.updated_user_input.contains("projects"));
    }

    #[tokio::test]
    async fn test_execute_and_open_location() {
        let platform = Arc::new(RecordingPlatform::default());
        let plugin = FilesPlugin::new(FilesOptions::default(), platform.clone());
        let item = SearchResultItem::new("notes.txt", "/home/user/notes.txt", PluginType::Files)
            .open_location(true);

        plugin.execute(&item, false).await.unwrap();
        plugin.open_location(&item).await.unwrap();

        assert_eq!(platform.calls(), vec!["file:/home/user/notes.txt", "file:/home/user"]);
    }
}
