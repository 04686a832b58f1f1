//! Installed applications.
//!
//! Programs are discovered by a [`ProgramRepository`]. The default one walks
//! the configured folders: `.desktop` entries are parsed, anything else with a
//! configured extension (`.app` bundles, `.lnk` shortcuts, ...) is launched by
//! path.

use freedesktop_desktop_entry::DesktopEntry;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use walkdir::WalkDir;

use super::{IndexCell, SharedOptions};
use crate::config::{expand_folder, Config, ProgramsOptions};
use crate::core::item::{IconRef, PluginType, SearchResultItem};
use crate::error::{OrbitError, OrbitResult};
use crate::executor::ExecutionAction;
use crate::i18n::TranslationSet;
use crate::platform::{strip_field_codes, Platform};

/// Themed icon lookup locations, most specific first.
const ICON_DIRS: &[&str] = &[
    "~/.local/share/icons/hicolor/48x48/apps",
    "/usr/share/icons/hicolor/48x48/apps",
    "/usr/share/icons/hicolor/scalable/apps",
    "/usr/share/icons/hicolor/256x256/apps",
    "/usr/share/pixmaps",
];
const ICON_EXTENSIONS: &[&str] = &["png", "svg", "xpm"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    pub name: String,
    /// Exec line for desktop entries, otherwise the program's path.
    pub exec: String,
    pub path: PathBuf,
    pub icon: Option<String>,
    pub description: Option<String>,
    pub keywords: Vec<String>,
}

impl Program {
    fn is_desktop_entry(&self) -> bool {
        self.path.extension().is_some_and(|ext| ext == "desktop")
    }
}

/// Source of installed programs. Implementations may block.
pub trait ProgramRepository: Send + Sync {
    fn load(&self, options: &ProgramsOptions) -> Result<Vec<Program>, String>;
}

/// Scans the configured program folders.
#[derive(Debug, Default, Clone, Copy)]
pub struct FolderProgramRepository;

impl ProgramRepository for FolderProgramRepository {
    fn load(&self, options: &ProgramsOptions) -> Result<Vec<Program>, String> {
        let mut programs: Vec<Program> = Vec::new();

        for folder in &options.folders {
            let root = expand_folder(folder);
            if root.is_dir() {
                scan_directory(&root, &options.file_extensions, &mut programs);
            } else {
                log::debug!("Skipping missing program folder {}", root.display());
            }
        }

        // Sort by name for consistent ordering
        programs.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        Ok(programs)
    }
}

fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .is_some_and(|ext| extensions.iter().any(|e| e.eq_ignore_ascii_case(&ext)))
}

fn scan_directory(dir: &Path, extensions: &[String], programs: &mut Vec<Program>) {
    let mut walker = WalkDir::new(dir).max_depth(3).into_iter();

    while let Some(entry) = walker.next() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(_) => continue,
        };
        let path = entry.path();
        if entry.depth() == 0 || !has_extension(path, extensions) {
            continue;
        }

        // Bundles are directories; never index their contents
        if entry.file_type().is_dir() {
            walker.skip_current_dir();
        }

        let program = if path.extension().is_some_and(|ext| ext == "desktop") {
            parse_desktop_file(path)
        } else {
            program_from_path(path)
        };

        if let Some(program) = program {
            // Skip duplicates by file stem; earlier folders win
            let stem = program.path.file_stem().map(|s| s.to_os_string());
            if !programs.iter().any(|p| p.path.file_stem().map(|s| s.to_os_string()) == stem) {
                programs.push(program);
            }
        }
    }
}

fn program_from_path(path: &Path) -> Option<Program> {
    let name = path.file_stem()?.to_string_lossy().to_string();
    Some(Program {
        keywords: name.split_whitespace().map(|s| s.to_lowercase()).collect(),
        name,
        exec: path.display().to_string(),
        path: path.to_path_buf(),
        icon: None,
        description: None,
    })
}

fn parse_desktop_file(path: &Path) -> Option<Program> {
    let content = std::fs::read_to_string(path).ok()?;
    let entry = DesktopEntry::from_str(path, &content, Some(&["en"])).ok()?;

    // Skip entries that shouldn't be shown
    if entry.no_display() || entry.hidden() {
        return None;
    }

    // Use empty locale list to get default (untranslated) values
    let locales: &[&str] = &[];

    let name = entry.name(locales)?.to_string();
    let exec = strip_field_codes(entry.exec()?);
    if exec.is_empty() {
        return None;
    }

    let mut keywords: Vec<String> = entry
        .keywords(locales)
        .map(|kw| kw.iter().map(|s| s.to_string()).collect())
        .unwrap_or_default();
    keywords.extend(name.split_whitespace().map(|s| s.to_lowercase()));

    Some(Program {
        name,
        exec,
        path: path.to_path_buf(),
        icon: entry.icon().map(|s| s.to_string()),
        description: entry.comment(locales).map(|s| s.to_string()),
        keywords,
    })
}

type IconCache = Arc<Mutex<HashMap<String, Option<PathBuf>>>>;

fn resolve_icon(cache: &IconCache, icon: &str) -> Option<PathBuf> {
    if let Some(cached) = cache.lock().get(icon) {
        return cached.clone();
    }

    let resolved = if Path::new(icon).is_absolute() {
        Some(PathBuf::from(icon)).filter(|p| p.exists())
    } else {
        ICON_DIRS.iter().find_map(|dir| {
            let dir = expand_folder(dir);
            ICON_EXTENSIONS
                .iter()
                .map(|ext| dir.join(format!("{}.{}", icon, ext)))
                .find(|candidate| candidate.exists())
        })
    };

    cache.lock().insert(icon.to_string(), resolved.clone());
    resolved
}

fn program_item(program: Program, icon_cache: &IconCache) -> SearchResultItem {
    let icon = program
        .icon
        .as_deref()
        .and_then(|icon| resolve_icon(icon_cache, icon))
        .map(|path| IconRef::Path(path.display().to_string()))
        .unwrap_or_default();
    let reveal = !program.is_desktop_entry();
    let description = program
        .description
        .clone()
        .unwrap_or_else(|| program.path.display().to_string());

    SearchResultItem::new(program.name, program.exec, PluginType::Programs)
        .with_description(description)
        .with_icon(icon)
        .with_tags(program.keywords)
        .open_location(reveal)
}

pub struct ProgramsPlugin {
    options: SharedOptions<ProgramsOptions>,
    repository: Arc<dyn ProgramRepository>,
    index: IndexCell,
    icon_cache: IconCache,
    platform: Arc<dyn Platform>,
}

impl ProgramsPlugin {
    pub fn new(
        options: ProgramsOptions,
        repository: Arc<dyn ProgramRepository>,
        platform: Arc<dyn Platform>,
    ) -> Self {
        Self {
            options: SharedOptions::new(options),
            repository,
            index: IndexCell::new(),
            icon_cache: Arc::new(Mutex::new(HashMap::new())),
            platform,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.options.get().enabled
    }

    pub fn get_all(&self) -> OrbitResult<Arc<[SearchResultItem]>> {
        self.index.snapshot(PluginType::Programs)
    }

    pub async fn refresh_index(&self) -> OrbitResult<()> {
        let options = self.options.get();
        let repository = Arc::clone(&self.repository);
        let icon_cache = Arc::clone(&self.icon_cache);

        let entries = tokio::task::spawn_blocking(move || {
            repository.load(&options).map(|programs| {
                programs
                    .into_iter()
                    .map(|program| program_item(program, &icon_cache))
                    .collect::<Vec<_>>()
            })
        })
        .await
        .map_err(|e| e.to_string())
        .and_then(|loaded| loaded)
        .map_err(|message| OrbitError::IndexRefresh {
            plugin: PluginType::Programs,
            message,
        })?;

        log::debug!("Indexed {} programs", entries.len());
        self.index.replace(entries);
        Ok(())
    }

    /// Forget resolved icon paths; the index itself stays valid.
    pub async fn clear_cache(&self) -> OrbitResult<()> {
        self.icon_cache.lock().clear();
        Ok(())
    }

    pub async fn execute(&self, item: &SearchResultItem, privileged: bool) -> OrbitResult<()> {
        ExecutionAction::LaunchApp {
            exec: item.execution_argument.clone(),
        }
        .perform(Arc::clone(&self.platform), privileged)
        .await
    }

    pub async fn open_location(&self, item: &SearchResultItem) -> OrbitResult<()> {
        ExecutionAction::OpenLocation {
            path: item.execution_argument.clone(),
        }
        .perform(Arc::clone(&self.platform), false)
        .await
    }

    pub fn update_config(&self, config: &Config, _translation: &TranslationSet) {
        self.options.set(config.programs.clone());
    }

    #[cfg(test)]
    fn cached_icons(&self) -> usize {
        self.icon_cache.lock().len()
    }
}
