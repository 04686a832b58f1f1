//! Runs `> command` input through the shell.

use std::sync::Arc;

use super::SharedOptions;
use crate::config::{CommandLineOptions, Config};
use crate::core::item::{icons, IconRef, PluginType, SearchResultItem};
use crate::error::OrbitResult;
use crate::executor::ExecutionAction;
use crate::i18n::TranslationSet;
use crate::platform::Platform;

pub struct CommandLinePlugin {
    options: SharedOptions<CommandLineOptions>,
    translation: SharedOptions<TranslationSet>,
    platform: Arc<dyn Platform>,
}

impl CommandLinePlugin {
    pub fn new(
        options: CommandLineOptions,
        translation: TranslationSet,
        platform: Arc<dyn Platform>,
    ) -> Self {
        Self {
            options: SharedOptions::new(options),
            translation: SharedOptions::new(translation),
            platform,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.options.get().enabled
    }

    pub fn is_valid(&self, input: &str) -> bool {
        let options = self.options.get();
        !options.prefix.is_empty() && input.starts_with(options.prefix.as_str())
    }

    pub fn get_all(&self) -> OrbitResult<Arc<[SearchResultItem]>> {
        Ok(Arc::from(Vec::new()))
    }

    pub fn search(&self, input: &str) -> OrbitResult<Vec<SearchResultItem>> {
        let options = self.options.get();
        let command = match input.strip_prefix(options.prefix.as_str()) {
            Some(rest) => rest.trim(),
            None => return Ok(Vec::new()),
        };
        if command.is_empty() {
            return Ok(Vec::new());
        }

        let translation = self.translation.get();
        Ok(vec![SearchResultItem::new(
            translation.run_command_label(command),
            command,
            PluginType::CommandLine,
        )
        .with_icon(IconRef::Svg(icons::TERMINAL.to_string()))])
    }

    pub async fn execute(&self, item: &SearchResultItem, privileged: bool) -> OrbitResult<()> {
        ExecutionAction::RunShellCommand {
            command: item.execution_argument.clone(),
        }
        .perform(Arc::clone(&self.platform), privileged)
        .await
    }

    pub fn update_config(&self, config: &Config, translation: &TranslationSet) {
        self.options.set(config.command_line.clone());
        self.translation.set(translation.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::testing::RecordingPlatform;

    fn plugin(platform: Arc<RecordingPlatform>) -> CommandLinePlugin {
        CommandLinePlugin::new(CommandLineOptions::default(), TranslationSet::english(), platform)
    }

    #[test]
    fn test_prefix_triggers() {
        let plugin = plugin(Arc::new(RecordingPlatform::default()));
        assert!(plugin.is_valid(">ls"));
        assert!(plugin.is_valid("> ls -la"));
        assert!(!plugin.is_valid("ls"));
    }

    #[test]
    fn test_search_strips_prefix() {
        let plugin = plugin(Arc::new(RecordingPlatform::default()));
        let results = plugin.search(">  ls -la ").unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].execution_argument, "ls -la");
        assert_eq!(results[0].name, "Run 'ls -la'");
    }

    #[test]
    fn test_bare_prefix_yields_nothing() {
        let plugin = plugin(Arc::new(RecordingPlatform::default()));
        assert!(plugin.search(">").unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_execute_passes_privilege() {
        let platform = Arc::new(RecordingPlatform::default());
        let plugin = plugin(platform.clone());
        let item = plugin.search(">whoami").unwrap().remove(0);

        plugin.execute(&item, true).await.unwrap();

        assert_eq!(platform.calls(), vec!["shell:whoami:true"]);
    }
}
