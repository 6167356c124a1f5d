//! CLI bootstrap - the composition root.
//!
//! The only place where concrete fetchers, extractors and mirrors are
//! instantiated. Handlers receive a [`CliContext`] and ask it for fully
//! wired orchestrators.

use std::sync::Arc;

use tracing::{debug, warn};
use vidscribe_core::{ResolvedPaths, Settings, load_settings, save_settings};
use vidscribe_download::{
    AutoExtractor, HttpClientConfig, HttpFetcher, ModelScopeMirror, SevenZipExtractor,
};
use vidscribe_runtime::{
    InstallLayout, InstallPorts, InstallPrompt, InstallView, InstallationOrchestrator,
    VideoDownloadOrchestrator, VideoSettings, YtDlpExtractor,
};

use crate::error::CliError;

/// Bootstrap configuration for the CLI.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    /// `--models-dir` flag; beats the settings override.
    pub models_dir: Option<String>,
}

/// Settings and paths for one CLI invocation.
#[derive(Debug, Clone)]
pub struct CliContext {
    pub paths: ResolvedPaths,
    pub settings: Settings,
}

/// Load settings and resolve every path.
pub fn bootstrap(config: &CliConfig) -> Result<CliContext, CliError> {
    let settings_file = vidscribe_core::settings_file_path()?;
    let settings = load_settings(&settings_file)?;

    let models_dir = config
        .models_dir
        .as_deref()
        .or(settings.model_dir_override.as_deref());
    let paths = ResolvedPaths::resolve_with_models_dir(models_dir)?;
    debug!(models_dir = %paths.models_dir.display(), source = ?paths.models_source, "paths resolved");

    Ok(CliContext { paths, settings })
}

impl CliContext {
    pub fn layout(&self) -> InstallLayout {
        InstallLayout {
            bin_dir: self.paths.bin_dir.clone(),
            models_dir: self.paths.models_dir.clone(),
        }
    }

    /// Persist the current settings.
    pub fn save(&self) -> Result<(), CliError> {
        save_settings(&self.paths.settings_file, &self.settings)?;
        Ok(())
    }

    fn http_fetcher() -> Result<Arc<HttpFetcher>, CliError> {
        HttpFetcher::new(&HttpClientConfig::default())
            .map(Arc::new)
            .map_err(|e| CliError::Download(e.to_string()))
    }

    /// Wire the install orchestrator with the HTTP fetcher, archive
    /// extractor and `ModelScope` mirror.
    pub fn install_orchestrator(
        &self,
        view: Arc<dyn InstallView>,
        prompt: Arc<dyn InstallPrompt>,
    ) -> Result<InstallationOrchestrator, CliError> {
        let fetcher = Self::http_fetcher()?;
        let mirror =
            ModelScopeMirror::new(fetcher.client().clone()).with_idle_timeout(fetcher.idle_timeout());

        let extractor = match SevenZipExtractor::locate() {
            Ok(seven_zip) => AutoExtractor::new().with_seven_zip(seven_zip),
            Err(e) => {
                warn!(error = %e, "7-Zip not found, .7z bundles cannot be installed");
                AutoExtractor::new()
            }
        };

        let ports = InstallPorts {
            fetcher,
            extractor: Arc::new(extractor),
            mirror: Arc::new(mirror),
            view,
            prompt,
        };
        Ok(InstallationOrchestrator::new(self.layout(), ports)
            .with_selected_model(self.settings.faster_whisper_model))
    }

    /// Wire the video orchestrator around `yt-dlp`.
    pub fn video_orchestrator(&self, settings: VideoSettings) -> Result<VideoDownloadOrchestrator, CliError> {
        let extractor = YtDlpExtractor::locate()?;
        let fetcher = Self::http_fetcher()?;
        Ok(VideoDownloadOrchestrator::new(Arc::new(extractor), fetcher, settings))
    }

    /// Video preferences from settings with the cookie file location filled in.
    pub fn video_settings(&self) -> VideoSettings {
        VideoSettings::from_settings(&self.settings, Some(self.paths.cookie_file.clone()))
    }
}
