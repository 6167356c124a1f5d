//! Config command handler.
//!
//! Shows, updates and resets the persisted settings file.

use vidscribe_core::{Settings, SettingsUpdate, validate_settings};

use crate::bootstrap::CliContext;
use crate::commands::ConfigCommand;
use crate::error::CliError;
use crate::utils::input::prompt_confirmation;

pub fn execute(ctx: &mut CliContext, command: ConfigCommand) -> Result<(), CliError> {
    match command {
        ConfigCommand::Show => {
            println!("Settings file: {}", ctx.paths.settings_file.display());
            print_settings(&ctx.settings);
            Ok(())
        }
        ConfigCommand::Set {
            resolution,
            subtitles,
            use_cookie_file,
            device,
            models_dir,
            work_dir,
            language,
            vad_filter,
            vad_threshold,
            vad_method,
            ff_mdx_kim2,
            one_word,
            prompt,
        } => {
            let update = SettingsUpdate {
                download_resolution: resolution.map(Some),
                subtitle_download_type: subtitles.map(Some),
                use_cookie_file: use_cookie_file.map(Some),
                device: device.map(Some),
                model_dir_override: models_dir.map(Some),
                work_dir: work_dir.map(Some),
                faster_whisper_model: None,
                transcribe_language: language.map(Some),
                faster_whisper_vad_filter: vad_filter.map(Some),
                faster_whisper_vad_threshold: vad_threshold.map(Some),
                faster_whisper_vad_method: vad_method.map(Some),
                faster_whisper_ff_mdx_kim2: ff_mdx_kim2.map(Some),
                faster_whisper_one_word: one_word.map(Some),
                faster_whisper_prompt: prompt.map(|p| Some(p).filter(|p| !p.is_empty())),
            };
            set(ctx, &update)
        }
        ConfigCommand::Reset { force } => {
            if !force
                && !prompt_confirmation("Are you sure you want to reset all settings to defaults?", false)?
            {
                println!("Reset cancelled.");
                return Ok(());
            }
            ctx.settings = Settings::with_defaults();
            ctx.save()?;
            println!("✓ Settings reset to defaults.");
            Ok(())
        }
    }
}

/// Whether an update carries at least one change.
pub const fn has_changes(update: &SettingsUpdate) -> bool {
    update.download_resolution.is_some()
        || update.subtitle_download_type.is_some()
        || update.use_cookie_file.is_some()
        || update.faster_whisper_model.is_some()
        || update.model_dir_override.is_some()
        || update.device.is_some()
        || update.work_dir.is_some()
        || update.transcribe_language.is_some()
        || update.faster_whisper_vad_filter.is_some()
        || update.faster_whisper_vad_threshold.is_some()
        || update.faster_whisper_vad_method.is_some()
        || update.faster_whisper_ff_mdx_kim2.is_some()
        || update.faster_whisper_one_word.is_some()
        || update.faster_whisper_prompt.is_some()
}

fn set(ctx: &mut CliContext, update: &SettingsUpdate) -> Result<(), CliError> {
    if !has_changes(update) {
        println!("No settings provided. Use --help to see available options.");
        return Ok(());
    }

    let mut updated = ctx.settings.clone();
    updated.merge(update);
    validate_settings(&updated)?;

    ctx.settings = updated;
    ctx.save()?;
    println!("✓ Settings updated successfully:");
    print_settings(&ctx.settings);
    Ok(())
}

fn print_settings(settings: &Settings) {
    let or_unset = |v: Option<String>| v.unwrap_or_else(|| "(unset)".to_string());
    println!("  download_resolution:    {}", or_unset(settings.download_resolution.clone()));
    println!(
        "  subtitle_download_type: {}",
        or_unset(settings.subtitle_download_type.map(|m| m.to_string()))
    );
    println!("  use_cookie_file:        {}", settings.effective_use_cookie_file());
    println!(
        "  faster_whisper_model:   {}",
        or_unset(settings.faster_whisper_model.map(|m| m.to_string()))
    );
    println!("  model_dir_override:     {}", or_unset(settings.model_dir_override.clone()));
    println!("  device:                 {}", settings.effective_device());
    println!("  work_dir:               {}", or_unset(settings.work_dir.clone()));
    println!("  transcribe_language:    {}", settings.effective_transcribe_language());
    println!("  vad_filter:             {}", settings.effective_vad_filter());
    println!("  vad_threshold:          {:.2}", settings.effective_vad_threshold());
    println!("  vad_method:             {}", settings.effective_vad_method());
    println!("  ff_mdx_kim2:            {}", settings.effective_ff_mdx_kim2());
    println!("  one_word:               {}", settings.effective_one_word());
    println!(
        "  prompt:                 {}",
        or_unset(settings.effective_prompt().map(str::to_string))
    );
}
