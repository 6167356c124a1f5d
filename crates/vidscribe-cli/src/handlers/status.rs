//! Status command handler.

use vidscribe_core::{available_devices, check_transcriber_ready, installed_models, probe_program};
use vidscribe_runtime::YtDlpExtractor;

use crate::bootstrap::CliContext;
use crate::presentation::installed_mark;

/// Summarize what is installed and whether transcription can run.
pub fn execute(ctx: &CliContext) {
    let probe = probe_program(&ctx.paths.bin_dir);
    let kinds: Vec<_> = probe.kinds.iter().map(ToString::to_string).collect();
    println!(
        "Faster-Whisper:  {} {}",
        installed_mark(probe.installed),
        if kinds.is_empty() { "not installed".to_string() } else { kinds.join(", ") }
    );

    let devices: Vec<_> = available_devices(&probe).iter().map(ToString::to_string).collect();
    println!("Devices:         {}", devices.join(", "));
    println!("Device setting:  {}", ctx.settings.effective_device());

    let models = installed_models(&ctx.paths.models_dir);
    let names: Vec<_> = models.iter().map(ToString::to_string).collect();
    println!(
        "Models:          {}",
        if names.is_empty() { "none".to_string() } else { names.join(", ") }
    );
    println!(
        "Selected model:  {}",
        ctx.settings
            .faster_whisper_model
            .map_or_else(|| "none".to_string(), |m| m.to_string())
    );

    let yt_dlp = YtDlpExtractor::locate();
    println!(
        "yt-dlp:          {} {}",
        installed_mark(yt_dlp.is_ok()),
        yt_dlp.map_or_else(|e| e.to_string(), |x| x.program().display().to_string())
    );

    match check_transcriber_ready(
        &ctx.paths.bin_dir,
        &ctx.paths.models_dir,
        ctx.settings.faster_whisper_model,
    ) {
        Ok(()) => println!("\nReady to transcribe."),
        Err(e) => println!("\nNot ready: {e}"),
    }
}
