//! Subcommand definitions.

use std::path::PathBuf;

use clap::Subcommand;
use vidscribe_core::{Device, ModelId, ProgramId, SubtitleMode, VadMethod};

/// Top-level commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Show every resolved path
    Paths,
    /// Show installed programs, models and the current selection
    Status,
    /// Faster-Whisper program builds
    Programs {
        #[command(subcommand)]
        command: ProgramsCommand,
    },
    /// Faster-Whisper models
    Models {
        #[command(subcommand)]
        command: ModelsCommand,
    },
    /// Download a video with its subtitle
    Video {
        /// Video page URL
        url: String,
        /// Directory that receives `videocap/<title>/`
        #[arg(long)]
        work_dir: Option<PathBuf>,
        /// Resolution cap (360p, 480p, 720p, 1080p, 4k)
        #[arg(long)]
        resolution: Option<String>,
        /// Subtitle tracks to write
        #[arg(long, value_parser = clap::value_parser!(SubtitleMode))]
        subtitles: Option<SubtitleMode>,
        /// Also save the thumbnail (as jpg)
        #[arg(long)]
        thumbnail: bool,
    },
    /// View or change settings
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

/// Program subcommands.
#[derive(Subcommand)]
pub enum ProgramsCommand {
    /// List program builds and whether they are installed
    List,
    /// Download and install a program build
    Install {
        /// `cpu` or `gpu`
        #[arg(value_parser = clap::value_parser!(ProgramId))]
        program: ProgramId,
    },
}

/// Model subcommands.
#[derive(Subcommand)]
pub enum ModelsCommand {
    /// List catalog models and whether they are installed
    List,
    /// Download a model
    Install {
        /// Model id, e.g. `large-v3`
        #[arg(value_parser = clap::value_parser!(ModelId))]
        model: ModelId,
        /// Re-download without asking when the model exists
        #[arg(long, conflicts_with = "keep")]
        yes: bool,
        /// Keep an existing model without asking
        #[arg(long)]
        keep: bool,
    },
    /// Select the model used for transcription
    Select {
        #[arg(value_parser = clap::value_parser!(ModelId))]
        model: ModelId,
    },
}

/// Settings subcommands.
#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show all current settings
    Show,
    /// Update settings
    Set {
        /// Resolution cap (360p, 480p, 720p, 1080p, 4k)
        #[arg(long)]
        resolution: Option<String>,
        /// Subtitle tracks to write
        #[arg(long, value_parser = clap::value_parser!(SubtitleMode))]
        subtitles: Option<SubtitleMode>,
        /// Pass the cookie file to the extractor
        #[arg(long)]
        use_cookie_file: Option<bool>,
        /// Compute device for transcription (cpu, cuda)
        #[arg(long, value_parser = clap::value_parser!(Device))]
        device: Option<Device>,
        /// Custom models directory
        #[arg(long)]
        models_dir: Option<String>,
        /// Default video work directory
        #[arg(long)]
        work_dir: Option<String>,
        /// Source language of the audio (e.g. en, ja, auto)
        #[arg(long)]
        language: Option<String>,
        /// Skip non-speech segments before transcribing
        #[arg(long)]
        vad_filter: Option<bool>,
        /// Speech probability threshold for VAD (0.0 to 1.0)
        #[arg(long)]
        vad_threshold: Option<f32>,
        /// VAD method (silero_v3, silero_v4, silero_v5, silero_v4_fw, pyannote_v3, pyannote_onnx_v3, auditok, webrtc)
        #[arg(long, value_parser = clap::value_parser!(VadMethod))]
        vad_method: Option<VadMethod>,
        /// Separate vocals with MDX-Net before transcribing
        #[arg(long)]
        ff_mdx_kim2: Option<bool>,
        /// Word-level timestamps
        #[arg(long)]
        one_word: Option<bool>,
        /// Initial prompt for the transcriber; an empty value clears it
        #[arg(long)]
        prompt: Option<String>,
    },
    /// Reset all settings to defaults
    Reset {
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
}
