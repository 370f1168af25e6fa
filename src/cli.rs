//! Headless batch mode: load one image, adjust it, write the flattened export.
//!
//! ```text
//! photo-editor --input photo.jpg --output edited.png --preset vivid
//! photo-editor -i photo.png --brightness 120 --blur 1.5
//! ```

use std::path::{Path, PathBuf};

use clap::Parser;

use crate::config::{self, AppConfig};
use crate::error::{AppResult, EditorError};
use crate::filter::FilterChannel;
use crate::notification::{DesktopNotifier, LogNotifier, NotificationKind, NotificationSink};
use crate::session::{worker, LoadOutcome, SessionController};
use crate::storage::{self, StorageService};

const EDITED_SUFFIX: &str = "-edited";

#[derive(Parser, Debug)]
#[command(
    name = "photo-editor",
    about = "Apply tonal filters to an image and export a flattened PNG"
)]
pub struct CliArgs {
    /// Source image (JPEG, PNG, GIF, WebP or BMP).
    #[arg(short, long, value_name = "FILE")]
    pub input: PathBuf,

    /// Destination PNG. Defaults to ~/Pictures/<input stem>-edited.png.
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Preset applied before any channel override: original, vintage, vivid, bw, soft, enhance.
    #[arg(short, long, value_name = "NAME")]
    pub preset: Option<String>,

    /// Brightness percent (0-200).
    #[arg(long)]
    pub brightness: Option<f32>,

    /// Contrast percent (0-200).
    #[arg(long)]
    pub contrast: Option<f32>,

    /// Saturation percent (0-200).
    #[arg(long)]
    pub saturate: Option<f32>,

    /// Gaussian blur radius in pixels (0-10, 0.5 steps).
    #[arg(long)]
    pub blur: Option<f32>,

    /// Grayscale percent (0-100).
    #[arg(long)]
    pub grayscale: Option<f32>,

    /// Show desktop notifications regardless of config.json.
    #[arg(long)]
    pub notify: bool,
}

impl CliArgs {
    fn channel_overrides(&self) -> impl Iterator<Item = (FilterChannel, f32)> {
        [
            (FilterChannel::Brightness, self.brightness),
            (FilterChannel::Contrast, self.contrast),
            (FilterChannel::Saturate, self.saturate),
            (FilterChannel::Blur, self.blur),
            (FilterChannel::Grayscale, self.grayscale),
        ]
        .into_iter()
        .filter_map(|(channel, value)| value.map(|value| (channel, value)))
    }
}

pub fn run(args: &CliArgs) -> AppResult<PathBuf> {
    let app_config = config::load_app_config();
    let notifier: Box<dyn NotificationSink> = if args.notify || app_config.desktop_notifications {
        Box::new(DesktopNotifier)
    } else {
        Box::new(LogNotifier)
    };

    let result = process(args, &app_config, notifier.as_ref());
    if let Err(err) = &result {
        notifier.notify(NotificationKind::Error, &err.to_string());
    }
    result
}

fn process(
    args: &CliArgs,
    app_config: &AppConfig,
    notifier: &dyn NotificationSink,
) -> AppResult<PathBuf> {
    let editor_config = app_config.editor_config();
    let bytes = storage::read_source(&args.input, editor_config.max_upload_bytes)?;

    let mut editor = SessionController::new(editor_config, notifier);
    let pending = editor.begin_load(bytes)?;
    let decoded = worker::spawn_decode(pending)
        .recv()
        .map_err(|_| EditorError::DecodeError {
            message: "decode worker exited without a result".to_string(),
        })?;
    if let LoadOutcome::Installed { width, height } = editor.finish_load(decoded)? {
        tracing::info!(input = %args.input.display(), width, height, "source decoded");
    }

    if let Some(name) = args.preset.as_deref() {
        editor.apply_preset_named(name)?;
    }
    for (channel, value) in args.channel_overrides() {
        editor.set_filter(channel, value)?;
    }
    tracing::info!(filter = %editor.filter_expression(), "filters resolved");

    let exported = editor.export()?;
    let target = match &args.output {
        Some(path) => {
            storage::write_export(&exported, path)?;
            path.clone()
        }
        None => StorageService::with_default_paths()?
            .save_export(&exported, &default_export_name(&args.input))?,
    };
    Ok(target)
}

fn default_export_name(input: &Path) -> String {
    let stem = input
        .file_stem()
        .and_then(|stem| stem.to_str())
        .filter(|stem| !stem.is_empty())
        .unwrap_or("export");
    format!("{stem}{EDITED_SUFFIX}")
}
