//! The live editing session and the controller that every UI event goes through.

pub mod load;
pub mod worker;

use image::ImageFormat;

use crate::editor::{
    BrushOptions, Document, DrawingSurface, HistoryAction, StrokeHistory, ToolKind,
};
use crate::error::{EditorError, EditorResult};
use crate::export::{self, ExportedImage};
use crate::filter::{self, FilterChannel, FilterExpression, FilterPreset, FilterSettings};
use crate::geometry::{Color, DisplayPoint, DisplayViewport, ImageBounds};
use crate::notification::{NotificationKind, NotificationSink};
use crate::state::{PointerEvent, StrokeContext, StrokeEngine, StrokeOutcome, StrokeState};

pub use load::{DecodedImage, DecodedLoad, LoadOutcome, PendingLoad, DEFAULT_MAX_UPLOAD_BYTES};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditorConfig {
    pub max_upload_bytes: u64,
    pub brush: BrushOptions,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            brush: BrushOptions::default(),
        }
    }
}

/// Everything that describes the current edit.
#[derive(Debug, Default)]
pub struct Session {
    document: Option<Document>,
    filters: FilterSettings,
    tool: ToolKind,
    brush: BrushOptions,
    engine: StrokeEngine,
    history: StrokeHistory,
}

impl Session {
    fn with_brush(brush: BrushOptions) -> Self {
        Self {
            brush,
            ..Self::default()
        }
    }

    pub fn document(&self) -> Option<&Document> {
        self.document.as_ref()
    }

    pub fn filters(&self) -> FilterSettings {
        self.filters
    }

    pub fn tool(&self) -> ToolKind {
        self.tool
    }

    pub fn brush(&self) -> BrushOptions {
        self.brush
    }

    pub fn stroke_state(&self) -> StrokeState {
        self.engine.state()
    }

    pub fn history(&self) -> &StrokeHistory {
        &self.history
    }
}

/// Owns the [`Session`] and applies every editing operation to it.
pub struct SessionController<N: NotificationSink> {
    session: Session,
    config: EditorConfig,
    notifier: N,
    latest_generation: u64,
}

impl<N: NotificationSink> SessionController<N> {
    pub fn new(config: EditorConfig, notifier: N) -> Self {
        Self {
            session: Session::with_brush(config.brush),
            config,
            notifier,
            latest_generation: 0,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn has_image(&self) -> bool {
        self.session.document.is_some()
    }

    pub fn image_bounds(&self) -> Option<ImageBounds> {
        self.session.document.as_ref().map(Document::bounds)
    }

    pub fn source_format(&self) -> Option<ImageFormat> {
        self.session.document.as_ref().map(Document::format)
    }

    pub fn surface(&self) -> Option<&DrawingSurface> {
        self.session.document.as_ref().map(Document::surface)
    }

    pub fn filters(&self) -> FilterSettings {
        self.session.filters
    }

    /// Display-time transform for the current filters.
    pub fn filter_expression(&self) -> FilterExpression {
        filter::render(&self.session.filters)
    }

    /// Decodes and installs `bytes` in one step.
    pub fn load_image(&mut self, bytes: Vec<u8>) -> EditorResult<LoadOutcome> {
        let pending = self.begin_load(bytes)?;
        self.finish_load(pending.decode())
    }

    /// Accepts bytes for decoding and makes every earlier pending load stale.
    pub fn begin_load(&mut self, bytes: Vec<u8>) -> EditorResult<PendingLoad> {
        let size = u64::try_from(bytes.len()).unwrap_or(u64::MAX);
        load::check_upload_size(size, self.config.max_upload_bytes)?;
        self.latest_generation = self.latest_generation.saturating_add(1);
        tracing::debug!(generation = self.latest_generation, size, "image load started");
        Ok(PendingLoad::new(self.latest_generation, bytes))
    }

    /// Installs a decoded image as a brand new session unless a newer load superseded it.
    pub fn finish_load(&mut self, decoded: DecodedLoad) -> EditorResult<LoadOutcome> {
        if decoded.generation != self.latest_generation {
            tracing::debug!(
                generation = decoded.generation,
                latest = self.latest_generation,
                "discarding stale image load"
            );
            return Ok(LoadOutcome::Stale);
        }

        let DecodedImage { image, format } = decoded.result?;
        let (width, height) = image.dimensions();
        let document = Document::new(image, format, decoded.generation);
        self.session = Session {
            document: Some(document),
            ..Session::with_brush(self.session.brush)
        };
        tracing::info!(width, height, ?format, "image loaded");
        self.notifier.notify(NotificationKind::Success, "Image loaded");
        Ok(LoadOutcome::Installed { width, height })
    }

    pub fn set_filter(
        &mut self,
        channel: FilterChannel,
        value: f32,
    ) -> EditorResult<FilterSettings> {
        self.session.filters = self.session.filters.with(channel, value)?;
        tracing::debug!(
            channel = channel.name(),
            value = self.session.filters.get(channel),
            "filter set"
        );
        Ok(self.session.filters)
    }

    pub fn apply_preset(&mut self, preset: FilterPreset) -> FilterSettings {
        self.session.filters = preset.settings();
        tracing::info!(%preset, "preset applied");
        self.notifier.notify(NotificationKind::Success, &format!("Preset applied: {preset}"));
        self.session.filters
    }

    /// Applies a preset by name. Unknown names fail and leave the filters as they were.
    pub fn apply_preset_named(&mut self, name: &str) -> EditorResult<FilterSettings> {
        let preset = name.parse::<FilterPreset>()?;
        Ok(self.apply_preset(preset))
    }

    pub fn reset_filters(&mut self) -> FilterSettings {
        self.session.filters = FilterSettings::default();
        self.notifier.notify(NotificationKind::Info, "Filters reset");
        self.session.filters
    }

    pub fn enhance(&mut self) -> FilterSettings {
        self.session.filters = FilterPreset::Enhance.settings();
        self.notifier.notify(NotificationKind::Success, "Quality enhanced");
        self.session.filters
    }

    pub fn remove_background(&mut self) -> EditorResult<()> {
        self.not_implemented("background removal")
    }

    pub fn stylize(&mut self) -> EditorResult<()> {
        self.not_implemented("stylization")
    }

    fn not_implemented(&self, feature: &'static str) -> EditorResult<()> {
        tracing::info!(feature, "requested tool is not implemented");
        self.notifier.notify(NotificationKind::Info, &format!("{feature} is not available yet"));
        Err(EditorError::NotImplemented { feature })
    }

    pub fn set_tool(&mut self, tool: ToolKind) {
        self.session.tool = tool;
    }

    pub fn set_brush_size(&mut self, size: u8) {
        self.session.brush.set_size(size);
    }

    pub fn set_brush_color(&mut self, color: Color) {
        self.session.brush.set_color(color);
    }

    /// Routes one pointer event to the stroke engine. Without an image every event is ignored.
    pub fn pointer_event(
        &mut self,
        event: PointerEvent,
        viewport: DisplayViewport,
    ) -> StrokeOutcome {
        let context = StrokeContext {
            tool: self.session.tool,
            brush: self.session.brush,
            viewport,
        };
        let Session {
            document,
            engine,
            history,
            ..
        } = &mut self.session;
        let Some(document) = document.as_mut() else {
            return StrokeOutcome::Ignored;
        };

        let (_, surface) = document.parts_mut();
        let outcome = engine.handle(event, context, surface);
        if let StrokeOutcome::Finished(stroke) = &outcome {
            if stroke.has_marks() {
                history.record(stroke.clone());
            }
        }
        outcome
    }

    pub fn pointer_down(
        &mut self,
        point: DisplayPoint,
        viewport: DisplayViewport,
    ) -> StrokeOutcome {
        self.pointer_event(PointerEvent::Down(point), viewport)
    }

    pub fn pointer_move(
        &mut self,
        point: DisplayPoint,
        viewport: DisplayViewport,
    ) -> StrokeOutcome {
        self.pointer_event(PointerEvent::Move(point), viewport)
    }

    pub fn pointer_up(&mut self, viewport: DisplayViewport) -> StrokeOutcome {
        self.pointer_event(PointerEvent::Up, viewport)
    }

    pub fn pointer_leave(&mut self, viewport: DisplayViewport) -> StrokeOutcome {
        self.pointer_event(PointerEvent::Leave, viewport)
    }

    /// Discards every stroke and returns the surface to its seeded state.
    pub fn clear_drawing(&mut self) -> EditorResult<()> {
        let Session {
            document,
            engine,
            history,
            ..
        } = &mut self.session;
        let document = document.as_mut().ok_or(EditorError::NoImageLoaded)?;
        let (base, surface) = document.parts_mut();
        surface.clear(base)?;
        engine.reset();
        history.clear();
        tracing::info!("drawing cleared");
        Ok(())
    }

    pub fn undo_stroke(&mut self) -> EditorResult<bool> {
        self.step_history(HistoryAction::Undo)
    }

    pub fn redo_stroke(&mut self) -> EditorResult<bool> {
        self.step_history(HistoryAction::Redo)
    }

    fn step_history(&mut self, action: HistoryAction) -> EditorResult<bool> {
        let Session {
            document,
            engine,
            history,
            ..
        } = &mut self.session;
        let document = document.as_mut().ok_or(EditorError::NoImageLoaded)?;
        if !history.step(action) {
            tracing::debug!("{}", action.empty_message());
            return Ok(false);
        }
        let (base, surface) = document.parts_mut();
        engine.reset();
        history.rebuild(surface, base)?;
        tracing::debug!("{}", action.applied_message());
        Ok(true)
    }

    pub fn export(&self) -> EditorResult<ExportedImage> {
        let exported = export::flatten(self.session.document.as_ref(), &self.session.filters)?;
        self.notifier.notify(NotificationKind::Success, "Image exported");
        Ok(exported)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notification::testing::RecordingNotifier;
    use image::{Rgba, RgbaImage};
    use std::io::Cursor;

    const VIEW: DisplayViewport = DisplayViewport::new(64.0, 48.0);

    fn png_bytes(width: u32, height: u32, rgba: [u8; 4]) -> Vec<u8> {
        let mut bytes = Vec::new();
        RgbaImage::from_pixel(width, height, Rgba(rgba))
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .expect("encode png");
        bytes
    }

    fn controller() -> SessionController<RecordingNotifier> {
        SessionController::new(EditorConfig::default(), RecordingNotifier::default())
    }

    fn loaded() -> SessionController<RecordingNotifier> {
        let mut editor = controller();
        editor
            .load_image(png_bytes(64, 48, [90, 90, 90, 255]))
            .expect("valid png");
        editor
    }

    fn draw_line(editor: &mut SessionController<RecordingNotifier>, y: f32) {
        editor.pointer_down(DisplayPoint::new(4.0, y), VIEW);
        editor.pointer_move(DisplayPoint::new(30.0, y), VIEW);
        editor.pointer_up(VIEW);
    }

    #[test]
    fn load_installs_fresh_session_and_notifies() {
        let editor = loaded();
        assert!(editor.has_image());
        assert_eq!(editor.image_bounds(), Some(ImageBounds::new(64, 48)));
        assert_eq!(editor.source_format(), Some(ImageFormat::Png));
        assert_eq!(editor.session().tool(), ToolKind::None);
        assert_eq!(
            editor.notifier().last(),
            Some((NotificationKind::Success, "Image loaded".to_string()))
        );
    }

    #[test]
    fn oversized_upload_is_rejected_before_decode() {
        let mut editor = SessionController::new(
            EditorConfig {
                max_upload_bytes: 16,
                ..EditorConfig::default()
            },
            RecordingNotifier::default(),
        );
        let err = editor
            .load_image(vec![0; 17])
            .expect_err("too large");
        assert!(matches!(err, EditorError::FileTooLarge { size: 17, limit: 16 }));
        assert!(!editor.has_image());
    }

    #[test]
    fn failed_load_keeps_previous_image() {
        let mut editor = loaded();
        let err = editor
            .load_image(b"GIF89a-broken".to_vec())
            .expect_err("broken gif");
        assert!(matches!(err, EditorError::DecodeError { .. }));
        assert_eq!(editor.image_bounds(), Some(ImageBounds::new(64, 48)));
    }

    #[test]
    fn reload_replaces_surface_filters_and_tool() {
        let mut editor = loaded();
        editor.set_tool(ToolKind::Pen);
        editor.set_brush_size(6);
        draw_line(&mut editor, 10.0);
        editor.apply_preset(FilterPreset::Bw);
        assert!(editor.surface().expect("surface").ink().pixels().any(|p| p.0[3] > 0));

        editor
            .load_image(png_bytes(32, 24, [1, 2, 3, 255]))
            .expect("second image");
        let surface = editor.surface().expect("surface");
        assert_eq!(surface.bounds(), ImageBounds::new(32, 24));
        assert!(surface.ink().pixels().all(|p| p.0[3] == 0));
        assert!(editor.filters().is_original());
        assert_eq!(editor.session().tool(), ToolKind::None);
        assert_eq!(editor.session().brush().size, 6);
        assert!(editor.session().history().strokes().is_empty());
    }

    #[test]
    fn stale_decode_is_discarded() {
        let mut editor = controller();
        let first = editor
            .begin_load(png_bytes(10, 10, [255, 0, 0, 255]))
            .expect("within limit");
        let second = editor
            .begin_load(png_bytes(20, 20, [0, 255, 0, 255]))
            .expect("within limit");

        let second_done = editor.finish_load(second.decode()).expect("installs");
        assert_eq!(second_done, LoadOutcome::Installed { width: 20, height: 20 });
        let first_done = editor.finish_load(first.decode()).expect("stale is not an error");
        assert_eq!(first_done, LoadOutcome::Stale);
        assert_eq!(editor.image_bounds(), Some(ImageBounds::new(20, 20)));
    }

    #[test]
    fn stale_decode_error_is_discarded_too() {
        let mut editor = controller();
        let broken = editor.begin_load(b"not an image".to_vec()).expect("small");
        let good = editor
            .begin_load(png_bytes(8, 8, [0, 0, 0, 255]))
            .expect("small");
        editor.finish_load(good.decode()).expect("installs");
        assert_eq!(
            editor.finish_load(broken.decode()).expect("stale"),
            LoadOutcome::Stale
        );
    }

    #[test]
    fn worker_decode_installs_through_channel() {
        let mut editor = controller();
        let pending = editor
            .begin_load(png_bytes(12, 9, [5, 5, 5, 255]))
            .expect("small");
        let decoded = worker::spawn_decode(pending)
            .recv()
            .expect("worker should send a result");
        assert_eq!(
            editor.finish_load(decoded).expect("installs"),
            LoadOutcome::Installed { width: 12, height: 9 }
        );
    }

    #[test]
    fn set_filter_clamps_every_channel() {
        let mut editor = controller();
        for channel in FilterChannel::ALL {
            let (min, max) = channel.range();
            let high = editor.set_filter(channel, max * 3.0 + 1.0).expect("finite");
            assert_eq!(high.get(channel), max);
            let low = editor.set_filter(channel, -5.0).expect("finite");
            assert_eq!(low.get(channel), min);
        }
    }

    #[test]
    fn presets_replace_all_five_fields() {
        let mut editor = controller();
        editor.set_filter(FilterChannel::Blur, 7.5).expect("valid");
        editor.set_filter(FilterChannel::Grayscale, 64.0).expect("valid");
        for preset in FilterPreset::ALL {
            editor.set_filter(FilterChannel::Contrast, 3.0).expect("valid");
            assert_eq!(editor.apply_preset(preset), preset.settings());
        }
    }

    #[test]
    fn unknown_preset_name_fails_without_touching_filters() {
        let mut editor = controller();
        let vivid = editor.apply_preset_named("vivid").expect("known");
        let count = editor.notifier().count();
        let err = editor.apply_preset_named("sepia").expect_err("unknown");
        assert!(matches!(err, EditorError::UnknownPreset { .. }));
        assert_eq!(editor.filters(), vivid);
        assert_eq!(editor.notifier().count(), count);
    }

    #[test]
    fn reset_and_enhance_install_constants() {
        let mut editor = controller();
        assert_eq!(editor.enhance(), FilterPreset::Enhance.settings());
        assert!(editor.reset_filters().is_original());
        assert_eq!(
            editor.notifier().last(),
            Some((NotificationKind::Info, "Filters reset".to_string()))
        );
    }

    #[test]
    fn ai_tools_are_explicitly_not_implemented() {
        let mut editor = loaded();
        assert!(matches!(
            editor.remove_background(),
            Err(EditorError::NotImplemented { feature: "background removal" })
        ));
        assert!(matches!(
            editor.stylize(),
            Err(EditorError::NotImplemented { .. })
        ));
        assert_eq!(editor.notifier().last().map(|(kind, _)| kind), Some(NotificationKind::Info));
    }

    #[test]
    fn operations_without_image_report_no_image() {
        let mut editor = controller();
        assert!(matches!(editor.export(), Err(EditorError::NoImageLoaded)));
        assert!(matches!(editor.clear_drawing(), Err(EditorError::NoImageLoaded)));
        assert!(matches!(editor.undo_stroke(), Err(EditorError::NoImageLoaded)));
        editor.set_tool(ToolKind::Pen);
        assert_eq!(
            editor.pointer_down(DisplayPoint::new(1.0, 1.0), VIEW),
            StrokeOutcome::Ignored
        );
    }

    #[test]
    fn clear_drawing_restores_seeded_surface() {
        let mut editor = loaded();
        let seeded = editor.surface().expect("surface").clone();
        editor.set_tool(ToolKind::Eraser);
        draw_line(&mut editor, 20.0);
        assert_ne!(editor.surface().expect("surface"), &seeded);

        editor.clear_drawing().expect("image loaded");
        assert_eq!(editor.surface().expect("surface"), &seeded);
        assert!(!editor.session().history().can_undo());
    }

    #[test]
    fn taps_are_not_recorded_in_history() {
        let mut editor = loaded();
        editor.set_tool(ToolKind::Pen);
        editor.pointer_down(DisplayPoint::new(5.0, 5.0), VIEW);
        editor.pointer_up(VIEW);
        assert!(!editor.session().history().can_undo());
    }

    #[test]
    fn undo_and_redo_replay_strokes() {
        let mut editor = loaded();
        editor.set_tool(ToolKind::Pen);
        editor.set_brush_color(Color::new(0, 0, 255));
        draw_line(&mut editor, 10.0);
        let after_first = editor.surface().expect("surface").clone();
        draw_line(&mut editor, 30.0);
        let after_second = editor.surface().expect("surface").clone();

        assert!(editor.undo_stroke().expect("image"));
        assert_eq!(editor.surface().expect("surface"), &after_first);
        assert!(editor.redo_stroke().expect("image"));
        assert_eq!(editor.surface().expect("surface"), &after_second);
        assert!(!editor.redo_stroke().expect("image"));
    }

    #[test]
    fn export_does_not_mutate_surface() {
        let mut editor = loaded();
        editor.set_tool(ToolKind::Pen);
        draw_line(&mut editor, 12.0);
        let before = editor.surface().expect("surface").clone();

        let plain = editor.export().expect("export");
        editor.apply_preset(FilterPreset::Vintage);
        let vintage = editor.export().expect("export");
        assert_ne!(plain.bytes, vintage.bytes);
        assert_eq!(editor.surface().expect("surface"), &before);
        assert_eq!(
            editor.notifier().last(),
            Some((NotificationKind::Success, "Image exported".to_string()))
        );
    }
}
