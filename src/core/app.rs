//! Studio: drives the mask capture and the edit session from one message loop

use std::path::PathBuf;

use anyhow::Context;
use futures::FutureExt;
use futures::future::BoxFuture;

use crate::config::StudioConfig;
use crate::generation::{Generator, prompts};
use crate::mask::{MaskCapture, MaskChange};
use crate::session::{
    EditSession, MaskMsg, Msg, PointerEvent, SourceMsg, SubmitMsg, SubmitOptions,
};

/// Work the front end must drive; its output is fed back into `update`
pub type Task = BoxFuture<'static, Msg>;

pub struct Studio {
    config: StudioConfig,
    session: EditSession,
    mask: MaskCapture,
    online: bool,
    generator: Box<dyn Generator>,
}

impl Studio {
    pub fn new(config: StudioConfig, generator: impl Generator + 'static) -> Self {
        let session = EditSession::new(config.mask_on_select);
        Self {
            config,
            session,
            mask: MaskCapture::default(),
            online: true,
            generator: Box::new(generator),
        }
    }

    pub fn config(&self) -> &StudioConfig {
        &self.config
    }

    pub fn session(&self) -> &EditSession {
        &self.session
    }

    pub fn mask(&self) -> &MaskCapture {
        &self.mask
    }

    pub fn is_online(&self) -> bool {
        self.online
    }

    pub fn update(&mut self, msg: Msg) -> Option<Task> {
        match msg {
            Msg::Source(m) => {
                self.update_source(m);
                None
            }
            Msg::SelectHistory(id) => {
                match self.session.select_history_node(id) {
                    Ok(true) => {
                        // Keep the drawing in sync with the dropped mask
                        self.mask.clear_mask();
                    }
                    Ok(false) => {}
                    Err(err) => log::warn!("Cannot select result: {}", err),
                }
                None
            }
            Msg::Mask(m) => {
                self.update_mask(m);
                None
            }
            Msg::PanelDragStart {
                pointer,
                panel,
                container,
            } => {
                if self.mask.is_active() {
                    self.mask.panel_mut().drag_start(pointer, panel, container);
                }
                None
            }
            Msg::WindowPointer { event, container } => {
                let panel = self.mask.panel_mut();
                if !panel.is_dragging() {
                    return None;
                }
                match event {
                    PointerEvent::Moved(p) => {
                        panel.drag_move(p, container);
                    }
                    PointerEvent::Released(_) | PointerEvent::Left => panel.drag_end(),
                    PointerEvent::Pressed(_) => {}
                }
                None
            }
            Msg::Submit(m) => self.update_submit(m),
            Msg::Generated(ticket, outcome) => {
                self.session.complete(ticket, outcome);
                None
            }
            Msg::Connectivity(online) => {
                if self.online != online {
                    log::info!("Connectivity changed: online = {}", online);
                }
                self.online = online;
                None
            }
        }
    }

    fn update_source(&mut self, msg: SourceMsg) {
        match msg {
            SourceMsg::Selected(image) => {
                self.session.set_source_image(image);
                self.mask.source_changed(None);
            }
            SourceMsg::Reset => {
                self.session.reset();
                self.mask.exit_mask_mode(false);
                self.mask.source_changed(None);
            }
            SourceMsg::Promote(id) => match self.session.promote_result_as_source(id) {
                Ok(()) => self.mask.source_changed(None),
                Err(err) => log::warn!("Cannot promote result: {}", err),
            },
        }
    }

    fn update_mask(&mut self, msg: MaskMsg) {
        match msg {
            MaskMsg::Enter => self.mask.enter_mask_mode(),
            MaskMsg::Done => {
                if let Some(change) = self.mask.exit_mask_mode(true) {
                    self.apply_mask_change(change);
                }
            }
            MaskMsg::Cancel => {
                if let Some(change) = self.mask.exit_mask_mode(false) {
                    self.apply_mask_change(change);
                }
            }
            MaskMsg::Clear => {
                let change = self.mask.clear_mask();
                self.apply_mask_change(change);
            }
            MaskMsg::Layout(layout) => self.mask.set_layout(layout),
            MaskMsg::Canvas(event) => {
                // The panel owns the pointer while it is being dragged
                if self.mask.panel().is_dragging() {
                    return;
                }
                match event {
                    PointerEvent::Pressed(p) => self.mask.stroke_begin(p),
                    PointerEvent::Moved(p) => {
                        if self.mask.is_drawing() {
                            self.mask.stroke_extend(p);
                        }
                    }
                    PointerEvent::Released(_) | PointerEvent::Left => {
                        if let Some(change) = self.mask.stroke_end() {
                            self.apply_mask_change(change);
                        }
                    }
                }
            }
        }
    }

    fn apply_mask_change(&mut self, change: MaskChange) {
        match change {
            MaskChange::Updated(mask) => {
                log::debug!("Mask updated, {} pixels selected", mask.selected_pixels());
                self.session.set_mask(Some(mask));
            }
            MaskChange::Cleared => self.session.set_mask(None),
        }
    }

    fn update_submit(&mut self, msg: SubmitMsg) -> Option<Task> {
        let default_resolution = self.config.default_resolution;
        let (prompt, options) = match msg {
            SubmitMsg::Edit { prompt, resolution } => (
                prompt,
                SubmitOptions::edit(resolution.unwrap_or(default_resolution)),
            ),
            SubmitMsg::Generate {
                prompt,
                resolution,
                aspect_ratio,
            } => (
                prompt,
                SubmitOptions::scratch(
                    resolution.unwrap_or(default_resolution),
                    aspect_ratio.unwrap_or(self.config.default_aspect_ratio),
                ),
            ),
        };

        let dispatch = match self.session.begin_submit(&prompt, options, self.online) {
            Ok(dispatch) => dispatch,
            Err(err) => {
                log::debug!("Submission not dispatched: {}", err);
                return None;
            }
        };

        let ticket = dispatch.ticket;
        let request = self.generator.generate(dispatch.request);
        Some(async move { Msg::Generated(ticket, request.await) }.boxed())
    }

    /// Suggestions for the prompt box, depending on whether a mask is set
    pub fn prompt_suggestions(&self) -> &'static [&'static str] {
        prompts::suggestions(self.session.mask().is_some())
    }

    /// Write the displayed result to the configured export directory
    pub fn export_active(&self) -> anyhow::Result<PathBuf> {
        let node = self
            .session
            .active_node()
            .context("No result is selected")?;
        let dir = self
            .config
            .export_dir()
            .context("Could not determine export directory")?;
        node.export_to(&dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AspectRatio, MaskSelectionPolicy, Resolution};
    use crate::domain::{EncodedImage, ImageLayout, Point, Rect, Source, SourceImage};
    use crate::generation::testing::ScriptedGenerator;
    use crate::generation::{GenerationError, GenerationResponse};
    use crate::session::RequestState;

    fn photo() -> SourceImage {
        SourceImage::new(EncodedImage::new(vec![0xFF, 0xD8, 0xFF], "image/jpeg"))
    }

    fn result(tag: u8) -> EncodedImage {
        EncodedImage::new(vec![0x89, b'P', b'N', b'G', tag], "image/png")
    }

    fn edit(prompt: &str) -> Msg {
        Msg::Submit(SubmitMsg::Edit {
            prompt: prompt.into(),
            resolution: Some(Resolution::OneK),
        })
    }

    fn studio_with(
        outcomes: Vec<Result<GenerationResponse, GenerationError>>,
    ) -> (Studio, ScriptedGenerator) {
        let generator = ScriptedGenerator::new(outcomes);
        let studio = Studio::new(StudioConfig::default(), generator.clone());
        (studio, generator)
    }

    /// Paint the left half of a 200x100 image with horizontal strokes
    fn paint_left_half(studio: &mut Studio) {
        studio.update(Msg::Mask(MaskMsg::Layout(ImageLayout::unscaled(200, 100))));
        studio.update(Msg::Mask(MaskMsg::Enter));
        for y in [10.0, 30.0, 50.0, 70.0, 90.0] {
            studio.update(Msg::canvas(PointerEvent::Pressed(Point::new(0.0, y))));
            studio.update(Msg::canvas(PointerEvent::Moved(Point::new(45.0, y))));
            studio.update(Msg::canvas(PointerEvent::Moved(Point::new(90.0, y))));
            studio.update(Msg::canvas(PointerEvent::Released(Point::new(90.0, y))));
        }
    }

    async fn run(studio: &mut Studio, task: Option<Task>) {
        let task = task.expect("a generation task");
        let msg = task.await;
        assert!(studio.update(msg).is_none());
    }

    #[tokio::test]
    async fn test_masked_edit_flow() {
        let (mut studio, generator) = studio_with(vec![Ok(GenerationResponse::image(result(1)))]);
        studio.update(Msg::Source(SourceMsg::Selected(photo())));
        paint_left_half(&mut studio);
        studio.update(Msg::Mask(MaskMsg::Done));

        let mask = studio.session().mask().cloned().unwrap();
        assert_eq!(mask.raster().get_pixel(50, 50).0, [255, 255, 255, 255]);
        assert_eq!(mask.raster().get_pixel(150, 50).0, [0, 0, 0, 255]);
        assert_eq!(studio.prompt_suggestions()[0], "Make it red");

        let task = studio.update(edit("add flowers"));
        assert!(studio.session().is_pending());
        run(&mut studio, task).await;

        let sent = generator.requests();
        assert_eq!(sent[0].prompt, "Apply this change to the masked area: add flowers");
        assert_eq!(sent[0].mask.as_ref(), Some(mask.encoded()));
        assert_eq!(studio.session().state(), &RequestState::Succeeded);
        assert_eq!(studio.session().history().len(), 1);
        assert_eq!(studio.session().active_node().unwrap().prompt, "add flowers");
    }

    #[tokio::test]
    async fn test_second_submit_while_pending_is_dropped() {
        let (mut studio, generator) = studio_with(vec![Ok(GenerationResponse::image(result(1)))]);
        studio.update(Msg::Source(SourceMsg::Selected(photo())));

        let first = studio.update(edit("one"));
        assert!(first.is_some());
        assert!(studio.update(edit("two")).is_none());
        assert_eq!(generator.dispatch_count(), 1);

        run(&mut studio, first).await;
        assert_eq!(studio.session().history().len(), 1);
    }

    #[test]
    fn test_offline_submit_fails_without_dispatch() {
        let (mut studio, generator) = studio_with(vec![]);
        studio.update(Msg::Source(SourceMsg::Selected(photo())));
        studio.update(Msg::Connectivity(false));
        assert!(!studio.is_online());

        assert!(studio.update(edit("anything")).is_none());
        assert_eq!(
            studio.session().error(),
            Some("You are currently offline. Please reconnect.")
        );
        assert_eq!(generator.dispatch_count(), 0);
    }

    #[tokio::test]
    async fn test_new_source_discards_mask_and_late_result() {
        let (mut studio, _generator) = studio_with(vec![Ok(GenerationResponse::image(result(1)))]);
        studio.update(Msg::Source(SourceMsg::Selected(photo())));
        paint_left_half(&mut studio);
        assert!(studio.session().mask().is_some());

        let task = studio.update(edit("slow one"));
        studio.update(Msg::Source(SourceMsg::Selected(photo())));
        assert!(studio.session().mask().is_none());
        // Still in mask mode, waiting for the new image's layout
        assert!(studio.mask().is_active());
        assert!(studio.mask().buffer().is_none());

        run(&mut studio, task).await;
        assert!(studio.session().history().is_empty());
        assert_eq!(studio.session().state(), &RequestState::Idle);

        studio.update(Msg::Mask(MaskMsg::Layout(ImageLayout::unscaled(64, 64))));
        assert!(studio.mask().buffer().is_some_and(|b| b.is_empty()));
    }

    #[tokio::test]
    async fn test_promote_and_reset() {
        let (mut studio, _generator) = studio_with(vec![Ok(GenerationResponse::image(result(4)))]);
        studio.update(Msg::Source(SourceMsg::Selected(photo())));
        let task = studio.update(edit("make it red"));
        run(&mut studio, task).await;

        let id = studio.session().history().active_id().unwrap();
        studio.update(Msg::Source(SourceMsg::Promote(id)));
        assert!(studio.session().history().is_empty());
        assert_eq!(
            studio.session().source().and_then(Source::payload),
            Some(&result(4))
        );

        studio.update(Msg::Mask(MaskMsg::Enter));
        studio.update(Msg::Source(SourceMsg::Reset));
        assert!(studio.session().source().is_none());
        assert!(!studio.mask().is_active());
    }

    #[tokio::test]
    async fn test_scratch_generation_becomes_genesis() {
        let (mut studio, generator) = studio_with(vec![Ok(GenerationResponse::image(result(2)))]);
        let task = studio.update(Msg::Submit(SubmitMsg::Generate {
            prompt: "a lighthouse at dusk".into(),
            resolution: Some(Resolution::FourK),
            aspect_ratio: Some(AspectRatio::Portrait),
        }));
        run(&mut studio, task).await;

        let sent = generator.requests();
        assert!(sent[0].source.is_none());
        assert_eq!(sent[0].aspect_ratio, Some(AspectRatio::Portrait));
        assert_eq!(studio.session().source(), Some(&Source::Genesis));
    }

    #[tokio::test]
    async fn test_unset_options_use_configured_defaults() {
        let generator = ScriptedGenerator::new([
            Ok(GenerationResponse::image(result(1))),
            Ok(GenerationResponse::image(result(2))),
        ]);
        let config = StudioConfig {
            default_resolution: Resolution::TwoK,
            default_aspect_ratio: AspectRatio::Landscape,
            ..Default::default()
        };
        let mut studio = Studio::new(config, generator.clone());

        let task = studio.update(Msg::Submit(SubmitMsg::Generate {
            prompt: "a harbor".into(),
            resolution: None,
            aspect_ratio: None,
        }));
        run(&mut studio, task).await;

        studio.update(Msg::Source(SourceMsg::Selected(photo())));
        let task = studio.update(Msg::Submit(SubmitMsg::Edit {
            prompt: "add boats".into(),
            resolution: None,
        }));
        run(&mut studio, task).await;

        let sent = generator.requests();
        assert_eq!(sent[0].resolution, Resolution::TwoK);
        assert_eq!(sent[0].aspect_ratio, Some(AspectRatio::Landscape));
        assert_eq!(sent[1].resolution, Resolution::TwoK);
        assert_eq!(sent[1].aspect_ratio, None);
    }

    #[test]
    fn test_edit_without_source_is_not_dispatched() {
        let (mut studio, generator) = studio_with(vec![]);
        assert!(studio.update(edit("a cat")).is_none());
        assert_eq!(generator.dispatch_count(), 0);
        assert_eq!(studio.session().state(), &RequestState::Idle);
    }

    #[test]
    fn test_cancel_clears_mask() {
        let (mut studio, _generator) = studio_with(vec![]);
        studio.update(Msg::Source(SourceMsg::Selected(photo())));
        paint_left_half(&mut studio);
        studio.update(Msg::Mask(MaskMsg::Cancel));
        assert!(studio.session().mask().is_none());
        assert!(!studio.mask().is_active());
    }

    #[test]
    fn test_clear_button_drops_mask() {
        let (mut studio, _generator) = studio_with(vec![]);
        studio.update(Msg::Source(SourceMsg::Selected(photo())));
        paint_left_half(&mut studio);
        studio.update(Msg::Mask(MaskMsg::Clear));
        assert!(studio.session().mask().is_none());
        assert!(studio.mask().buffer().is_some_and(|b| b.is_empty()));
        assert!(studio.mask().is_active());
    }

    #[test]
    fn test_pointer_leaving_canvas_ends_stroke() {
        let (mut studio, _generator) = studio_with(vec![]);
        studio.update(Msg::Source(SourceMsg::Selected(photo())));
        studio.update(Msg::Mask(MaskMsg::Layout(ImageLayout::unscaled(100, 100))));
        studio.update(Msg::Mask(MaskMsg::Enter));

        studio.update(Msg::canvas(PointerEvent::Pressed(Point::new(50.0, 50.0))));
        assert!(studio.mask().is_drawing());
        studio.update(Msg::canvas(PointerEvent::Left));
        assert!(!studio.mask().is_drawing());
        assert!(studio.session().mask().is_some());

        // Moves without a press do not draw
        studio.update(Msg::canvas(PointerEvent::Moved(Point::new(10.0, 10.0))));
        let mask = studio.session().mask().unwrap();
        assert_eq!(mask.raster().get_pixel(10, 10).0, [0, 0, 0, 255]);
    }

    #[test]
    fn test_panel_drag_captures_pointer() {
        let (mut studio, _generator) = studio_with(vec![]);
        studio.update(Msg::Source(SourceMsg::Selected(photo())));
        studio.update(Msg::Mask(MaskMsg::Layout(ImageLayout::unscaled(400, 300))));
        studio.update(Msg::Mask(MaskMsg::Enter));

        let container = Rect::new(0.0, 0.0, 400.0, 300.0);
        studio.update(Msg::PanelDragStart {
            pointer: Point::new(110.0, 20.0),
            panel: Rect::new(100.0, 10.0, 120.0, 30.0),
            container,
        });
        assert!(studio.mask().panel().is_dragging());

        // Canvas input is ignored during the drag
        studio.update(Msg::canvas(PointerEvent::Pressed(Point::new(200.0, 200.0))));
        assert!(!studio.mask().is_drawing());

        studio.update(Msg::WindowPointer {
            event: PointerEvent::Moved(Point::new(1000.0, 1000.0)),
            container,
        });
        assert_eq!(studio.mask().panel().position(), Some(Point::new(360.0, 280.0)));

        studio.update(Msg::WindowPointer {
            event: PointerEvent::Left,
            container,
        });
        assert!(!studio.mask().panel().is_dragging());

        // Moves after release do nothing
        studio.update(Msg::WindowPointer {
            event: PointerEvent::Moved(Point::new(0.0, 0.0)),
            container,
        });
        assert_eq!(studio.mask().panel().position(), Some(Point::new(360.0, 280.0)));

        studio.update(Msg::Mask(MaskMsg::Done));
        assert_eq!(studio.mask().panel().position(), None);
    }

    #[test]
    fn test_panel_drag_requires_mask_mode() {
        let (mut studio, _generator) = studio_with(vec![]);
        studio.update(Msg::PanelDragStart {
            pointer: Point::new(0.0, 0.0),
            panel: Rect::new(0.0, 0.0, 10.0, 10.0),
            container: Rect::new(0.0, 0.0, 100.0, 100.0),
        });
        assert!(!studio.mask().panel().is_dragging());
    }

    #[tokio::test]
    async fn test_clear_policy_resets_drawing_on_select() {
        let generator = ScriptedGenerator::new([
            Ok(GenerationResponse::image(result(1))),
            Ok(GenerationResponse::image(result(2))),
        ]);
        let config = StudioConfig {
            mask_on_select: MaskSelectionPolicy::Clear,
            ..Default::default()
        };
        let mut studio = Studio::new(config, generator);
        studio.update(Msg::Source(SourceMsg::Selected(photo())));
        let task = studio.update(edit("first"));
        run(&mut studio, task).await;
        let first = studio.session().history().active_id().unwrap();
        let task = studio.update(edit("second"));
        run(&mut studio, task).await;
        let second = studio.session().history().active_id().unwrap();

        paint_left_half(&mut studio);
        studio.update(Msg::SelectHistory(second));
        assert!(studio.session().mask().is_some());
        assert!(studio.mask().buffer().is_some_and(|b| !b.is_empty()));

        studio.update(Msg::SelectHistory(first));
        assert!(studio.session().mask().is_none());
        assert!(studio.mask().buffer().is_some_and(|b| b.is_empty()));
    }

    #[tokio::test]
    async fn test_export_active() {
        let dir = tempfile::tempdir().unwrap();
        let config = StudioConfig {
            export_dir: Some(dir.path().to_path_buf()),
            ..Default::default()
        };
        let generator = ScriptedGenerator::new([Ok(GenerationResponse::image(result(9)))]);
        let mut studio = Studio::new(config, generator);
        assert!(studio.export_active().is_err());

        studio.update(Msg::Source(SourceMsg::Selected(photo())));
        let task = studio.update(edit("export me"));
        run(&mut studio, task).await;

        let path = studio.export_active().unwrap();
        assert!(path.starts_with(dir.path()));
        assert_eq!(std::fs::read(path).unwrap(), result(9).bytes);
    }
}
