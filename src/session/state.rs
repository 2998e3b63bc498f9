use image::RgbaImage;

use crate::annotations::document::Document;
use crate::annotations::text_input::{Caret, TextComposition};
use crate::config::{EditorConfig, FontSpec, ShapeColor, clamp_block_size};
use crate::domain::{Corner, MosaicShape, Outline, Point, Rect, Shape, Tool};
use crate::error::{EditorError, Result};
use crate::render::image::{
    CompositionView, draw_composition, draw_handles, draw_mosaic_preview, render_shape,
    render_shapes, with_pixmap,
};
use crate::render::mosaic::apply_mosaic;
use crate::render::text::TextEngine;

use super::host::EditorHost;
use super::messages::FinishAction;

/// Pointer gesture currently in progress
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Interaction {
    #[default]
    Idle,
    /// Dragging out a new shape
    Drawing {
        tool: Tool,
        start: Point,
        current: Point,
    },
    /// Dragging a shape body
    MovingShape { index: usize, last: Point },
    /// Dragging a corner handle
    ResizingShape { index: usize, corner: Corner },
    /// Text tool active; the anchor lives in the composition buffer
    TextEditing,
}

/// Style applied to newly created shapes
#[derive(Clone, Debug, PartialEq)]
pub struct ToolStyle {
    pub color: ShapeColor,
    pub stroke_width: f32,
    pub font: FontSpec,
    pub bold: bool,
    pub mosaic_block_size: u32,
}

impl From<&EditorConfig> for ToolStyle {
    fn from(config: &EditorConfig) -> Self {
        Self {
            color: config.shape_color,
            stroke_width: config.stroke_width,
            font: config.font.clone(),
            bold: config.bold,
            mosaic_block_size: clamp_block_size(config.mosaic_block_size),
        }
    }
}

/// One editing session over a single captured image
pub struct EditorSession {
    /// The captured raster, never modified
    base: RgbaImage,
    /// Base plus every mosaic bake, in order
    baked: RgbaImage,
    /// Baked raster with all committed shapes drawn on top
    working: RgbaImage,
    pub(crate) document: Document,
    pub(crate) tool: Option<Tool>,
    pub(crate) style: ToolStyle,
    pub(crate) interaction: Interaction,
    pub(crate) composition: TextComposition,
    pub(crate) caret: Caret,
    text: Box<dyn TextEngine>,
    host_border: u32,
}

impl EditorSession {
    pub fn new(
        base: RgbaImage,
        config: &EditorConfig,
        text: Box<dyn TextEngine>,
    ) -> Result<Self> {
        if base.width() == 0 || base.height() == 0 {
            return Err(EditorError::EmptyImage);
        }
        log::debug!("Editor session over {}x{} image", base.width(), base.height());
        Ok(Self {
            baked: base.clone(),
            working: base.clone(),
            base,
            document: Document::new(),
            tool: None,
            style: ToolStyle::from(config),
            interaction: Interaction::Idle,
            composition: TextComposition::default(),
            caret: Caret::default(),
            text,
            host_border: config.host_border,
        })
    }

    pub fn base_pixels(&self) -> &RgbaImage {
        &self.base
    }

    /// Base image with mosaics baked and committed shapes composited
    pub fn working_pixels(&self) -> &RgbaImage {
        &self.working
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn interaction(&self) -> Interaction {
        self.interaction
    }

    pub fn tool(&self) -> Option<Tool> {
        self.tool
    }

    pub fn style(&self) -> &ToolStyle {
        &self.style
    }

    pub fn composition(&self) -> &TextComposition {
        &self.composition
    }

    pub fn caret_visible(&self) -> bool {
        self.caret.visible()
    }

    pub(crate) fn text_engine(&self) -> &dyn TextEngine {
        self.text.as_ref()
    }

    /// Shape a drag from `start` to `end` would create with `tool`
    pub(crate) fn draft_shape(&self, tool: Tool, start: Point, end: Point) -> Option<Shape> {
        let outline = || Outline {
            start,
            end,
            color: self.style.color,
            stroke_width: self.style.stroke_width,
        };
        match tool {
            Tool::Rectangle => Some(Shape::Rectangle(outline())),
            Tool::Ellipse => Some(Shape::Ellipse(outline())),
            Tool::Arrow => Some(Shape::Arrow(outline())),
            Tool::Mosaic => Some(Shape::Mosaic(MosaicShape {
                start,
                end,
                block_size: self.style.mosaic_block_size,
            })),
            Tool::Text => None,
        }
    }

    /// Append a shape to the document, baking mosaics immediately
    pub(crate) fn commit_shape(&mut self, shape: Shape) -> bool {
        let bake = match &shape {
            Shape::Mosaic(m) => Some((m.bounds(), m.block_size)),
            _ => None,
        };
        if !self.document.append(shape) {
            return false;
        }

        match bake {
            Some((rect, block_size)) => {
                apply_mosaic(&mut self.baked, rect, block_size);
                self.rebuild_working();
            }
            None => {
                let Some(last) = self.document.as_slice().last() else {
                    return true;
                };
                render_shapes(&mut self.working, [last], self.text.as_ref());
            }
        }
        true
    }

    /// Finalize pending text as a shape
    pub(crate) fn commit_pending_text(&mut self) -> bool {
        let style = &self.style;
        match self
            .composition
            .commit_and_close(style.color, &style.font, style.bold)
        {
            Some(shape) => self.commit_shape(shape),
            None => false,
        }
    }

    /// Remove the last shape and re-derive the rasters
    pub fn undo(&mut self) {
        let Some(removed) = self.document.remove_last() else {
            log::debug!("Nothing to undo");
            return;
        };
        log::debug!("Undo {}", removed.kind());
        // Averaged pixels cannot be un-applied; start over from the base
        if removed.is_mosaic() || !self.document.bakes().is_empty() {
            self.baked = self.document.replay(&self.base);
        }
        self.rebuild_working();
    }

    /// Drop every shape and restore the base image
    pub fn clear_all(&mut self) {
        log::debug!("Clearing {} shape(s)", self.document.len());
        self.document.clear();
        self.composition.reset();
        self.baked = self.base.clone();
        self.working = self.base.clone();
    }

    /// Re-composite every committed shape over the baked raster
    pub(crate) fn rebuild_working(&mut self) {
        let mut working = self.baked.clone();
        render_shapes(&mut working, &self.document, self.text.as_ref());
        self.working = working;
    }

    /// Frame for display: shapes, handles, drag preview and text being typed
    pub fn render_frame(&self) -> RgbaImage {
        let mut frame = self.baked.clone();
        let text = self.text.as_ref();
        with_pixmap(&mut frame, |pixmap| {
            // Handles follow their own shape so later shapes paint over them
            for shape in &self.document {
                render_shape(pixmap, shape, text);
                if let Some(o) = shape.outline().filter(|_| shape.is_resizable()) {
                    draw_handles(pixmap, o.bounds(), o.color);
                }
            }

            match self.interaction {
                Interaction::Drawing {
                    tool: Tool::Mosaic,
                    start,
                    current,
                } => draw_mosaic_preview(pixmap, Rect::from_points(start, current)),
                Interaction::Drawing {
                    tool,
                    start,
                    current,
                } => {
                    if let Some(draft) = self.draft_shape(tool, start, current) {
                        render_shape(pixmap, &draft, text);
                    }
                }
                Interaction::TextEditing => {
                    if let Some(anchor) = self.composition.anchor() {
                        let view = CompositionView {
                            anchor,
                            committed: self.composition.committed(),
                            preedit: self.composition.preedit(),
                            font: &self.style.font,
                            bold: self.style.bold,
                            color: self.style.color,
                            caret_visible: self.caret.visible(),
                        };
                        draw_composition(pixmap, &view, text);
                    }
                }
                _ => {}
            }
        });
        frame
    }

    /// Finished raster without editor decoration or the host's border
    pub fn final_image(&self) -> RgbaImage {
        let border = self.host_border;
        let (w, h) = (self.working.width(), self.working.height());
        if border == 0 {
            return self.working.clone();
        }
        if border.saturating_mul(2) >= w.min(h) {
            log::warn!("Host border {}px leaves no image, returning it uncropped", border);
            return self.working.clone();
        }
        let (crop_w, crop_h) = (w - 2 * border, h - 2 * border);
        image::imageops::crop_imm(&self.working, border, border, crop_w, crop_h).to_image()
    }

    /// Hand the result to the host, committing any text still being typed
    pub fn finish(&mut self, action: FinishAction, host: &mut dyn EditorHost) {
        self.interaction = Interaction::Idle;
        if action == FinishAction::Cancel {
            log::debug!("Edit cancelled");
            self.composition.reset();
            host.cancelled();
            return;
        }
        self.commit_pending_text();
        log::debug!("Finishing with {:?}, {} shape(s)", action, self.document.len());
        host.finished(self.final_image(), action);
    }
}
