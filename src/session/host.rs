//! The editor's view of whoever embeds it
//!
//! Saving, clipboard and window management live in the host. The editor only
//! hands over the finished raster through this trait.

use image::RgbaImage;

use super::messages::FinishAction;

pub trait EditorHost {
    /// The user finished editing; `image` is the final composited raster
    fn finished(&mut self, image: RgbaImage, action: FinishAction);

    /// The user discarded the edit
    fn cancelled(&mut self) {}
}

/// Host that keeps the last delivered image, for headless use
#[derive(Debug, Default)]
pub struct CollectingHost {
    pub result: Option<(RgbaImage, FinishAction)>,
    pub cancelled: bool,
}

impl EditorHost for CollectingHost {
    fn finished(&mut self, image: RgbaImage, action: FinishAction) {
        self.result = Some((image, action));
    }

    fn cancelled(&mut self) {
        self.cancelled = true;
    }
}
