use cropscope_core::selector::Selector;

use crate::convert::rgba_to_color_image;

/// GPU copies of the two Selector surfaces.
#[derive(Default)]
pub struct TextureState {
    pub overview: Option<egui::TextureHandle>,
    pub preview: Option<egui::TextureHandle>,
    /// Surfaces changed since the last upload.
    pub dirty: bool,
}

impl TextureState {
    /// Re-upload both surfaces if anything changed. An empty surface drops
    /// its texture.
    pub fn sync(&mut self, ctx: &egui::Context, selector: &Selector) {
        if !self.dirty {
            return;
        }
        self.dirty = false;

        upload(ctx, &mut self.overview, "overview", selector.overview().surface());
        upload(ctx, &mut self.preview, "preview", selector.preview().surface());
        ctx.request_repaint();
    }
}

fn upload(
    ctx: &egui::Context,
    slot: &mut Option<egui::TextureHandle>,
    name: &str,
    surface: &image::RgbaImage,
) {
    if surface.width() == 0 || surface.height() == 0 {
        *slot = None;
        return;
    }

    let image = rgba_to_color_image(surface);
    match slot {
        Some(texture) => texture.set(image, egui::TextureOptions::NEAREST),
        None => *slot = Some(ctx.load_texture(name, image, egui::TextureOptions::NEAREST)),
    }
}
