mod textures;
mod ui;

pub use textures::TextureState;
pub use ui::UIState;
