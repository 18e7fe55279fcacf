use cropscope_core::geometry::DisplayPoint;
use cropscope_core::selection::SelectionInput;
use cropscope_core::selector::SelectorPhase;

use crate::app::CropscopeApp;

const PREVIEW_PANEL_MARGIN: f32 = 16.0;

pub fn show(ctx: &egui::Context, app: &mut CropscopeApp) {
    preview_panel(ctx, app);

    egui::CentralPanel::default().show(ctx, |ui| {
        let rect = ui.available_rect_before_wrap();
        paint_background(ui, rect);
        app.update_viewport_height(rect.height().floor().max(0.0) as u32);

        let texture = app.textures.overview.as_ref().map(|t| t.id());
        match (texture, app.selector.geometry()) {
            (Some(texture_id), Some(geometry)) => {
                let size = egui::vec2(
                    geometry.display_width as f32,
                    geometry.display_height as f32,
                );

                // Wide images may overflow horizontally.
                let pick = egui::ScrollArea::both()
                    .show(ui, |ui| {
                        let (img_rect, response) =
                            ui.allocate_exact_size(size, egui::Sense::click());
                        draw_image(ui, texture_id, img_rect);

                        if let Some(pos) = response.hover_pos() {
                            ctx.set_cursor_icon(egui::CursorIcon::Crosshair);
                            let src = geometry.to_source(to_display_point(pos, img_rect));
                            draw_hover_label(ui, img_rect, &format!("{:.0}, {:.0}", src.x, src.y));
                        }

                        response
                            .clicked()
                            .then(|| response.interact_pointer_pos())
                            .flatten()
                            .map(|pos| to_display_point(pos, img_rect))
                    })
                    .inner;

                if let Some(point) = pick {
                    app.apply_input(SelectionInput::PointerPick(point));
                }
            }
            _ => show_placeholder(ui, app.selector.phase()),
        }
    });
}

fn preview_panel(ctx: &egui::Context, app: &CropscopeApp) {
    let box_size = app.selector.preview().display_size() as f32;

    egui::SidePanel::right("preview")
        .exact_width(box_size + PREVIEW_PANEL_MARGIN)
        .resizable(false)
        .show(ctx, |ui| {
            super::section_header(ui, "Preview", None);
            ui.add_space(4.0);

            let (rect, _) =
                ui.allocate_exact_size(egui::vec2(box_size, box_size), egui::Sense::hover());
            paint_background(ui, rect);

            if let Some(ref texture) = app.textures.preview {
                draw_image(ui, texture.id(), rect);
                ui.add_space(4.0);
                ui.small(format!(
                    "{0}x{0} px at {1:.2}x",
                    texture.size()[0],
                    app.selector.preview().display_zoom()
                ));
            }
        });
}

/// Overview-local coordinates of a screen position.
fn to_display_point(pos: egui::Pos2, img_rect: egui::Rect) -> DisplayPoint {
    let rel = pos - img_rect.min;
    DisplayPoint::new(rel.x as f64, rel.y as f64)
}

fn paint_background(ui: &egui::Ui, rect: egui::Rect) {
    ui.painter()
        .rect_filled(rect, 0.0, egui::Color32::from_gray(30));
}

fn draw_image(ui: &egui::Ui, texture_id: egui::TextureId, img_rect: egui::Rect) {
    ui.painter().image(
        texture_id,
        img_rect,
        egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
        egui::Color32::WHITE,
    );
}

fn draw_hover_label(ui: &egui::Ui, img_rect: egui::Rect, label: &str) {
    let label_pos = img_rect.left_top() + egui::vec2(8.0, 8.0);
    ui.painter().text(
        label_pos,
        egui::Align2::LEFT_TOP,
        label,
        egui::FontId::proportional(14.0),
        egui::Color32::from_white_alpha(200),
    );
}

fn show_placeholder(ui: &mut egui::Ui, phase: &SelectorPhase) {
    let text = match phase {
        SelectorPhase::Loading => "Loading...".to_string(),
        SelectorPhase::LoadFailed(msg) => format!("Could not load image: {msg}"),
        _ => "Open an image to begin".to_string(),
    };
    ui.centered_and_justified(|ui| {
        ui.label(
            egui::RichText::new(text)
                .size(18.0)
                .color(egui::Color32::from_gray(100)),
        );
    });
}
