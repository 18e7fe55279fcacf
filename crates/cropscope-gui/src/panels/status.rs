use crate::app::CropscopeApp;

pub fn show(ctx: &egui::Context, app: &mut CropscopeApp) {
    egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
        ui.add_space(2.0);

        // Log area: fixed height for 4 lines, scrollable.
        let line_height = ui.text_style_height(&egui::TextStyle::Body);
        let spacing = ui.spacing().item_spacing.y;
        let log_height = line_height * 4.0 + spacing * 3.0;

        egui::ScrollArea::vertical()
            .max_height(log_height)
            .min_scrolled_height(log_height)
            .stick_to_bottom(true)
            .show(ui, |ui| {
                if app.ui_state.log_messages.is_empty() {
                    for _ in 0..4 {
                        ui.label("");
                    }
                } else {
                    for msg in &app.ui_state.log_messages {
                        ui.label(msg);
                    }
                }
            });

        // Status line
        ui.horizontal(|ui| {
            ui.label(app.selector.phase().to_string());
            if let Some(selection) = app.selector.selection() {
                ui.separator();
                ui.label(format!("Selection {selection}"));
            }
            if let Some(geometry) = app.selector.geometry() {
                ui.separator();
                ui.label(format!("Scale: {:.1}%", geometry.scale_factor * 100.0));
            }
        });

        ui.add_space(2.0);
    });
}
