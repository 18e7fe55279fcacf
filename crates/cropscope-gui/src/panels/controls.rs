use cropscope_core::selection::SelectionInput;
use cropscope_core::selector::SelectorPhase;

use crate::app::CropscopeApp;
use crate::panels::section_header;

const LEFT_PANEL_WIDTH: f32 = 260.0;

pub fn show(ctx: &egui::Context, app: &mut CropscopeApp) {
    egui::SidePanel::left("controls")
        .default_width(LEFT_PANEL_WIDTH)
        .resizable(true)
        .show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.set_min_width(LEFT_PANEL_WIDTH - 20.0);

                image_section(ui, app);
                ui.separator();
                selection_section(ui, app);
                ui.separator();
                display_section(ui, app);
                ui.separator();
                crop_section(ui, app);
                ui.separator();
                receipts_section(ui, app);
            });
        });
}

fn image_section(ui: &mut egui::Ui, app: &mut CropscopeApp) {
    let phase = app.selector.phase().to_string();
    section_header(ui, "Image", Some(&phase));
    ui.add_space(4.0);

    match app.ui_state.file_path {
        Some(ref path) => {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());
            ui.label(name);
        }
        None => {
            ui.small("No image open");
        }
    }

    if let Some(source) = app.selector.source() {
        ui.small(format!("#{}  {}x{}", source.id, source.width, source.height));
    }
}

fn selection_section(ui: &mut egui::Ui, app: &mut CropscopeApp) {
    section_header(ui, "Selection", None);
    ui.add_space(4.0);

    let (Some(selection), Some(bounds)) = (app.selector.selection(), app.selector.bounds()) else {
        ui.small("Click the overview or use the sliders once an image is loaded");
        return;
    };
    let interactive = app.selector.is_interactive();
    let slider = app.selector.config().size_slider;

    let mut x = selection.x as i64;
    let mut y = selection.y as i64;
    let mut size = selection.size as i64;
    let mut inputs = Vec::new();

    ui.add_enabled_ui(interactive, |ui| {
        if ui
            .add(egui::Slider::new(&mut x, 0..=bounds.width as i64).text("X"))
            .changed()
        {
            inputs.push(SelectionInput::SetX(x));
        }
        if ui
            .add(egui::Slider::new(&mut y, 0..=bounds.height as i64).text("Y"))
            .changed()
        {
            inputs.push(SelectionInput::SetY(y));
        }
        if ui
            .add(
                egui::Slider::new(&mut size, slider.min as i64..=slider.max as i64)
                    .step_by(slider.step as f64)
                    .text("Size"),
            )
            .changed()
        {
            inputs.push(SelectionInput::SetSize(size));
        }

        ui.add_space(4.0);
        if ui.button("Default").clicked() {
            inputs.push(SelectionInput::ResetToDefault);
        }
    });

    for input in inputs {
        app.apply_input(input);
    }

    ui.add_space(4.0);
    if let Some(current) = app.selector.selection() {
        ui.small(format!(
            "{0}x{0} at ({1}, {2}), max {3}",
            current.size,
            current.x,
            current.y,
            bounds.max_size()
        ));
    }
}

fn display_section(ui: &mut egui::Ui, app: &mut CropscopeApp) {
    section_header(ui, "Display", None);
    ui.add_space(4.0);

    let mut budget = app.selector.config().display_budget;
    if ui
        .add(egui::Slider::new(&mut budget, 0.2..=1.0).text("Height budget"))
        .changed()
    {
        app.set_display_budget(budget);
    }

    if let Some(g) = app.selector.geometry() {
        ui.small(format!(
            "Overview {}x{} ({:.1}%)",
            g.display_width,
            g.display_height,
            g.scale_factor * 100.0
        ));
    }
}

fn crop_section(ui: &mut egui::Ui, app: &mut CropscopeApp) {
    let submitting = *app.selector.phase() == SelectorPhase::Submitting;
    section_header(ui, "Crop", submitting.then_some("Submitting..."));
    ui.add_space(4.0);

    ui.small(format!("Crop size: {}", app.selector.config().crop_size));
    ui.small(format!("Output: {}", app.ui_state.output_dir.display()));
    ui.add_space(4.0);

    ui.horizontal(|ui| {
        if ui
            .add_enabled(app.selector.is_interactive(), egui::Button::new("Crop"))
            .clicked()
        {
            app.request_crop();
        }
        if submitting {
            ui.spinner();
        }
    });
}

fn receipts_section(ui: &mut egui::Ui, app: &mut CropscopeApp) {
    let receipts = app.receipts.borrow();
    let count = receipts.len().to_string();
    section_header(ui, "Crops", Some(&count));
    ui.add_space(4.0);

    if receipts.is_empty() {
        ui.small("None yet");
        return;
    }

    for receipt in receipts.iter().rev() {
        ui.small(format!(
            "#{} {}x{} at ({}, {}) from #{}",
            receipt.crop_id,
            receipt.size,
            receipt.size,
            receipt.x,
            receipt.y,
            receipt.source_image_id
        ))
        .on_hover_text(receipt.path.display().to_string());
    }
}
