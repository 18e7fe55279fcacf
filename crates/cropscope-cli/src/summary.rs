use std::path::Path;

use console::Style;
use cropscope_core::selection::Selection;
use cropscope_core::selector::Selector;
use cropscope_core::submit::{CropReceipt, CropRequest};

struct Styles {
    title: Style,
    header: Style,
    label: Style,
    value: Style,
    warn: Style,
    path: Style,
}

impl Styles {
    fn new() -> Self {
        Self {
            title: Style::new().cyan().bold(),
            header: Style::new().cyan().bold(),
            label: Style::new().dim(),
            value: Style::new().bold().white(),
            warn: Style::new().dim().yellow(),
            path: Style::new().underlined(),
        }
    }
}

/// One line per committed selection: the input and the clamped tuple.
pub fn print_steps(steps: &[(String, Selection)]) {
    let s = Styles::new();
    for (i, (input, selection)) in steps.iter().enumerate() {
        println!(
            "  {:>3}  {:<22}{}",
            s.label.apply_to(i),
            input,
            s.value.apply_to(selection)
        );
    }
}

pub fn print_selection_summary(input: &Path, selector: &Selector, request: &CropRequest) {
    let s = Styles::new();

    println!();
    println!("  {}", s.title.apply_to("Cropscope Selection"));
    println!("  {}", s.title.apply_to("\u{2550}".repeat(19)));
    println!();

    println!(
        "  {:<14}{}",
        s.label.apply_to("Input"),
        s.path.apply_to(input.display())
    );
    if let Some(source) = selector.source() {
        println!(
            "  {:<14}{}",
            s.label.apply_to("Source"),
            s.value.apply_to(format!("#{} {}x{}", source.id, source.width, source.height))
        );
    }
    println!();

    if let Some(g) = selector.geometry() {
        println!("  {}", s.header.apply_to("Overview"));
        println!(
            "    {:<12}{}",
            s.label.apply_to("Display"),
            s.value.apply_to(format!("{}x{}", g.display_width, g.display_height))
        );
        println!(
            "    {:<12}{}",
            s.label.apply_to("Scale"),
            s.value.apply_to(format!("{:.4}", g.scale_factor))
        );
        if let Some(outline) = selector.overview().outline() {
            println!(
                "    {:<12}{}",
                s.label.apply_to("Outline"),
                s.value.apply_to(format!(
                    "({}, {}) side {}",
                    outline.left, outline.top, outline.side
                ))
            );
        }
        println!();
    }

    println!("  {}", s.header.apply_to("Request"));
    println!(
        "    {:<12}{}",
        s.label.apply_to("Origin"),
        s.value.apply_to(format!("({}, {})", request.x, request.y))
    );
    println!(
        "    {:<12}{}",
        s.label.apply_to("Zoom"),
        s.value.apply_to(request.zoom)
    );
    let crop_size = s.value.apply_to(request.crop_size);
    if request.crop_size == request.zoom {
        println!("    {:<12}{}", s.label.apply_to("Crop size"), crop_size);
    } else {
        println!(
            "    {:<12}{} {}",
            s.label.apply_to("Crop size"),
            crop_size,
            s.warn.apply_to(format!("({})", selector.config().crop_size))
        );
    }
    println!(
        "    {:<12}{}",
        s.label.apply_to("Preview"),
        s.value.apply_to(format!(
            "{} px at {:.2}x",
            selector.preview().display_size(),
            selector.preview().display_zoom()
        ))
    );
    println!();
}

pub fn print_receipt(receipt: &CropReceipt) {
    let s = Styles::new();

    println!();
    println!("  {}", s.title.apply_to("Crop Stored"));
    println!("  {}", s.title.apply_to("\u{2550}".repeat(11)));
    println!();
    println!(
        "  {:<14}{}",
        s.label.apply_to("Crop"),
        s.value.apply_to(format!("#{}", receipt.crop_id))
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Region"),
        s.value.apply_to(format!(
            "({}, {}) {}x{}",
            receipt.x, receipt.y, receipt.size, receipt.size
        ))
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Output"),
        s.path.apply_to(receipt.path.display())
    );
    println!();
}
