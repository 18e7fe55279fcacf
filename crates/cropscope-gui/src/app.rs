use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::mpsc;

use anyhow::Result;
use cropscope_core::config::SelectorConfig;
use cropscope_core::io::image_io::probe_dimensions;
use cropscope_core::selection::SelectionInput;
use cropscope_core::selector::{LoadOutcome, Selector};
use cropscope_core::source::SourceRef;
use cropscope_core::submit::CropReceipt;

use crate::messages::{WorkerCommand, WorkerResult};
use crate::panels;
use crate::states::{TextureState, UIState};
use crate::worker;

/// Viewport height used until the first layout pass reports the real one.
const INITIAL_VIEWPORT_HEIGHT: u32 = 700;

pub struct CropscopeApp {
    pub cmd_tx: mpsc::Sender<WorkerCommand>,
    pub result_tx: mpsc::Sender<WorkerResult>,
    pub result_rx: mpsc::Receiver<WorkerResult>,
    pub selector: Selector,
    pub ui_state: UIState,
    pub textures: TextureState,
    /// Filled by the Selector's refresh callback after every stored crop.
    pub receipts: Rc<RefCell<Vec<CropReceipt>>>,
    pub show_about: bool,
}

impl CropscopeApp {
    pub fn new(ctx: &egui::Context) -> Result<Self> {
        let ui_state = UIState::default();
        let (result_tx, result_rx) = mpsc::channel();
        let cmd_tx =
            worker::spawn_worker(result_tx.clone(), ctx.clone(), ui_state.output_dir.clone())?;

        let mut selector = Selector::new(SelectorConfig::default(), INITIAL_VIEWPORT_HEIGHT)?;
        let receipts = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&receipts);
        selector.on_refresh(move |receipt: &CropReceipt| {
            sink.borrow_mut().push(receipt.clone());
        });

        Ok(Self {
            cmd_tx,
            result_tx,
            result_rx,
            selector,
            ui_state,
            textures: TextureState::default(),
            receipts,
            show_about: false,
        })
    }

    /// Drain all pending results from the worker.
    fn poll_results(&mut self) {
        while let Ok(result) = self.result_rx.try_recv() {
            match result {
                WorkerResult::FilePicked { path } => {
                    self.open_image(path);
                }
                WorkerResult::Decoded { ticket, result } => {
                    match self.selector.complete_load(ticket, result) {
                        Ok(LoadOutcome::Ready(selection)) => {
                            if let Some(source) = self.selector.source() {
                                self.ui_state.add_log(format!(
                                    "Loaded #{} ({}x{}), selection {selection}",
                                    source.id, source.width, source.height
                                ));
                            }
                        }
                        Ok(LoadOutcome::Stale) => {
                            self.ui_state.add_log(format!(
                                "Dropped outdated decode of #{}",
                                ticket.image_id
                            ));
                        }
                        Err(e) => {
                            self.ui_state.add_log(format!("ERROR: {e}"));
                        }
                    }
                    self.textures.dirty = true;
                }
                WorkerResult::Submitted { ticket, result } => {
                    match self.selector.finish_commit(ticket, result) {
                        Ok(receipt) => self.ui_state.add_log(format!(
                            "Crop #{} saved: {}",
                            receipt.crop_id,
                            receipt.path.display()
                        )),
                        Err(e) => self.ui_state.add_log(format!("ERROR: {e}")),
                    }
                }
                WorkerResult::OutputDirChanged { path } => {
                    self.ui_state
                        .add_log(format!("Crops will be written to {}", path.display()));
                    self.ui_state.output_dir = path;
                }
                WorkerResult::Log { message } => {
                    self.ui_state.add_log(message);
                }
            }
        }
    }

    /// Assign a file to the Selector and queue its decode.
    pub fn open_image(&mut self, path: PathBuf) {
        let (width, height) = match probe_dimensions(&path) {
            Ok(dims) => dims,
            Err(e) => {
                self.ui_state
                    .add_log(format!("ERROR: {}: {e}", path.display()));
                return;
            }
        };

        let source = SourceRef {
            id: self.ui_state.take_source_id(),
            raster_url: path.display().to_string(),
            width,
            height,
        };
        let ticket = self.selector.assign(source.clone());
        self.textures.dirty = true;
        self.ui_state.add_log(format!("Opening {} as #{}", path.display(), source.id));
        self.ui_state.file_path = Some(path);
        self.send_command(WorkerCommand::Decode { ticket, source });
    }

    /// Route one input through the Selector.
    pub fn apply_input(&mut self, input: SelectionInput) {
        if self.selector.apply(input).is_some() {
            self.textures.dirty = true;
        }
    }

    /// Package the selection and hand it to the worker.
    pub fn request_crop(&mut self) {
        match self.selector.begin_commit() {
            Ok((ticket, request)) => {
                self.send_command(WorkerCommand::Submit { ticket, request });
            }
            Err(e) => self.ui_state.add_log(format!("ERROR: {e}")),
        }
    }

    pub fn set_display_budget(&mut self, budget: f64) {
        match self.selector.set_display_budget(budget) {
            Ok(()) => self.textures.dirty = true,
            Err(e) => self.ui_state.add_log(format!("ERROR: {e}")),
        }
    }

    /// Record the space the overview may occupy. It takes effect at the
    /// next image assignment; a loaded image keeps its geometry.
    pub fn update_viewport_height(&mut self, height: u32) {
        if height == 0 || height == self.ui_state.applied_viewport_height {
            return;
        }
        self.ui_state.applied_viewport_height = height;
        self.selector.set_viewport_height(height);
    }

    pub fn close_image(&mut self) {
        self.selector.dismiss();
        self.ui_state.file_path = None;
        self.textures.dirty = true;
    }

    pub fn send_command(&self, cmd: WorkerCommand) {
        let _ = self.cmd_tx.send(cmd);
    }
}

impl eframe::App for CropscopeApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_results();

        panels::menu_bar::show(ctx, self);
        panels::status::show(ctx, self);
        panels::controls::show(ctx, self);
        panels::viewport::show(ctx, self);

        self.textures.sync(ctx, &self.selector);

        if self.show_about {
            egui::Window::new("About Cropscope")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                .show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.heading("Cropscope");
                        ui.label("Square region-of-interest selection");
                        ui.add_space(8.0);
                        ui.label(format!("Version {}", env!("CARGO_PKG_VERSION")));
                        ui.add_space(8.0);
                        if ui.button("Close").clicked() {
                            self.show_about = false;
                        }
                    });
                });
        }
    }
}
