use std::path::PathBuf;
use std::sync::mpsc;

use cropscope_core::io::image_io::{fetch_raster, resolve_raster_path};
use cropscope_core::selector::{CommitTicket, LoadTicket};
use cropscope_core::source::SourceRef;
use cropscope_core::submit::{CropRequest, CropService, LocalCropService};
use tracing::debug;

use crate::messages::{WorkerCommand, WorkerResult};

/// Spawn the worker thread. Decoding and cropping run here so the UI thread
/// only ever sees finished results.
pub fn spawn_worker(
    result_tx: mpsc::Sender<WorkerResult>,
    ctx: egui::Context,
    output_dir: PathBuf,
) -> std::io::Result<mpsc::Sender<WorkerCommand>> {
    let (cmd_tx, cmd_rx) = mpsc::channel::<WorkerCommand>();

    std::thread::Builder::new()
        .name("cropscope-worker".into())
        .spawn(move || {
            worker_loop(cmd_rx, result_tx, ctx, output_dir);
        })?;

    Ok(cmd_tx)
}

fn send(tx: &mpsc::Sender<WorkerResult>, ctx: &egui::Context, result: WorkerResult) {
    let _ = tx.send(result);
    ctx.request_repaint();
}

fn send_log(tx: &mpsc::Sender<WorkerResult>, ctx: &egui::Context, msg: impl Into<String>) {
    send(tx, ctx, WorkerResult::Log { message: msg.into() });
}

fn worker_loop(
    cmd_rx: mpsc::Receiver<WorkerCommand>,
    tx: mpsc::Sender<WorkerResult>,
    ctx: egui::Context,
    output_dir: PathBuf,
) {
    let mut service = LocalCropService::new(output_dir);

    while let Ok(cmd) = cmd_rx.recv() {
        match cmd {
            WorkerCommand::Decode { ticket, source } => {
                handle_decode(ticket, &source, &mut service, &tx, &ctx);
            }
            WorkerCommand::Submit { ticket, request } => {
                handle_submit(ticket, &request, &service, &tx, &ctx);
            }
            WorkerCommand::SetOutputDir { path } => {
                service.set_output_dir(path);
                let path = service.output_dir().to_path_buf();
                send(&tx, &ctx, WorkerResult::OutputDirChanged { path });
            }
        }
    }
}

fn handle_decode(
    ticket: LoadTicket,
    source: &SourceRef,
    service: &mut LocalCropService,
    tx: &mpsc::Sender<WorkerResult>,
    ctx: &egui::Context,
) {
    debug!(id = source.id, generation = ticket.generation, "Decoding source");
    if let Ok(path) = resolve_raster_path(&source.raster_url) {
        service.register(source.id, path);
    }

    let result = fetch_raster(source);
    send(tx, ctx, WorkerResult::Decoded { ticket, result });
}

fn handle_submit(
    ticket: CommitTicket,
    request: &CropRequest,
    service: &LocalCropService,
    tx: &mpsc::Sender<WorkerResult>,
    ctx: &egui::Context,
) {
    send_log(
        tx,
        ctx,
        format!(
            "Cropping {}x{} at ({}, {})...",
            request.zoom, request.zoom, request.x, request.y
        ),
    );
    let result = service.submit(request);
    send(tx, ctx, WorkerResult::Submitted { ticket, result });
}
