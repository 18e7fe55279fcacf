use std::path::PathBuf;

use cropscope_core::error::Result;
use cropscope_core::selector::{CommitTicket, LoadTicket};
use cropscope_core::source::SourceRef;
use cropscope_core::submit::{CropReceipt, CropRequest};
use image::RgbaImage;

/// Commands sent from UI thread to worker thread.
pub enum WorkerCommand {
    /// Fetch and decode the raster for an assignment.
    Decode { ticket: LoadTicket, source: SourceRef },

    /// Hand a packaged selection to the crop service.
    Submit {
        ticket: CommitTicket,
        request: CropRequest,
    },

    /// Write later crops into a different directory.
    SetOutputDir { path: PathBuf },
}

/// Results sent from worker thread back to UI thread.
pub enum WorkerResult {
    /// A file was chosen in the open dialog.
    FilePicked { path: PathBuf },

    Decoded {
        ticket: LoadTicket,
        result: Result<RgbaImage>,
    },

    Submitted {
        ticket: CommitTicket,
        result: Result<CropReceipt>,
    },

    OutputDirChanged { path: PathBuf },

    Log { message: String },
}
