use std::path::PathBuf;

/// Overall UI state.
pub struct UIState {
    pub file_path: Option<PathBuf>,
    pub output_dir: PathBuf,

    /// Id handed to the next opened image.
    pub next_source_id: u64,

    /// Last viewport height reported by the layout.
    pub applied_viewport_height: u32,

    /// Log messages.
    pub log_messages: Vec<String>,
}

impl Default for UIState {
    fn default() -> Self {
        Self {
            file_path: None,
            output_dir: PathBuf::from("crops"),
            next_source_id: 1,
            applied_viewport_height: 0,
            log_messages: Vec::new(),
        }
    }
}

impl UIState {
    pub fn add_log(&mut self, msg: String) {
        self.log_messages.push(msg);
    }

    pub fn take_source_id(&mut self) -> u64 {
        let id = self.next_source_id;
        self.next_source_id += 1;
        id
    }
}
