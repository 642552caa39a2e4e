// src/config/state.rs
use super::options::Options;

#[derive(Clone, Debug)]
pub struct GuiState {
    pub window_w: u32,
    pub window_h: u32,
    /// Saved schedule page on disk.
    pub document_path: String,
    /// Address the page was served from; picks the layout family.
    pub address: String,
    pub watch: bool,
}

impl Default for GuiState {
    fn default() -> Self {
        Self {
            window_w: 1100,
            window_h: 700,
            document_path: String::new(),
            address: String::from("https://www.espn.com/mens-college-basketball/schedule"),
            watch: true,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct AppState {
    pub options: Options,
    pub gui: GuiState,
}
