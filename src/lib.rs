pub mod config;
pub mod error;
pub mod file;
pub mod interactive;
pub mod pipeline;
pub mod subtitle;

pub use config::{Config, TextEncoding};
pub use error::{Result, SrtSyncError};
pub use file::{read_document, read_text, save_document, write_text};
pub use pipeline::{
    print_summary, resynchronize_file, resynchronize_file_with, ResyncConfig, ResyncResult,
};
pub use subtitle::{resynchronize, resynchronize_with, ShiftPolicy, SubtitleDocument};
