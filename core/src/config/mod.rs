mod load;
mod types;

pub use load::{get_folio_data_dir, load_default, load_from_file};
pub use types::{AppConfig, ImportConfig, LoggingConfig};
