pub mod errors;
pub mod load;
pub mod save;
pub mod step_export;
pub mod stl;

pub use errors::{ExportError, LoadError};
pub use load::{load_params, load_params_file};
pub use save::{save_params, FORMAT_NAME, FORMAT_VERSION};
pub use step_export::export_step;
pub use stl::{export_ascii_stl, export_binary_stl};
