pub mod bbox;
pub mod profile;
pub mod selector;

pub use bbox::*;
pub use profile::*;
pub use selector::*;
