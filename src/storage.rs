/// The flat `requirements.txt` format.
pub mod requirements_txt;

pub use requirements_txt::{LoadError, ParseError, SaveError};
