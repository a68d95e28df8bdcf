pub mod flatten;
pub mod parser;

pub use flatten::{Diagnostic, Flattened, flatten_rings};
pub use parser::{load_document, parse_document};
