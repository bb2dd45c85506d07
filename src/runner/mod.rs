pub mod executor;
pub mod headers;

pub use executor::RequestExecutor;
pub use headers::{normalize_headers, parse_header_lines, parse_structured};
