pub mod curl;

pub use curl::CurlGenerator;
