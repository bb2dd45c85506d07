pub mod client;
pub mod request;
pub mod response;
pub mod types;

// Re-export commonly used types for convenient access
pub use client::{ReqwestTransport, Transport};
pub use request::{CredentialsMode, HeaderInput, OutboundRequest, RequestMode, RequestSpec};
pub use response::{ResponseEnvelope, TransportResponse};
pub use types::{Headers, StatusClass};
