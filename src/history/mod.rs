pub mod model;
pub mod printer;
pub mod selector;
pub mod serialization;
pub mod store;

pub use model::{BodyPayload, NewRecord, RawFragment, RequestRecord, ResourceType};
pub use store::{DEFAULT_CAPACITY, HistoryStore, INITIAL_ID};
