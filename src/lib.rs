// reviewlens: topic discovery for product reviews
//
// This is the library root. `topics` is the modeling core; `reviews` and
// `output` are the thin layers that feed it and present its results.

pub mod config;
pub mod error;
pub mod output;
pub mod reviews;
pub mod topics;

pub use error::TopicError;
pub use topics::modeler::{ModelConfig, TopicModeler};
pub use topics::types::{DocumentTopics, TopicKeywords};
