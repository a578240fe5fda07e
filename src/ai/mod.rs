mod normalizer;
pub mod prompts;

pub use normalizer::{EMPTY_RESPONSE_MESSAGE, normalize, segment_text};
