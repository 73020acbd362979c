pub mod extractor;
pub mod validator;

pub use extractor::{TickerExtractor, STOPWORDS};
pub use validator::TickerValidator;
