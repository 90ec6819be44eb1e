// Web search via a hosted search-augmented chat API

pub mod perplexity;

pub use perplexity::*;
