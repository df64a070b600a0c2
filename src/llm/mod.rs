pub mod perplexity;
pub mod prompt;
