pub mod score;
pub mod service;
pub mod text;

pub use score::{rank, score_post};
pub use service::{SearchResults, SearchService};
