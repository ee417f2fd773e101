mod shortener;

pub use shortener::{ShortenRequest, ShortenResponse};
