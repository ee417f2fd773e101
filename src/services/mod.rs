mod shortener;

pub use shortener::ShortenerService;
