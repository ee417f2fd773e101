mod shortener;

pub use shortener::shorten_handler;
