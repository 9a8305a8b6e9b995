//! Request-scoped services.

pub mod video;

pub use video::VideoService;
