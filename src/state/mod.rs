/// State management module
///
/// This module holds all client-side application state:
/// - Shared data structures mirroring the backend's JSON (data.rs)
/// - Carousel slide list and autoplay position (carousel.rs)
/// - Photo list and full-screen viewer state (gallery.rs)
/// - Settings form model and countdown arithmetic (settings.rs)

pub mod carousel;
pub mod data;
pub mod gallery;
pub mod settings;
