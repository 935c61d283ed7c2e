pub mod app;
mod busy_overlay;
mod form_view;
mod top_bar;

pub use app::FormApp;
