pub mod analytics_controller;

pub use analytics_controller::configure;
