// Module exports for models

pub mod appointment;
pub mod grid;
pub mod settings;
