// Service module exports

pub mod replay;
pub mod scheduling;
pub mod settings;
