pub mod quiz;
pub mod settings;
