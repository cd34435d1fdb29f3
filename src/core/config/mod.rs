pub mod data;
pub mod io;

pub use data::{path_display, Config, ModelOverride};
pub use io::ConfigError;

#[cfg(test)]
mod tests;
