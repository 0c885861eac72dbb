pub mod config;
pub mod controller;
pub mod deps;
mod dractrl_controller;
mod dractrl_plugin;
pub mod errors;
pub mod params;
pub mod plugin;
pub mod spec;
pub mod state;
pub mod util;

#[cfg(test)]
mod test_helpers;

pub use dractrl_controller::dractrl_controller;
pub use dractrl_plugin::dractrl_plugin;
