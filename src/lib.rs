pub mod loader;
pub mod model;
pub mod output;
pub mod traffic;
