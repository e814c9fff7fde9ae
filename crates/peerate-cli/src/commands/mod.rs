pub mod create;
pub mod show;
pub mod simulate;
pub mod utils;
