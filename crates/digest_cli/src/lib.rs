pub mod cli;
pub mod delivery;
pub mod output;
