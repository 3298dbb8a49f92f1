pub mod apply;
pub mod config;
pub mod events;
pub mod parse;
pub mod run;
