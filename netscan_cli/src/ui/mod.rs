pub mod cli;
mod prompt;
