pub mod command_handler;
pub mod handlers;
pub mod meal_commands;

pub use command_handler::{Command, CommandHandler};
pub use meal_commands::*;
