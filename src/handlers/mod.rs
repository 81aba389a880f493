pub mod command;
pub mod session;

pub use command::{parse_command, Command, SearchArgs, HELP};
pub use session::{handle_command, Reply};
