use std::process::ExitCode;

use bot_commons::*;

fn main() -> ExitCode {
    start_everything("WARN,last_chance_bot=info", last_chance_bot::entry())
}
