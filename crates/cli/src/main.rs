use std::process::ExitCode;

fn main() -> ExitCode {
    aptscout_cli::run()
}
