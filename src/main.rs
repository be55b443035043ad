use std::process::ExitCode;

fn main() -> ExitCode {
    autorst::cli::run()
}
