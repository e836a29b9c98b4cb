use std::process::ExitCode;

fn main() -> ExitCode {
    if let Err(e) = articli::run(std::env::args()) {
        eprintln!("Error: {e:#}");
        return ExitCode::from(e.exit_code());
    }
    ExitCode::SUCCESS
}
