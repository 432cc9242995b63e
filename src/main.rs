use std::process::ExitCode;

fn main() -> ExitCode {
    match leibniz_series::cli::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
