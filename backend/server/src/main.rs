use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    match scoop::start_server().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}
