use spendsmart::{cli::run_cli, init};

fn main() {
    init();

    if let Err(err) = run_cli() {
        tracing::error!(error = %err, "spendsmart exited with an error");
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}
