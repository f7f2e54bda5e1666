//! Entry point for the `flaneur` command-line interface.
#![forbid(unsafe_code)]

fn main() {
    env_logger::init();
    if let Err(err) = flaneur_cli::run() {
        eprintln!("flaneur: {err}");
        std::process::exit(1);
    }
}
