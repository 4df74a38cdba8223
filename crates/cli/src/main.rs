fn main() {
    if let Err(e) = wayfinder_cli::run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
