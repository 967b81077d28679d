fn main() {
    if let Err(e) = tmpsweep_cli::run_cli() {
        eprintln!("ERROR: {e:#}");
        std::process::exit(1);
    }
}
