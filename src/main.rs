use std::process;

fn main() {
    if let Err(err) = kaiwa::cli::main() {
        eprintln!("❌ {err}");
        process::exit(1);
    }
}
