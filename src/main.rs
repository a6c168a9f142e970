use std::process;

fn main() {
    if let Err(e) = runfile::cli::run() {
        eprintln!("{}", runfile::ui::error_line(&e.to_string()));
        process::exit(e.exit_code());
    }
}
