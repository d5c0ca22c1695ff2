use colored::Colorize;

fn main() {
    if let Err(message) = bookstore_admin::app::run_cli() {
        eprintln!("{} {}", "error:".bold().red(), message);
        std::process::exit(1);
    }
}
