mod build;
mod generate;
mod parse;

pub use build::BuildCommand;
pub use generate::GenerateCommand;
pub use parse::ParseCommand;

use console::style;

fn heading(title: &str) {
    println!();
    println!("  {}", style(title).cyan().bold().underlined());
    println!();
}

fn success(message: impl std::fmt::Display) {
    println!("  {} {}", style("✓").green().bold(), message);
}

fn warning(message: impl std::fmt::Display) {
    println!(
        "    {} {}",
        style("!").yellow().bold(),
        style(message).yellow()
    );
}

fn failure(message: impl std::fmt::Display) {
    println!("  {} {}", style("✖").red().bold(), style(message).red());
}
