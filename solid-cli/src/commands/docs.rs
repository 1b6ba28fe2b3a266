use colored::Colorize;

/// Open `url` in the default browser.
pub fn run(url: &str) -> anyhow::Result<()> {
    println!("{} Opening {}", "->".blue(), url.cyan());
    open::that(url)?;
    Ok(())
}
