//! Interactive category menu.

use crate::commands::ScrapeCommand;
use crate::config::Config;
use anyhow::Result;
use std::io::{self, BufRead, Write};
use std::path::Path;

/// Menu entries as (label, enabled).
pub const CATEGORIES: [(&str, bool); 6] = [
    ("Fragrances", true),
    ("Skincare", false),
    ("Makeup", false),
    ("Haircare", false),
    ("Aromatherapy", false),
    ("Candles", false),
];

/// A parsed menu selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuChoice {
    Fragrances,
    Unavailable(&'static str),
    Quit,
    Unknown(String),
}

/// Interprets one line of input: a menu number or name, case-insensitive.
pub fn parse_choice(input: &str) -> MenuChoice {
    let input = input.trim().to_lowercase();
    let quit_number = (CATEGORIES.len() + 1).to_string();

    if input == "quit" || input == "exit" || input == "x" || input == quit_number {
        return MenuChoice::Quit;
    }

    let selected = CATEGORIES.iter().enumerate().find(|(i, (label, _))| {
        input == label.to_lowercase() || input == (i + 1).to_string()
    });

    match selected {
        Some((_, &(_, true))) => MenuChoice::Fragrances,
        Some((_, &(label, false))) => MenuChoice::Unavailable(label),
        None => MenuChoice::Unknown(input),
    }
}

/// Menu text shown before each prompt.
pub fn render_menu() -> String {
    let mut lines = vec!["What products do you want to scrape?".to_string()];
    for (i, (label, enabled)) in CATEGORIES.iter().enumerate() {
        if *enabled {
            lines.push(format!("  {}. {}", i + 1, label));
        } else {
            lines.push(format!("  {}. {} (unavailable at this time)", i + 1, label));
        }
    }
    lines.push(format!("  {}. Quit", CATEGORIES.len() + 1));
    lines.join("\n")
}

/// Prints the menu and reads one selection. End of input counts as quit.
pub fn next_choice(input: &mut impl BufRead, output: &mut impl Write) -> io::Result<MenuChoice> {
    writeln!(output, "\n{}", render_menu())?;
    write!(output, "::$ ")?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(MenuChoice::Quit);
    }
    Ok(parse_choice(&line))
}

/// Warns that a repeated scrape replaces the earlier output and asks to go on.
/// Anything but "y" or "yes", including end of input, declines.
pub fn confirm_rescrape(
    input: &mut impl BufRead,
    output: &mut impl Write,
    path: &Path,
) -> io::Result<bool> {
    write!(
        output,
        "\n{} already holds this session's results and will be overwritten. Continue? [y/N] ",
        path.display()
    )?;
    output.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(matches!(line.trim().to_lowercase().as_str(), "y" | "yes"))
}

/// Runs the menu on stdin/stdout until the user quits.
///
/// A scrape that aborts on an output failure ends the session with that error.
pub async fn run(config: &Config) -> Result<()> {
    let mut scraped = false;

    loop {
        let choice = next_choice(&mut io::stdin().lock(), &mut io::stdout())?;

        match choice {
            MenuChoice::Fragrances => {
                if scraped
                    && !confirm_rescrape(&mut io::stdin().lock(), &mut io::stdout(), &config.output)?
                {
                    continue;
                }
                let summary = ScrapeCommand::new(config.clone()).execute().await?;
                scraped = true;
                println!("\n{}", summary);
                println!("Saved to {}", config.output.display());
            }
            MenuChoice::Unavailable(label) => {
                println!("\n{} is unavailable at this time.", label);
            }
            MenuChoice::Quit => return Ok(()),
            MenuChoice::Unknown(_) => {
                println!("\nUnknown command: please enter only valid commands.");
            }
        }
    }
}
