//! Terminal prompts and notices. Thin by design: state lives in
//! [`Selection`], workflow in the other modules; this file only asks and
//! prints.

use crate::browser::validate_credentials;
use crate::selection::Selection;
use crate::sweep::SweepReport;
use console::style;
use dialoguer::{theme::ColorfulTheme, Confirm, Input, MultiSelect, Password, Select};

const DEFAULT_EXPORT_PATH: &str = "orbisweep-posts.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    EditSelection,
    SelectAll,
    ClearAll,
    Export,
    DeleteSelected,
    Quit,
}

fn theme() -> ColorfulTheme {
    ColorfulTheme::default()
}

/// Ask for credentials until both are non-empty. Nothing browser-side runs
/// until this returns.
pub fn prompt_credentials() -> Result<(String, String), dialoguer::Error> {
    let theme = theme();
    loop {
        let username: String = Input::with_theme(&theme)
            .with_prompt("orbi.kr username")
            .allow_empty(true)
            .interact_text()?;

        let password = Password::with_theme(&theme)
            .with_prompt("Password")
            .allow_empty_password(true)
            .interact()?;

        match validate_credentials(&username, &password) {
            Ok(()) => return Ok((username.trim().to_string(), password.trim().to_string())),
            Err(e) => println!("{}", style(e).red()),
        }
    }
}

pub fn choose_action(selection: &Selection) -> Result<Action, dialoguer::Error> {
    let items = [
        format!("Pick posts ({} of {} selected)", selection.selected_count(), selection.len()),
        "Select all".to_string(),
        "Clear selection".to_string(),
        "Save the list to a JSON file".to_string(),
        format!("Delete the {} selected posts", selection.selected_count()),
        "Quit".to_string(),
    ];

    let choice = Select::with_theme(&theme())
        .with_prompt("What next?")
        .items(&items)
        .default(0)
        .interact()?;

    Ok(match choice {
        0 => Action::EditSelection,
        1 => Action::SelectAll,
        2 => Action::ClearAll,
        3 => Action::Export,
        4 => Action::DeleteSelected,
        _ => Action::Quit,
    })
}

/// Show the checklist and replace the selection with whatever comes back.
pub fn edit_selection(selection: &mut Selection) -> Result<(), dialoguer::Error> {
    let titles = selection.titles();
    let flags = selection.flags();

    let checked = MultiSelect::with_theme(&theme())
        .with_prompt("Select posts to delete (Space to toggle, Enter to confirm)")
        .items(&titles)
        .defaults(&flags)
        .interact()?;

    selection.set_checked(&checked);
    Ok(())
}

pub fn confirm_delete(count: usize) -> Result<bool, dialoguer::Error> {
    Confirm::with_theme(&theme())
        .with_prompt(format!(
            "Really delete {count} selected post{}? This cannot be undone",
            if count == 1 { "" } else { "s" }
        ))
        .default(false)
        .interact()
}

pub fn prompt_export_path() -> Result<String, dialoguer::Error> {
    Input::with_theme(&theme())
        .with_prompt("Save listing to")
        .default(DEFAULT_EXPORT_PATH.to_string())
        .interact_text()
}

pub fn notice(message: &str) {
    println!("{}", style(message).cyan());
}

pub fn error(message: &str) {
    println!("{}", style(message).red());
}

/// The single completion notice after a sweep. Unconfirmed clicks are called
/// out as such; they are neither successes nor failures.
pub fn print_report(report: &SweepReport) {
    println!();
    println!(
        "{} {} confirmed, {} unconfirmed, {} without a delete button, {} failed.",
        style("Sweep finished:").green().bold(),
        report.confirmed,
        report.unconfirmed,
        report.control_missing,
        report.failed,
    );
    if report.unconfirmed > 0 {
        println!(
            "{}",
            style("Unconfirmed: the delete button was clicked but no confirmation dialog appeared; those posts may or may not be gone.")
                .yellow()
        );
    }
    println!("The list shown is not refreshed; run orbisweep again to re-scan.");
}
