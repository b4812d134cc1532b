//! The interactive menu loop and the handlers shared with the one-shot CLI
//! subcommands. All prompting and printing lives here; the repository only
//! ever sees well-typed arguments.

use anyhow::Result;
use comfy_table::presets::UTF8_FULL;
use comfy_table::Table;
use database::repository::{PollOptionDetail, PollRepository};
use database::DbError;
use std::io::{self, Write};

const MENU_PROMPT: &str = "
-- Menu --

1) Create new poll
2) List open polls
3) Vote on a poll
4) Show poll votes
5) Select a random winner from a poll option
6) Exit

Enter your choice: ";

const NEW_OPTION_PROMPT: &str = "Enter new option text (or leave empty to stop adding options): ";

/// One menu action. The selection key maps onto this enum instead of a
/// string-keyed dispatch table, so an unhandled action is a compile error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuCommand {
    CreatePoll,
    ListPolls,
    Vote,
    ShowResults,
    PickWinner,
    Exit,
}

impl MenuCommand {
    /// Parses a menu selection. Surrounding whitespace is ignored; anything
    /// but "1".."6" is `None` and the caller re-prompts.
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim() {
            "1" => Some(Self::CreatePoll),
            "2" => Some(Self::ListPolls),
            "3" => Some(Self::Vote),
            "4" => Some(Self::ShowResults),
            "5" => Some(Self::PickWinner),
            "6" => Some(Self::Exit),
            _ => None,
        }
    }
}

/// Runs the interactive menu until the user exits or stdin closes.
///
/// A vote against a nonexistent option is the one database error worth
/// surviving here: it is reported and the menu continues. Everything else
/// propagates and ends the process.
pub async fn run(repo: &PollRepository) -> Result<()> {
    loop {
        let selection = prompt(MENU_PROMPT)?;
        let Some(command) = MenuCommand::parse(&selection) else {
            println!("Invalid input selected. Please try again.");
            continue;
        };
        if command == MenuCommand::Exit {
            return Ok(());
        }
        if let Err(e) = dispatch(repo, command).await {
            match e.downcast_ref::<DbError>() {
                Some(DbError::ForeignKeyViolation(_)) => {
                    println!("That option does not exist. Please try again.");
                }
                _ => return Err(e),
            }
        }
    }
}

async fn dispatch(repo: &PollRepository, command: MenuCommand) -> Result<()> {
    match command {
        MenuCommand::CreatePoll => prompt_create_poll(repo).await,
        MenuCommand::ListPolls => list_polls(repo).await,
        MenuCommand::Vote => prompt_vote_poll(repo).await,
        MenuCommand::ShowResults => {
            let poll_id = prompt_i32("Enter the poll you would like to see votes for: ")?;
            show_poll_votes(repo, poll_id).await
        }
        MenuCommand::PickWinner => prompt_pick_winner(repo).await,
        MenuCommand::Exit => Ok(()),
    }
}

async fn prompt_create_poll(repo: &PollRepository) -> Result<()> {
    let title = prompt("Enter poll title: ")?;
    let owner = prompt("Enter poll owner: ")?;

    let mut options = Vec::new();
    loop {
        let text = prompt(NEW_OPTION_PROMPT)?;
        if text.is_empty() {
            break;
        }
        options.push(text);
    }

    let poll_id = repo.create_poll(&title, &owner, &options).await?;
    println!("Created poll {poll_id}.");
    Ok(())
}

/// Prints every stored poll. No open/closed flag exists in the schema, so
/// "open polls" means all of them.
pub async fn list_polls(repo: &PollRepository) -> Result<()> {
    let polls = repo.get_polls().await?;
    if polls.is_empty() {
        println!("No polls have been created yet.");
        return Ok(());
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["Id", "Title", "Owner"]);
    for poll in &polls {
        table.add_row(vec![
            poll.id.to_string(),
            poll.title.clone(),
            poll.owner_username.clone(),
        ]);
    }
    println!("{table}");
    Ok(())
}

async fn prompt_vote_poll(repo: &PollRepository) -> Result<()> {
    let poll_id = prompt_i32("Enter the poll you would like to vote on: ")?;

    let details = repo.get_poll_details(poll_id).await?;
    if details.is_empty() {
        println!("That poll has no options to vote on.");
        return Ok(());
    }
    print_poll_options(&details);

    let option_id = prompt_i32("Enter the option you'd like to vote for: ")?;
    let username = prompt("Enter the username you'd like to vote as: ")?;
    cast_vote(repo, &username, option_id).await
}

/// Records a vote. The repository surfaces an unknown option id as a
/// foreign-key violation; interactive callers catch that and re-prompt.
pub async fn cast_vote(repo: &PollRepository, username: &str, option_id: i32) -> Result<()> {
    repo.add_poll_vote(username, option_id).await?;
    println!("Vote recorded.");
    Ok(())
}

/// Prints the tally for a poll, translating the zero-total division error
/// into the user-facing "no votes yet" message.
pub async fn show_poll_votes(repo: &PollRepository, poll_id: i32) -> Result<()> {
    match repo.get_poll_and_vote_results(poll_id).await {
        Err(DbError::DivisionByZero) => {
            println!("No votes yet cast for this poll.");
            Ok(())
        }
        Err(e) => Err(e.into()),
        Ok(tallies) => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_header(vec!["Option", "Votes", "Share"]);
            for tally in &tallies {
                table.add_row(vec![
                    tally.option_text.clone(),
                    tally.vote_count.to_string(),
                    format!("{:.2}%", tally.vote_percentage),
                ]);
            }
            println!("{table}");
            Ok(())
        }
    }
}

async fn prompt_pick_winner(repo: &PollRepository) -> Result<()> {
    let poll_id = prompt_i32("Enter the poll you'd like to pick a winner for: ")?;
    let details = repo.get_poll_details(poll_id).await?;
    if details.is_empty() {
        println!("That poll has no options to draw from.");
        return Ok(());
    }
    print_poll_options(&details);

    let option_id =
        prompt_i32("Enter the winning option; we'll pick a random winner from its voters: ")?;
    announce_winner(repo, option_id).await
}

/// Draws and announces a random voter for the option, tolerating the
/// no-votes case.
pub async fn announce_winner(repo: &PollRepository, option_id: i32) -> Result<()> {
    match repo.get_random_poll_vote(option_id).await? {
        Some(username) => println!("The randomly selected winner is {username}."),
        None => println!("No votes were cast for that option."),
    }
    Ok(())
}

fn print_poll_options(details: &[PollOptionDetail]) {
    for detail in details {
        println!("{}: {}", detail.option_id, detail.option_text);
    }
}

fn prompt(message: &str) -> Result<String> {
    print!("{message}");
    io::stdout().flush()?;

    let mut line = String::new();
    let bytes_read = io::stdin().read_line(&mut line)?;
    if bytes_read == 0 {
        anyhow::bail!("standard input closed");
    }
    Ok(line.trim().to_string())
}

fn prompt_i32(message: &str) -> Result<i32> {
    loop {
        let line = prompt(message)?;
        match line.parse() {
            Ok(value) => return Ok(value),
            Err(_) => println!("Please enter a number."),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_maps_every_menu_key() {
        assert_eq!(MenuCommand::parse("1"), Some(MenuCommand::CreatePoll));
        assert_eq!(MenuCommand::parse("2"), Some(MenuCommand::ListPolls));
        assert_eq!(MenuCommand::parse("3"), Some(MenuCommand::Vote));
        assert_eq!(MenuCommand::parse("4"), Some(MenuCommand::ShowResults));
        assert_eq!(MenuCommand::parse("5"), Some(MenuCommand::PickWinner));
        assert_eq!(MenuCommand::parse("6"), Some(MenuCommand::Exit));
    }

    #[test]
    fn parse_ignores_surrounding_whitespace() {
        assert_eq!(MenuCommand::parse("  4\n"), Some(MenuCommand::ShowResults));
    }

    #[test]
    fn parse_rejects_anything_else() {
        for input in ["", "0", "7", "42", "one", "1 2"] {
            assert_eq!(MenuCommand::parse(input), None, "input {input:?}");
        }
    }
}
