//! Interactive loop driving one edit session from typed commands.

use std::io::{BufRead, Write};

use anyhow::Result;
use client_core::{EditSession, FormFields, RenderSurface};
use shared::domain::ProductId;

use crate::terminal::TerminalSurface;

const HELP: &str = "\
commands:
  list                    reload the product table
  edit <id>               load a product into the form
  set <field> <value>     field: name | price | stock | description
  show                    print the form
  submit                  create, or update the product being edited
  cancel                  leave edit mode and clear the form
  delete <id>             delete a product (asks first)
  help                    this text
  quit                    leave the shell";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormField {
    Name,
    Price,
    Stock,
    Description,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    List,
    Edit(ProductId),
    Set(FormField, String),
    Show,
    Submit,
    Cancel,
    Delete(ProductId),
    Help,
    Quit,
    Empty,
}

pub fn parse_command(line: &str) -> Result<ShellCommand, String> {
    let line = line.trim();
    let (verb, rest) = line
        .split_once(char::is_whitespace)
        .map(|(verb, rest)| (verb, rest.trim()))
        .unwrap_or((line, ""));

    let command = match verb.to_ascii_lowercase().as_str() {
        "" => ShellCommand::Empty,
        "list" | "ls" => ShellCommand::List,
        "edit" => ShellCommand::Edit(parse_id(rest)?),
        "set" => {
            let (field, value) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
            let field = match field.to_ascii_lowercase().as_str() {
                "name" => FormField::Name,
                "price" => FormField::Price,
                "stock" => FormField::Stock,
                "description" | "desc" => FormField::Description,
                other => return Err(format!("unknown field `{other}`")),
            };
            ShellCommand::Set(field, value.trim().to_string())
        }
        "show" => ShellCommand::Show,
        "submit" | "save" => ShellCommand::Submit,
        "cancel" | "new" => ShellCommand::Cancel,
        "delete" | "rm" => ShellCommand::Delete(parse_id(rest)?),
        "help" | "?" => ShellCommand::Help,
        "quit" | "exit" | "q" => ShellCommand::Quit,
        other => return Err(format!("unknown command `{other}`; try `help`")),
    };
    Ok(command)
}

fn parse_id(raw: &str) -> Result<ProductId, String> {
    raw.parse::<i64>()
        .map(ProductId)
        .map_err(|_| format!("`{raw}` is not a product id"))
}

pub fn set_field(form: &mut FormFields, field: &FormField, value: String) {
    match field {
        FormField::Name => form.name = value,
        FormField::Price => form.price = value,
        FormField::Stock => form.stock = value,
        FormField::Description => form.description = value,
    }
}

/// Display name for a delete prompt, from the last loaded list.
fn display_name<R: RenderSurface>(session: &EditSession<R>, id: ProductId) -> String {
    session
        .products()
        .iter()
        .find(|product| product.id == id)
        .map(|product| product.name.clone())
        .unwrap_or_else(|| format!("product #{id}"))
}

pub async fn run<W: Write, I: BufRead>(
    session: &mut EditSession<TerminalSurface<W, I>>,
) -> Result<()> {
    session.load().await;
    session.surface_mut().print("type `help` for commands");

    loop {
        let prompt = match session.editing_id() {
            Some(id) => format!("inventory (editing #{id})> "),
            None => "inventory> ".to_string(),
        };
        let Some(line) = session.surface_mut().read_line(&prompt)? else {
            break;
        };
        if session.surface().output_broken() {
            anyhow::bail!("terminal output is no longer writable");
        }

        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(message) => {
                session.surface_mut().print(&message);
                continue;
            }
        };
        tracing::debug!(?command, "shell command");

        match command {
            ShellCommand::Empty => {}
            ShellCommand::List => {
                session.load().await;
            }
            ShellCommand::Edit(id) => {
                session.begin_edit(id).await;
            }
            ShellCommand::Set(field, value) => {
                set_field(session.surface_mut().form_mut(), &field, value);
            }
            ShellCommand::Show => session.surface_mut().show_form(),
            ShellCommand::Submit => {
                session.submit_current_form().await;
            }
            ShellCommand::Cancel => {
                session.cancel_edit();
                session.surface_mut().show_form();
            }
            ShellCommand::Delete(id) => {
                let name = display_name(session, id);
                session.delete(id, &name).await;
            }
            ShellCommand::Help => session.surface_mut().print(HELP),
            ShellCommand::Quit => break,
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "tests/shell_tests.rs"]
mod tests;
