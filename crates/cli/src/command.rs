//! Console command grammar.
//!
//! ```text
//! add id|name|quantity|threshold
//! ship <id> <qty>
//! order <id> <qty>
//! list [json]
//! help
//! exit | quit
//! ```

use core::str::FromStr;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Add {
        id: String,
        name: String,
        quantity: i64,
        threshold: i64,
    },
    Ship {
        id: String,
        amount: i64,
    },
    Order {
        id: String,
        amount: i64,
    },
    List {
        json: bool,
    },
    Help,
    Exit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseCommandError {
    #[error("Unknown command. Type 'help' for usage.")]
    Unknown(String),

    #[error("Invalid {0} command. See help.")]
    Usage(&'static str),

    #[error("Invalid number format: {0}")]
    InvalidNumber(String),
}

impl FromStr for Command {
    type Err = ParseCommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (keyword, rest) = match line.split_once(char::is_whitespace) {
            Some((k, r)) => (k, r.trim()),
            None => (line, ""),
        };

        match keyword.to_ascii_lowercase().as_str() {
            "add" => parse_add(rest),
            "ship" => {
                let (id, amount) = parse_id_amount(rest, "ship")?;
                Ok(Command::Ship { id, amount })
            }
            "order" => {
                let (id, amount) = parse_id_amount(rest, "order")?;
                Ok(Command::Order { id, amount })
            }
            "list" => match rest.to_ascii_lowercase().as_str() {
                "" => Ok(Command::List { json: false }),
                "json" => Ok(Command::List { json: true }),
                _ => Err(ParseCommandError::Usage("list")),
            },
            "help" if rest.is_empty() => Ok(Command::Help),
            "exit" | "quit" if rest.is_empty() => Ok(Command::Exit),
            _ => Err(ParseCommandError::Unknown(line.to_string())),
        }
    }
}

fn parse_add(rest: &str) -> Result<Command, ParseCommandError> {
    let parts: Vec<&str> = rest.split('|').collect();
    let [id, name, quantity, threshold] = parts.as_slice() else {
        return Err(ParseCommandError::Usage("add"));
    };

    Ok(Command::Add {
        id: id.to_string(),
        name: name.to_string(),
        quantity: parse_number(quantity)?,
        threshold: parse_number(threshold)?,
    })
}

fn parse_id_amount(rest: &str, verb: &'static str) -> Result<(String, i64), ParseCommandError> {
    let parts: Vec<&str> = rest.split_whitespace().collect();
    let [id, amount] = parts.as_slice() else {
        return Err(ParseCommandError::Usage(verb));
    };
    Ok((id.to_string(), parse_number(amount)?))
}

fn parse_number(raw: &str) -> Result<i64, ParseCommandError> {
    raw.trim()
        .parse()
        .map_err(|_| ParseCommandError::InvalidNumber(raw.trim().to_string()))
}
