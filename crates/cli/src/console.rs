//! Interactive line console over an [`InventoryStore`].

use std::io::{self, BufRead, Write};

use stockroom_core::DomainError;
use stockroom_inventory::{InventoryStore, StockItem};

use crate::command::Command;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// Reads commands, runs them against the store, and writes results.
///
/// Domain errors become `Error: ...` lines; the session keeps going.
#[derive(Debug)]
pub struct Console<'a> {
    store: &'a InventoryStore,
}

impl<'a> Console<'a> {
    pub fn new(store: &'a InventoryStore) -> Self {
        Self { store }
    }

    /// Run until `exit`/`quit` or end of input.
    pub fn run<R, W>(&self, input: R, out: &mut W) -> io::Result<()>
    where
        R: BufRead,
        W: Write,
    {
        writeln!(out, "\n--- Warehouse Console ---")?;
        write_help(out)?;

        let mut lines = input.lines();
        loop {
            write!(out, "cmd> ")?;
            out.flush()?;

            let Some(line) = lines.next() else {
                writeln!(out)?;
                break;
            };
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }

            let flow = match line.parse::<Command>() {
                Ok(cmd) => self.execute(cmd, out)?,
                Err(e) => {
                    writeln!(out, "{e}")?;
                    Flow::Continue
                }
            };
            if flow == Flow::Exit {
                break;
            }
        }

        Ok(())
    }

    /// Execute one parsed command.
    pub fn execute<W: Write>(&self, cmd: Command, out: &mut W) -> io::Result<Flow> {
        let result = match cmd {
            Command::Add {
                id,
                name,
                quantity,
                threshold,
            } => StockItem::new(id, name, quantity, threshold)
                .and_then(|item| self.store.add_product(item))
                .map(|item| format!("Product added: {}", item.id())),
            Command::Ship { id, amount } => self
                .store
                .receive_shipment(&id, amount)
                .map(|q| format!("Shipment processed. {id} now has {q}.")),
            Command::Order { id, amount } => self
                .store
                .fulfill_order(&id, amount)
                .map(|q| format!("Order fulfilled. {id} now has {q}.")),
            Command::List { json } => {
                self.list(json, out)?;
                return Ok(Flow::Continue);
            }
            Command::Help => {
                write_help(out)?;
                return Ok(Flow::Continue);
            }
            Command::Exit => return Ok(Flow::Exit),
        };

        match result {
            Ok(msg) => writeln!(out, "{msg}")?,
            Err(err) => writeln!(out, "{}", describe_error(&err))?,
        }
        Ok(Flow::Continue)
    }

    fn list<W: Write>(&self, json: bool, out: &mut W) -> io::Result<()> {
        if json {
            let levels = self.store.snapshot();
            serde_json::to_writer_pretty(&mut *out, &levels).map_err(io::Error::other)?;
            writeln!(out)?;
            return Ok(());
        }

        let items = self.store.list_products();
        if items.is_empty() {
            writeln!(out, "(no products)")?;
        }
        for item in items {
            writeln!(out, "{item}")?;
        }
        Ok(())
    }
}

/// User-facing wording for domain errors.
pub fn describe_error(err: &DomainError) -> String {
    match err {
        DomainError::Validation(msg) => format!("Operation failed: {msg}"),
        other => format!("Error: {other}"),
    }
}

pub fn write_help<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out, "Commands:")?;
    writeln!(out, " add id|name|quantity|threshold -> add new product")?;
    writeln!(out, " ship <id> <qty> -> receive shipment (increase)")?;
    writeln!(out, " order <id> <qty> -> fulfill order (decrease)")?;
    writeln!(out, " list [json] -> list products")?;
    writeln!(out, " help -> show this help")?;
    writeln!(out, " exit / quit -> exit and save")?;
    writeln!(out)
}
