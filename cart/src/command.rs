//! Terminal commands for the interactive driver.
//!
//! Item numbers are one-based on the command line and converted to the
//! zero-based indices the actions carry.

use crate::error::{CartError, Result};
use crate::types::CartAction;
use std::str::FromStr;

/// Help text listing every command
pub const HELP: &str = "\
Commands:
  add <type> <reviews...> <price>   add one unit of a package
  inc <n> | dec <n> | rm <n>        change or remove item n
  clear                             empty the cart
  checkout                          send the order
  open | close                      show or hide the cart
  show                              print the cart
  metrics                           print Prometheus metrics
  help                              this text
  quit                              exit";

/// A parsed command line
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Send an action to the store
    Dispatch(CartAction),
    /// Print the cart
    Show,
    /// Print rendered metrics
    Metrics,
    /// Print [`HELP`]
    Help,
    /// Exit the driver
    Quit,
}

fn item_index(arg: Option<&str>) -> Result<usize> {
    let arg = arg.ok_or_else(|| CartError::InvalidCommand("missing item number".to_string()))?;
    match arg.parse::<usize>() {
        Ok(n) if n >= 1 => Ok(n - 1),
        _ => Err(CartError::InvalidCommand(format!(
            "item number must be 1 or more, got `{arg}`"
        ))),
    }
}

fn parse_add(args: &[&str]) -> Result<CartAction> {
    let [package_type, reviews @ .., price] = args else {
        return Err(CartError::InvalidCommand(
            "usage: add <type> <reviews...> <price>".to_string(),
        ));
    };
    if reviews.is_empty() {
        return Err(CartError::InvalidCommand(
            "usage: add <type> <reviews...> <price>".to_string(),
        ));
    }
    let price = price
        .trim_start_matches('$')
        .parse::<f64>()
        .map_err(|_| CartError::InvalidCommand(format!("`{price}` is not a price")))?;

    Ok(CartAction::add(*package_type, reviews.join(" "), price))
}

impl FromStr for Command {
    type Err = CartError;

    fn from_str(line: &str) -> Result<Self> {
        let words: Vec<&str> = line.split_whitespace().collect();
        let Some((&verb, args)) = words.split_first() else {
            return Err(CartError::InvalidCommand("empty line".to_string()));
        };

        let command = match verb.to_ascii_lowercase().as_str() {
            "add" => Self::Dispatch(parse_add(args)?),
            "inc" | "increase" => Self::Dispatch(CartAction::IncreaseQuantity {
                index: item_index(args.first().copied())?,
            }),
            "dec" | "decrease" => Self::Dispatch(CartAction::DecreaseQuantity {
                index: item_index(args.first().copied())?,
            }),
            "rm" | "remove" => Self::Dispatch(CartAction::RemoveItem {
                index: item_index(args.first().copied())?,
            }),
            "clear" => Self::Dispatch(CartAction::ClearCart),
            "checkout" | "order" => Self::Dispatch(CartAction::Checkout),
            "open" => Self::Dispatch(CartAction::OpenCart),
            "close" => Self::Dispatch(CartAction::CloseCart),
            "show" | "ls" => Self::Show,
            "metrics" => Self::Metrics,
            "help" | "?" => Self::Help,
            "quit" | "exit" | "q" => Self::Quit,
            other => {
                return Err(CartError::InvalidCommand(format!(
                    "unknown command `{other}` (try `help`)"
                )));
            },
        };

        Ok(command)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn add_with_multi_word_reviews() {
        let command: Command = "add monthly-plan 3 months $45".parse().unwrap();
        assert_eq!(
            command,
            Command::Dispatch(CartAction::add("monthly-plan", "3 months", 45.0))
        );
    }

    #[test]
    fn add_needs_reviews_and_price() {
        assert!("add basic 10".parse::<Command>().is_err());
        assert!("add basic 10 cheap".parse::<Command>().is_err());
    }

    #[test]
    fn item_numbers_are_one_based() {
        assert_eq!(
            "inc 1".parse::<Command>().unwrap(),
            Command::Dispatch(CartAction::IncreaseQuantity { index: 0 })
        );
        assert_eq!(
            "rm 3".parse::<Command>().unwrap(),
            Command::Dispatch(CartAction::RemoveItem { index: 2 })
        );
        assert!("dec 0".parse::<Command>().is_err());
        assert!("dec".parse::<Command>().is_err());
    }

    #[test]
    fn simple_commands() {
        assert_eq!("CHECKOUT".parse::<Command>().unwrap(), Command::Dispatch(CartAction::Checkout));
        assert_eq!("show".parse::<Command>().unwrap(), Command::Show);
        assert_eq!("quit".parse::<Command>().unwrap(), Command::Quit);
    }

    #[test]
    fn unknown_and_empty() {
        assert!(matches!("dance".parse::<Command>(), Err(CartError::InvalidCommand(_))));
        assert!("   ".parse::<Command>().is_err());
    }
}
