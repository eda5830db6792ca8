//! # Command Parsing
//!
//! One command per line, whitespace separated. Tag lists run until a
//! literal `0`.
//!
//! ```text
//! Insert 17 19.97 475 1238 9742 0
//! Find 17
//! Delete 17
//! FindMinPrice 475
//! FindMaxPrice 475
//! FindPriceRange 475 10.00 20.00
//! PriceHike 10 20 7.5
//! RemoveNames 17 475 0
//! End
//! ```

use mds_core::validation::{validate_price, validate_tags};
use mds_core::{CoreError, HikeRate, ItemId, Money, Tag};

use crate::error::{DriverError, DriverResult};

/// A parsed command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Insert {
        id: ItemId,
        price: Money,
        tags: Vec<Tag>,
    },
    Find {
        id: ItemId,
    },
    Delete {
        id: ItemId,
    },
    FindMinPrice {
        tag: Tag,
    },
    FindMaxPrice {
        tag: Tag,
    },
    FindPriceRange {
        tag: Tag,
        low: Money,
        high: Money,
    },
    PriceHike {
        low_id: ItemId,
        high_id: ItemId,
        rate: HikeRate,
    },
    RemoveNames {
        id: ItemId,
        tags: Vec<Tag>,
    },
    End,
}

impl Command {
    /// Parses one input line.
    ///
    /// Returns `Ok(None)` for blank lines and `#` comments.
    pub fn parse(line_no: usize, line: &str) -> DriverResult<Option<Command>> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(None);
        }

        let mut args = Args::new(line_no, line);
        let name = args.word("command")?;

        let command = match name {
            "Insert" => {
                let id = args.int("id")?;
                let price = args.price()?;
                let tags = args.tag_list()?;
                Command::Insert { id, price, tags }
            }
            "Find" => Command::Find { id: args.int("id")? },
            "Delete" => Command::Delete { id: args.int("id")? },
            "FindMinPrice" => Command::FindMinPrice {
                tag: args.int("tag")?,
            },
            "FindMaxPrice" => Command::FindMaxPrice {
                tag: args.int("tag")?,
            },
            "FindPriceRange" => Command::FindPriceRange {
                tag: args.int("tag")?,
                low: args.money("low")?,
                high: args.money("high")?,
            },
            "PriceHike" => Command::PriceHike {
                low_id: args.int("low id")?,
                high_id: args.int("high id")?,
                rate: args.rate()?,
            },
            "RemoveNames" => {
                let id = args.int("id")?;
                let tags = args.tag_list()?;
                Command::RemoveNames { id, tags }
            }
            "End" => Command::End,
            other => {
                return Err(DriverError::syntax(
                    line_no,
                    format!("unknown command '{}'", other),
                ))
            }
        };

        args.finish()?;
        Ok(Some(command))
    }

    /// Command name as written in the input.
    pub fn name(&self) -> &'static str {
        match self {
            Command::Insert { .. } => "Insert",
            Command::Find { .. } => "Find",
            Command::Delete { .. } => "Delete",
            Command::FindMinPrice { .. } => "FindMinPrice",
            Command::FindMaxPrice { .. } => "FindMaxPrice",
            Command::FindPriceRange { .. } => "FindPriceRange",
            Command::PriceHike { .. } => "PriceHike",
            Command::RemoveNames { .. } => "RemoveNames",
            Command::End => "End",
        }
    }
}

/// Token cursor over one line.
struct Args<'a> {
    line_no: usize,
    tokens: std::str::SplitWhitespace<'a>,
}

impl<'a> Args<'a> {
    fn new(line_no: usize, line: &'a str) -> Self {
        Args {
            line_no,
            tokens: line.split_whitespace(),
        }
    }

    fn word(&mut self, what: &str) -> DriverResult<&'a str> {
        self.tokens
            .next()
            .ok_or_else(|| DriverError::syntax(self.line_no, format!("missing {}", what)))
    }

    fn int(&mut self, what: &str) -> DriverResult<i64> {
        let token = self.word(what)?;
        token.parse().map_err(|_| {
            DriverError::syntax(
                self.line_no,
                format!("{} must be an integer, got '{}'", what, token),
            )
        })
    }

    fn money(&mut self, what: &str) -> DriverResult<Money> {
        let token = self.word(what)?;
        token.parse().map_err(|source| self.argument(source))
    }

    fn price(&mut self) -> DriverResult<Money> {
        let price = self.money("price")?;
        validate_price(price).map_err(|e| self.argument(e.into()))?;
        Ok(price)
    }

    fn rate(&mut self) -> DriverResult<HikeRate> {
        let token = self.word("rate")?;
        token.parse().map_err(|source| self.argument(source))
    }

    /// Reads tags up to the `0` terminator.
    fn tag_list(&mut self) -> DriverResult<Vec<Tag>> {
        let mut tags = Vec::new();
        loop {
            let tag = match self.tokens.next() {
                Some(token) => token.parse::<Tag>().map_err(|_| {
                    DriverError::syntax(
                        self.line_no,
                        format!("tag must be an integer, got '{}'", token),
                    )
                })?,
                None => {
                    return Err(DriverError::syntax(
                        self.line_no,
                        "tag list is not terminated by 0",
                    ))
                }
            };
            if tag == 0 {
                break;
            }
            tags.push(tag);
        }

        validate_tags(&tags).map_err(|e| self.argument(e.into()))?;
        Ok(tags)
    }

    fn finish(mut self) -> DriverResult<()> {
        match self.tokens.next() {
            Some(extra) => Err(DriverError::syntax(
                self.line_no,
                format!("unexpected trailing token '{}'", extra),
            )),
            None => Ok(()),
        }
    }

    fn argument(&self, source: CoreError) -> DriverError {
        DriverError::Argument {
            line: self.line_no,
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> DriverResult<Option<Command>> {
        Command::parse(1, line)
    }

    #[test]
    fn test_blank_and_comment_lines() {
        assert_eq!(parse("").unwrap(), None);
        assert_eq!(parse("   \t").unwrap(), None);
        assert_eq!(parse("# Insert 1 1.00 0").unwrap(), None);
    }

    #[test]
    fn test_insert() {
        let cmd = parse("Insert 17 19.97 475 1238 9742 0").unwrap().unwrap();
        assert_eq!(
            cmd,
            Command::Insert {
                id: 17,
                price: Money::from_cents(1997),
                tags: vec![475, 1238, 9742],
            }
        );
    }

    #[test]
    fn test_insert_without_tags() {
        let cmd = parse("Insert 3 4.5 0").unwrap().unwrap();
        assert_eq!(
            cmd,
            Command::Insert {
                id: 3,
                price: Money::from_cents(450),
                tags: vec![],
            }
        );
    }

    #[test]
    fn test_simple_commands() {
        assert_eq!(parse("Find 4").unwrap(), Some(Command::Find { id: 4 }));
        assert_eq!(parse("Delete -2").unwrap(), Some(Command::Delete { id: -2 }));
        assert_eq!(
            parse("FindMinPrice 8").unwrap(),
            Some(Command::FindMinPrice { tag: 8 })
        );
        assert_eq!(
            parse("FindMaxPrice 8").unwrap(),
            Some(Command::FindMaxPrice { tag: 8 })
        );
        assert_eq!(parse("  End  ").unwrap(), Some(Command::End));
    }

    #[test]
    fn test_range_and_hike() {
        assert_eq!(
            parse("FindPriceRange 7 1.00 3").unwrap(),
            Some(Command::FindPriceRange {
                tag: 7,
                low: Money::from_cents(100),
                high: Money::from_cents(300),
            })
        );
        assert_eq!(
            parse("PriceHike 10 20 7.5").unwrap(),
            Some(Command::PriceHike {
                low_id: 10,
                high_id: 20,
                rate: HikeRate::from_basis_points(750),
            })
        );
    }

    #[test]
    fn test_remove_names() {
        assert_eq!(
            parse("RemoveNames 1 10 99 0").unwrap(),
            Some(Command::RemoveNames {
                id: 1,
                tags: vec![10, 99],
            })
        );
    }

    #[test]
    fn test_syntax_errors() {
        assert!(matches!(parse("Frob 1"), Err(DriverError::Syntax { .. })));
        assert!(matches!(parse("Find"), Err(DriverError::Syntax { .. })));
        assert!(matches!(parse("Find x"), Err(DriverError::Syntax { .. })));
        assert!(matches!(parse("Find 1 2"), Err(DriverError::Syntax { .. })));
        assert!(matches!(
            parse("Insert 1 2.00 5 6"),
            Err(DriverError::Syntax { .. })
        ));
        assert!(matches!(
            parse("RemoveNames 1 5 0 6"),
            Err(DriverError::Syntax { .. })
        ));
    }

    #[test]
    fn test_argument_errors() {
        assert!(matches!(
            parse("Insert 1 2.001 0"),
            Err(DriverError::Argument {
                source: CoreError::InvalidMoneyFormat { .. },
                ..
            })
        ));
        assert!(matches!(
            parse("Insert 1 -2.00 0"),
            Err(DriverError::Argument {
                source: CoreError::Validation(_),
                ..
            })
        ));
        assert!(matches!(
            parse("PriceHike 1 2 -150"),
            Err(DriverError::Argument { .. })
        ));
        assert!(matches!(
            parse("PriceHike 1 2 abc"),
            Err(DriverError::Argument {
                source: CoreError::InvalidRateFormat { .. },
                ..
            })
        ));
    }

    #[test]
    fn test_error_carries_line_number() {
        let err = Command::parse(42, "Find").unwrap_err();
        assert_eq!(err.line(), Some(42));
    }

    #[test]
    fn test_name() {
        assert_eq!(Command::End.name(), "End");
        assert_eq!(Command::Find { id: 1 }.name(), "Find");
    }
}
