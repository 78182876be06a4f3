//! Line classification for annotated profiler output
//!
//! Every line of a callgrind-style profile falls into exactly one of four
//! classes. The attributor only ever sees the classified form, so the
//! SELF-mode skip rule is a transition on [`ProfileLine::CalleeHeader`]
//! followed by [`ProfileLine::Cost`] rather than a side effect of a regex.

use std::fmt;

/// Function identifier assigned by the profiler, scoped to one profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FunctionId(pub u32);

impl fmt::Display for FunctionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({})", self.0)
    }
}

/// `fn=(<id>) <name>` or `cfn=(<id>) <name>`; the name is omitted on repeat
/// sightings when the profiler compresses names
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header<'a> {
    pub id: FunctionId,
    pub name: Option<&'a str>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileLine<'a> {
    /// Opens a new function context
    FunctionHeader(Header<'a>),
    /// Names a callee; does not switch the current context
    CalleeHeader(Header<'a>),
    /// Instruction count for the current context
    Cost(u64),
    /// Anything else, including malformed cost lines
    Other,
}

/// Classify a single line of profiler output
pub fn classify(line: &str) -> ProfileLine<'_> {
    let line = line.trim_end();

    if let Some(rest) = line.strip_prefix("fn=") {
        return parse_header(rest).map_or(ProfileLine::Other, ProfileLine::FunctionHeader);
    }
    if let Some(rest) = line.strip_prefix("cfn=") {
        return parse_header(rest).map_or(ProfileLine::Other, ProfileLine::CalleeHeader);
    }

    parse_cost(line).map_or(ProfileLine::Other, ProfileLine::Cost)
}

fn parse_header(rest: &str) -> Option<Header<'_>> {
    let rest = rest.strip_prefix('(')?;
    let (id, name) = rest.split_once(')')?;
    let id = id.parse::<u32>().ok()?;

    let name = name.trim();
    let name = (!name.is_empty()).then_some(name);

    Some(Header {
        id: FunctionId(id),
        name,
    })
}

/// `<±int|*> <count> [<more events>...]`; the first event column is the
/// instruction count
fn parse_cost(line: &str) -> Option<u64> {
    let mut tokens = line.split_ascii_whitespace();

    let position = tokens.next()?;
    if position != "*" && position.parse::<i64>().is_err() {
        return None;
    }

    tokens.next()?.parse::<u64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_function_header_with_name() {
        assert_eq!(
            classify("fn=(12) evmc::execute(int)"),
            ProfileLine::FunctionHeader(Header {
                id: FunctionId(12),
                name: Some("evmc::execute(int)"),
            })
        );
    }

    #[test]
    fn test_compressed_header_without_name() {
        assert_eq!(
            classify("cfn=(3)"),
            ProfileLine::CalleeHeader(Header {
                id: FunctionId(3),
                name: None,
            })
        );
    }

    #[test]
    fn test_cost_line_positions() {
        assert_eq!(classify("16 4"), ProfileLine::Cost(4));
        assert_eq!(classify("+3 7"), ProfileLine::Cost(7));
        assert_eq!(classify("-2 1"), ProfileLine::Cost(1));
        assert_eq!(classify("* 9"), ProfileLine::Cost(9));
    }

    #[test]
    fn test_cost_line_extra_event_columns() {
        assert_eq!(classify("0 10 3 2"), ProfileLine::Cost(10));
    }

    #[test]
    fn test_malformed_lines_are_other() {
        assert_eq!(classify("0 -5"), ProfileLine::Other);
        assert_eq!(classify("x 5"), ProfileLine::Other);
        assert_eq!(classify("12"), ProfileLine::Other);
        assert_eq!(classify("fn=(x) foo"), ProfileLine::Other);
        assert_eq!(classify("fn=main"), ProfileLine::Other);
        assert_eq!(classify("calls=1 0"), ProfileLine::Other);
        assert_eq!(classify("events: Ir"), ProfileLine::Other);
        assert_eq!(classify(""), ProfileLine::Other);
    }

    #[test]
    fn test_trailing_carriage_return() {
        assert_eq!(classify("0 10\r"), ProfileLine::Cost(10));
    }
}
