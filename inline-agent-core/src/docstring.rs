//! Documentation-text parser for tool descriptions
//!
//! Tools describe themselves with a structured documentation text:
//!
//! ```text
//! Get the current weather for a city.
//!
//! Parameters:
//!     location (str): the city to look up,
//!         e.g. "Seattle"
//!     unit: temperature unit, defaults to f
//!
//! Returns:
//!     a short weather summary
//! ```
//!
//! Text before the argument marker is the description. Text after the return
//! marker is appended to it. The lines in between describe parameters: the
//! indentation of the first non-blank line fixes the parameter level, lines at
//! that level start a parameter, deeper lines continue the current one and
//! shallower lines are rejected.

use crate::schema::SchemaError;

pub const DEFAULT_ARGUMENT_KEY: &str = "Parameters:";
pub const DEFAULT_RETURN_KEY: &str = "Returns:";

/// Section markers used to split a documentation text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocstringKeys {
    pub argument_key: String,
    pub return_key: String,
}

impl Default for DocstringKeys {
    fn default() -> Self {
        Self {
            argument_key: DEFAULT_ARGUMENT_KEY.to_string(),
            return_key: DEFAULT_RETURN_KEY.to_string(),
        }
    }
}

impl DocstringKeys {
    pub fn new(argument_key: impl Into<String>, return_key: impl Into<String>) -> Self {
        Self {
            argument_key: argument_key.into(),
            return_key: return_key.into(),
        }
    }
}

/// Result of parsing a documentation text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedDocstring {
    /// Whitespace-collapsed description, including the returns sentence
    pub description: String,
    /// Documented parameters in the order they appear
    pub parameters: Vec<(String, String)>,
}

impl ParsedDocstring {
    /// Look up a parameter description by exact name
    pub fn parameter(&self, name: &str) -> Option<&str> {
        self.parameters
            .iter()
            .find(|(param, _)| param == name)
            .map(|(_, description)| description.as_str())
    }
}

/// Parse a documentation text.
///
/// `function` is only used to label errors.
pub fn parse(
    function: &str,
    documentation: &str,
    keys: &DocstringKeys,
) -> Result<ParsedDocstring, SchemaError> {
    let (head, rest) = split_marker(documentation, &keys.argument_key);
    let mut description = collapse_whitespace(head);

    let mut parameters = Vec::new();
    if let Some(rest) = rest {
        let (section, returns) = split_marker(rest, &keys.return_key);

        if let Some(returns) = returns.map(collapse_whitespace) {
            if !returns.is_empty() {
                if !description.is_empty() {
                    description.push(' ');
                }
                description.push_str("This function returns ");
                description.push_str(&returns);
            }
        }

        parameters = parse_parameters(function, section)?;
    }

    Ok(ParsedDocstring {
        description,
        parameters,
    })
}

/// Split at the first occurrence of a non-empty marker
fn split_marker<'a>(text: &'a str, marker: &str) -> (&'a str, Option<&'a str>) {
    if marker.is_empty() {
        return (text, None);
    }
    match text.split_once(marker) {
        Some((before, after)) => (before, Some(after)),
        None => (text, None),
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Classification of one line relative to the parameter level
#[derive(Debug, PartialEq, Eq)]
enum Line<'a> {
    Blank,
    /// At the parameter level: starts a new parameter
    Entry(&'a str),
    /// Deeper than the parameter level: continues the current parameter
    Continuation(&'a str),
    /// Shallower than the parameter level
    Outdented,
}

#[derive(Debug)]
enum State {
    /// No parameter has been started yet
    AwaitingParameter,
    /// Collecting the description of `name`
    InParameter { name: String, description: String },
}

struct ParameterParser<'a> {
    function: &'a str,
    level: Option<usize>,
    state: State,
    parameters: Vec<(String, String)>,
}

impl<'a> ParameterParser<'a> {
    fn new(function: &'a str) -> Self {
        Self {
            function,
            level: None,
            state: State::AwaitingParameter,
            parameters: Vec::new(),
        }
    }

    fn classify<'l>(&mut self, raw: &'l str) -> Line<'l> {
        let content = raw.trim_start();
        if content.trim_end().is_empty() {
            return Line::Blank;
        }
        let indent = raw.chars().count() - content.chars().count();
        let content = content.trim_end();
        let level = *self.level.get_or_insert(indent);

        match indent.cmp(&level) {
            std::cmp::Ordering::Equal => Line::Entry(content),
            std::cmp::Ordering::Greater => Line::Continuation(content),
            std::cmp::Ordering::Less => Line::Outdented,
        }
    }

    fn feed(&mut self, line_number: usize, raw: &str) -> Result<(), SchemaError> {
        match self.classify(raw) {
            Line::Blank => Ok(()),
            Line::Outdented => Err(self.malformed(
                line_number,
                "line is indented less than the parameter level",
            )),
            Line::Entry(content) => {
                let (name, description) = split_entry(content)
                    .map_err(|reason| self.malformed(line_number, reason))?;
                self.finish_current();
                self.state = State::InParameter { name, description };
                Ok(())
            }
            Line::Continuation(content) => match &mut self.state {
                State::InParameter { description, .. } => {
                    if !description.is_empty() {
                        description.push(' ');
                    }
                    description.push_str(content);
                    Ok(())
                }
                State::AwaitingParameter => {
                    let reason = "continuation line before any parameter";
                    Err(self.malformed(line_number, reason))
                }
            },
        }
    }

    fn finish_current(&mut self) {
        if let State::InParameter { name, description } =
            std::mem::replace(&mut self.state, State::AwaitingParameter)
        {
            let description = collapse_whitespace(&description);
            self.parameters.push((name, description));
        }
    }

    fn finish(mut self) -> Vec<(String, String)> {
        self.finish_current();
        self.parameters
    }

    fn malformed(&self, line: usize, reason: &str) -> SchemaError {
        SchemaError::MalformedDocumentation {
            function: self.function.to_string(),
            line,
            reason: reason.to_string(),
        }
    }
}

/// Split `name[(hint)]: description` at the first colon
fn split_entry(content: &str) -> Result<(String, String), &'static str> {
    let (head, description) = content
        .split_once(':')
        .ok_or("parameter line has no ':' separating name and description")?;
    let head = head.trim();
    let description = description.trim();

    let (name, hint) = match head.split_once('(') {
        Some((name, hint)) if hint.ends_with(')') => {
            (name.trim(), Some(hint.trim_end_matches(')').trim()))
        }
        _ => (head, None),
    };

    if name.is_empty() {
        return Err("parameter line has an empty name");
    }

    let description = match hint {
        Some(hint) if !hint.is_empty() => {
            format!("({}) {}", hint, description).trim_end().to_string()
        }
        _ => description.to_string(),
    };

    Ok((name.to_string(), description))
}

fn parse_parameters(function: &str, section: &str) -> Result<Vec<(String, String)>, SchemaError> {
    let mut parser = ParameterParser::new(function);
    for (index, line) in section.lines().enumerate() {
        parser.feed(index + 1, line)?;
    }
    Ok(parser.finish())
}
