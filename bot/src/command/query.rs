use crate::command::region::{self, Region};

pub const COMMAND_PREFIX: &str = "!!";
pub const COMMAND_ALIASES: &[&str] = &[
    "corona",
    "coronavirus",
    "virus",
    "corona_virus",
    "covid",
    "covid-19",
];

const NATION_TOKENS: &[&str] = &["US", "UNITED STATES", "AMERICA"];
const PLOT_TOKENS: &[&str] = &["PLOT", "GRAPH"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Nation,
    /// Upper-cased token still waiting for region lookup.
    Named(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub target: Target,
    pub plot: bool,
}

/// Where a query's records come from once the target is resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    Nation,
    Region(Region),
}

impl Location {
    pub fn code(&self) -> &'static str {
        match self {
            Location::Nation => "US",
            Location::Region(region) => region.code,
        }
    }

    /// How the location reads inside a reply sentence.
    pub fn reply_name(&self) -> String {
        match self {
            Location::Nation => "the US".to_string(),
            Location::Region(region) => region.name.to_uppercase(),
        }
    }

    /// Chart key, also used as the report's location label.
    pub fn label(&self) -> String {
        match self {
            Location::Nation => "united_states".to_string(),
            Location::Region(region) => region.name.to_string(),
        }
    }
}

fn is_command_alias(token: &str) -> bool {
    let bare = token.strip_prefix(COMMAND_PREFIX).unwrap_or(token);
    COMMAND_ALIASES
        .iter()
        .any(|alias| alias.eq_ignore_ascii_case(bare))
}

/// Turns chat tokens into a query. A leading command alias is ignored.
///
/// The nation is targeted when there are no tokens, when any token names it,
/// or when the only token asks for a plot. Otherwise the first token is the
/// region.
pub fn parse_tokens<S: AsRef<str>>(tokens: &[S]) -> Query {
    let mut args: Vec<String> = tokens
        .iter()
        .map(|token| token.as_ref().trim().to_uppercase())
        .filter(|token| !token.is_empty())
        .collect();
    if args.first().is_some_and(|first| is_command_alias(first)) {
        args.remove(0);
    }

    let plot = args
        .iter()
        .any(|arg| PLOT_TOKENS.contains(&arg.as_str()));
    let names_nation = args
        .iter()
        .any(|arg| NATION_TOKENS.contains(&arg.as_str()));

    let target = match args.first() {
        None => Target::Nation,
        Some(_) if names_nation => Target::Nation,
        Some(only) if args.len() == 1 && PLOT_TOKENS.contains(&only.as_str()) => Target::Nation,
        Some(first) => Target::Named(first.clone()),
    };

    Query { target, plot }
}

pub fn resolve_target(target: &Target) -> Option<Location> {
    match target {
        Target::Nation => Some(Location::Nation),
        Target::Named(token) => region::resolve(token).map(Location::Region),
    }
}
