use clap::Parser;
use std::ffi::OsString;

#[derive(Parser, Debug)]
#[command(name = "travel_budget")]
#[command(about = "Create and update Google Sheets spreadsheets that track a travel budget")]
#[command(version)]
pub struct Args {
    /// Create a spreadsheet: "title,amount"
    #[arg(short = 'c', long, value_name = "TITLE,AMOUNT")]
    pub create: Option<String>,

    /// Delete every spreadsheet visible to the service account
    #[arg(long = "clear_all", visible_alias = "clear-all")]
    pub clear_all: bool,

    /// Spreadsheet ID to work on (defaults to the first one listed)
    #[arg(short = 'i', long, value_name = "ID")]
    pub id: Option<String>,

    /// List all spreadsheets
    #[arg(long)]
    pub list: bool,

    /// Append an expense row: "description,type,quantity,price[,cost]"
    #[arg(short = 'u', long, value_name = "ROW")]
    pub update: Option<String>,

    /// Print the tracked range of the selected spreadsheet
    #[arg(short = 'r', long)]
    pub read: bool,

    /// Log level
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Path to config file
    #[arg(long, default_value = "config/config.toml")]
    pub config: String,
}

impl Args {
    /// Parses the process arguments, accepting the two-letter short flags.
    pub fn parse_with_legacy_flags() -> Self {
        Args::parse_from(expand_legacy_flags(std::env::args_os()))
    }
}

/// Rewrites `-cl` and `-ls` to their long forms.
///
/// clap only knows single-character short flags, so `-cl` would otherwise be
/// read as `-c l`.
pub fn expand_legacy_flags<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    args.into_iter()
        .map(|arg| match arg.to_str() {
            Some("-cl") => OsString::from("--clear_all"),
            Some("-ls") => OsString::from("--list"),
            _ => arg,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> Args {
        Args::parse_from(expand_legacy_flags(argv.iter().map(OsString::from)))
    }

    #[test]
    fn legacy_short_flags_map_to_long_flags() {
        let args = parse(&["travel_budget", "-cl"]);
        assert!(args.clear_all);
        assert!(args.create.is_none());

        let args = parse(&["travel_budget", "-ls"]);
        assert!(args.list);
    }

    #[test]
    fn legacy_flag_values_are_not_rewritten() {
        // only whole arguments are rewritten, a title may still be "-ls"-like text
        let args = parse(&["travel_budget", "-c", "Trip -ls,100"]);
        assert_eq!(args.create.as_deref(), Some("Trip -ls,100"));
        assert!(!args.list);
    }

    #[test]
    fn update_with_id() {
        let args = parse(&["travel_budget", "-i", "abc", "-u", "Hotel,Lodging,1,200,200"]);
        assert_eq!(args.id.as_deref(), Some("abc"));
        assert_eq!(args.update.as_deref(), Some("Hotel,Lodging,1,200,200"));
        assert_eq!(args.log_level, "info");
    }

    #[test]
    fn clear_all_accepts_both_spellings() {
        assert!(parse(&["travel_budget", "--clear_all"]).clear_all);
        assert!(parse(&["travel_budget", "--clear-all"]).clear_all);
    }
}
