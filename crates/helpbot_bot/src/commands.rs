use teloxide::utils::command::BotCommands;

#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "These commands are supported:")]
pub enum Command {
    #[command(description = "welcome message and picker buttons")]
    Start,
    #[command(description = "show this help")]
    Help,
    #[command(description = "open the inline picker in this chat")]
    Picker,
    #[command(description = "save a link: /add <url> [text + #tags]")]
    Add(String),
    #[command(description = "search saved items")]
    Search(String),
    #[command(description = "browse by tag")]
    Tag(String),
    #[command(description = "list tags in use")]
    Tags,
    #[command(description = "(admin) export CSV")]
    Export,
    #[command(description = "(admin) remove an item")]
    Delete(String),
    #[command(description = "(admin) repost an item to the target chat")]
    Broadcast(String),
}

/// Parses a numeric item id argument. Only plain digits are accepted.
pub fn parse_item_id(arg: &str) -> Option<i64> {
    let first = arg.split_whitespace().next()?;
    if !first.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    first.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::{parse_item_id, Command};
    use teloxide::utils::command::BotCommands;

    #[test]
    fn commands_keep_their_argument_text() {
        assert_eq!(
            Command::parse("/search rust book", "helpbot").unwrap(),
            Command::Search("rust book".to_string())
        );
        assert_eq!(
            Command::parse("/add@helpbot https://a.io #x", "helpbot").unwrap(),
            Command::Add("https://a.io #x".to_string())
        );
        assert_eq!(Command::parse("/tags", "helpbot").unwrap(), Command::Tags);
    }

    #[test]
    fn unknown_commands_do_not_parse() {
        assert!(Command::parse("/unknown https://a.io", "helpbot").is_err());
        assert!(Command::parse("https://a.io", "helpbot").is_err());
    }

    #[test]
    fn item_ids_must_be_plain_digits() {
        assert_eq!(parse_item_id(" 42 extra"), Some(42));
        assert_eq!(parse_item_id("-3"), None);
        assert_eq!(parse_item_id("4a"), None);
        assert_eq!(parse_item_id(""), None);
    }
}
