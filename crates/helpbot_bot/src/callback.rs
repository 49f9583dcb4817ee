//! Callback button payloads: `open:<id>` and `broadcast:<id>`.

use helpbot_core::ItemId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallbackAction {
    /// Show the item caption in place of the results message.
    Open(ItemId),
    /// Post the item to the target chat.
    Broadcast(ItemId),
}

impl CallbackAction {
    pub fn parse(data: &str) -> Option<Self> {
        let (kind, raw_id) = data.split_once(':')?;
        let id = raw_id.trim().parse::<ItemId>().ok()?;
        match kind {
            "open" => Some(Self::Open(id)),
            "broadcast" => Some(Self::Broadcast(id)),
            _ => None,
        }
    }

    pub fn encode(&self) -> String {
        match self {
            Self::Open(id) => format!("open:{id}"),
            Self::Broadcast(id) => format!("broadcast:{id}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::CallbackAction;

    #[test]
    fn parses_known_actions() {
        assert_eq!(CallbackAction::parse("open:12"), Some(CallbackAction::Open(12)));
        assert_eq!(
            CallbackAction::parse("broadcast:3"),
            Some(CallbackAction::Broadcast(3))
        );
        assert_eq!(CallbackAction::Open(12).encode(), "open:12");
    }

    #[test]
    fn malformed_payloads_are_ignored() {
        assert_eq!(CallbackAction::parse("open:"), None);
        assert_eq!(CallbackAction::parse("open:x"), None);
        assert_eq!(CallbackAction::parse("delete:1"), None);
        assert_eq!(CallbackAction::parse("broadcast"), None);
    }
}
