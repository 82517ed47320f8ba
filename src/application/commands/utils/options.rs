use serenity::all::{ChannelId, CommandDataOption, CommandDataOptionValue, RoleId};

fn find_option<'a>(options: &'a [CommandDataOption], name: &str) -> Option<&'a CommandDataOptionValue> {
    options.iter().find(|opt| opt.name == name).map(|opt| &opt.value)
}

/// Extract a string option from a slash command by name
pub fn get_string_option(options: &[CommandDataOption], name: &str) -> Option<String> {
    match find_option(options, name)? {
        CommandDataOptionValue::String(s) => Some(s.clone()),
        _ => None,
    }
}

pub fn get_role_option(options: &[CommandDataOption], name: &str) -> Option<RoleId> {
    match find_option(options, name)? {
        CommandDataOptionValue::Role(role_id) => Some(*role_id),
        _ => None,
    }
}

pub fn get_channel_option(options: &[CommandDataOption], name: &str) -> Option<ChannelId> {
    match find_option(options, name)? {
        CommandDataOptionValue::Channel(channel_id) => Some(*channel_id),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn options() -> Vec<CommandDataOption> {
        serde_json::from_value(json!([
            { "name": "action", "type": 3, "value": "boost" },
            { "name": "role1", "type": 8, "value": "10" },
            { "name": "channel", "type": 7, "value": "777" }
        ]))
        .unwrap()
    }

    #[test]
    fn reads_options_by_name() {
        let options = options();

        assert_eq!(get_string_option(&options, "action").as_deref(), Some("boost"));
        assert_eq!(get_role_option(&options, "role1"), Some(RoleId::new(10)));
        assert_eq!(get_channel_option(&options, "channel"), Some(ChannelId::new(777)));
    }

    #[test]
    fn wrong_kind_or_missing_is_none() {
        let options = options();

        assert_eq!(get_role_option(&options, "action"), None);
        assert_eq!(get_string_option(&options, "role2"), None);
    }
}
