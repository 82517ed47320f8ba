pub mod add_role;
pub mod help;
pub mod list_roles;
pub mod setup;
pub mod test_boost;
pub mod utils;

pub use add_role::{register_add_role_command, register_edit_role_command, run_add_role};
pub use help::{register_help_command, run_help_command};
pub use list_roles::{register_list_roles_command, run_list_roles};
pub use setup::{register_setup_command, run_setup};
pub use test_boost::{register_test_command, run_test};

use serenity::builder::CreateCommand;

/// Every slash command the bot registers
pub fn all_commands() -> Vec<CreateCommand> {
    vec![
        register_help_command(),
        register_setup_command(),
        register_add_role_command(),
        register_edit_role_command(),
        register_list_roles_command(),
        register_test_command(),
    ]
}
