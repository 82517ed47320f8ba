pub mod interaction;
pub mod options;

pub use interaction::{defer_ephemeral, edit_reply, has_admin_permission, role_mentions};
pub use options::{get_channel_option, get_role_option, get_string_option};
