pub mod branch_meta;
pub mod commit;
pub mod config;
pub mod create;
pub mod delete;
pub mod list;
pub mod pr;
pub mod setup;
pub mod stash;
pub mod switch;
pub mod work_log;

pub use branch_meta::{execute_branch_tag, execute_branch_text, TextField};
pub use commit::{execute_commit, CommitOptions};
pub use config::{execute_config, ConfigOptions};
pub use create::{execute_create, CreateOptions};
pub use delete::{execute_delete, execute_rename};
pub use list::{execute_list, ListFilter};
pub use pr::{execute_pr, PrOptions};
pub use setup::execute_setup;
pub use stash::{execute_stash, StashAction};
pub use switch::execute_switch;
pub use work_log::{execute_log, LogOptions};
