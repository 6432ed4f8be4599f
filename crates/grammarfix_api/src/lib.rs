//! Remote action surface for the grammar-fix store.

pub mod api;

pub use api::{
    core_version, dispatch, handle_action, init_logging, logging_setup_error, ping, Action,
    ActionErrorBody, ActionResponse,
};
