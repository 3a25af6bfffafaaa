//! Built-in diagnostic checks

pub mod build_info;
pub mod config;
pub mod interface_tree;
pub mod method_classes;
pub mod quit_handler;

pub use build_info::BuildInfoCheck;
pub use config::ConfigCheck;
pub use interface_tree::InterfaceTreeCheck;
pub use method_classes::MethodClassCheck;
pub use quit_handler::QuitHandlerCheck;
