//! Console channels — terminal implementations of the presenter and the
//! platform gateways, used by the binary.

pub mod cli;
pub mod files;

pub use cli::{Console, ConsolePermissionGateway, ConsolePresenter};
pub use files::FileCaptureGateway;
