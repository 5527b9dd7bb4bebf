pub mod menu;
pub mod operation;
pub mod parameter;
pub mod request_body;
pub mod response;
pub mod security;
pub mod server;

pub use menu::{GroupContext, MenuItem, MenuItemKind};
pub use operation::{ActivationState, OperationView};
pub use parameter::ParameterView;
pub use request_body::RequestBodyView;
pub use response::{ResponseKind, ResponseView, StatusFamily};
pub use security::{SecurityRequirementView, SecuritySchemeView};
pub use server::NormalizedServer;
