pub mod panel;
pub mod resolved;
pub mod types;
pub mod validator;

pub use panel::*;
pub use resolved::*;
pub use types::*;
pub use validator::*;
