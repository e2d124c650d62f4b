pub mod input;
pub mod validator;

pub use input::*;
pub use validator::*;
