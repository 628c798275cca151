// handlers/public/auth/mod.rs - Public authentication handlers
//
// Session acquisition endpoints that do not require a session cookie.

pub mod session; // POST /signin, POST /signout
pub mod user;    // POST /signup
pub mod utils;

pub use session::{signin, signout};
pub use user::signup;
