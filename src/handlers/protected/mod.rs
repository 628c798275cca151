// handlers/protected/mod.rs - Protected handlers (session cookie required)
//
// Security Level: valid `auth-token` cookie for an existing user
// Middleware: require_session, which injects CurrentUser
//
// Every query here is filtered by CurrentUser's id.

pub mod auth;    // GET /me
pub mod catalog; // GET /models, /products, /photoshoots[/:id]

pub use auth::*;
pub use catalog::*;
