// handlers/mod.rs - Two-tier handler layout
//
// Public (no session) → Protected (session cookie + user lookup)

pub mod health;
pub mod protected; // Session required: /me, /models, /products, /photoshoots
pub mod public;    // No session: /signup, /signin, /signout
