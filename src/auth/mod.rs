//! Session issuing and verification, cookie plumbing and the external
//! identity provider seam.

pub mod cookie;
pub mod provider;
pub mod session;

pub use cookie::{removal_cookie, session_cookie, token_from_jar, AUTH_COOKIE_NAME};
pub use provider::{GoTrueProvider, IdentityProvider, ProviderError, ProviderUser};
pub use session::{Claims, IssuedSession, SessionError, SessionKeys};
