use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

/// Cookie name for the session token
pub const AUTH_COOKIE_NAME: &str = "auth-token";

/// Build the `auth-token` cookie carrying a freshly issued session token.
pub fn session_cookie(token: String, ttl: chrono::Duration, secure: bool) -> Cookie<'static> {
    Cookie::build((AUTH_COOKIE_NAME, token))
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(time::Duration::seconds(ttl.num_seconds()))
        .build()
}

/// Expired, empty `auth-token` cookie; path must match the one it was set with.
pub fn removal_cookie(secure: bool) -> Cookie<'static> {
    let mut cookie = Cookie::build((AUTH_COOKIE_NAME, ""))
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .path("/")
        .build();
    cookie.make_removal();
    cookie
}

/// Extract the session token from the request cookies, ignoring empty values.
pub fn token_from_jar(jar: &CookieJar) -> Option<String> {
    jar.get(AUTH_COOKIE_NAME)
        .map(|cookie| cookie.value().trim().to_string())
        .filter(|value| !value.is_empty())
}
