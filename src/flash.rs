//! One-shot status messages carried across a redirect in a cookie.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

const FLASH_COOKIE: &str = "flash";

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Level {
    Success,
    Danger,
}

impl Level {
    fn as_str(self) -> &'static str {
        match self {
            Level::Success => "success",
            Level::Danger => "danger",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s {
            "success" => Some(Level::Success),
            "danger" => Some(Level::Danger),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Flash {
    pub level: Level,
    pub message: String,
}

pub fn push(jar: CookieJar, level: Level, message: &str) -> CookieJar {
    let value = format!("{}:{}", level.as_str(), urlencoding::encode(message));
    jar.add(
        Cookie::build((FLASH_COOKIE, value)).path("/").http_only(true).same_site(SameSite::Lax),
    )
}

/// Reads the pending message, if any, and clears it from the jar.
pub fn take(jar: CookieJar) -> (CookieJar, Option<Flash>) {
    let Some(cookie) = jar.get(FLASH_COOKIE) else {
        return (jar, None);
    };
    let flash = decode(cookie.value());
    (jar.remove(Cookie::build(FLASH_COOKIE).path("/")), flash)
}

fn decode(value: &str) -> Option<Flash> {
    let (level, message) = value.split_once(':')?;
    Some(Flash {
        level: Level::parse(level)?,
        message: urlencoding::decode(message).ok()?.into_owned(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pushed_message_is_taken_once() {
        let jar = push(CookieJar::new(), Level::Danger, "Failed to add user: name; 100%");

        let (jar, flash) = take(jar);
        assert_eq!(
            flash,
            Some(Flash {
                level: Level::Danger,
                message: "Failed to add user: name; 100%".to_string()
            })
        );

        let (_, again) = take(jar);
        assert_eq!(again, None);
    }

    #[test]
    fn tampered_cookie_is_ignored() {
        assert_eq!(decode("shout:hello"), None);
        assert_eq!(decode("no separator"), None);
    }
}
