// HTTP Basic authentication against per-user bcrypt hashes.
//
// No configured accounts means open access. A missing or wrong
// credential gets a 401 with a realm header.

use std::collections::BTreeMap;

use base64::Engine;

/// Usernames mapped to bcrypt password hashes.
pub type Accounts = BTreeMap<String, String>;

/// Check an `Authorization` header value against the account map.
pub fn password_is_correct(accounts: &Accounts, header: Option<&str>) -> bool {
    if accounts.is_empty() {
        return true; // No accounts defined in config; allow anyone.
    }

    let Some((user, pass)) = header.and_then(decode_basic) else {
        return false;
    };

    let Some(hash) = accounts.get(&user) else {
        return false; // The username provided doesn't exist.
    };

    bcrypt::verify(pass, hash).unwrap_or(false)
}

/// Decode `Basic <base64(user:pass)>` into its parts.
fn decode_basic(header: &str) -> Option<(String, String)> {
    let encoded = header.strip_prefix("Basic ")?;
    let decoded = base64::engine::general_purpose::STANDARD
        .decode(encoded.trim())
        .ok()?;
    let text = String::from_utf8(decoded).ok()?;
    let (user, pass) = text.split_once(':')?;

    Some((user.to_owned(), pass.to_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn basic(user: &str, pass: &str) -> String {
        let encoded =
            base64::engine::general_purpose::STANDARD.encode(format!("{user}:{pass}"));
        format!("Basic {encoded}")
    }

    #[test]
    fn open_access_without_accounts() {
        assert!(password_is_correct(&Accounts::new(), None));
    }

    #[test]
    fn verifies_against_bcrypt_hash() {
        let mut accounts = Accounts::new();
        accounts.insert(
            "ops".into(),
            bcrypt::hash("hunter2", bcrypt::DEFAULT_COST).expect("hash"),
        );

        assert!(password_is_correct(&accounts, Some(&basic("ops", "hunter2"))));
        assert!(!password_is_correct(&accounts, Some(&basic("ops", "wrong"))));
        assert!(!password_is_correct(&accounts, Some(&basic("ghost", "hunter2"))));
        assert!(!password_is_correct(&accounts, None));
        assert!(!password_is_correct(&accounts, Some("Bearer token")));
    }
}
