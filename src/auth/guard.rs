/// Authorization Guard
///
/// Turns request headers into an authenticated user id and checks resource
/// ownership. Every authentication failure becomes `AuthError` with a log-only
/// detail; the response for all of them is the same 401.

use actix_web::http::header::{HeaderMap, AUTHORIZATION};
use uuid::Uuid;

use crate::auth::jwt::validate_access_token;
use crate::error::AuthError;

const BEARER_PREFIX: &str = "Bearer ";
const API_KEY_PREFIX: &str = "ApiKey ";

fn extract_credential<'a>(headers: &'a HeaderMap, prefix: &str) -> Result<&'a str, AuthError> {
    let value = headers
        .get(AUTHORIZATION)
        .ok_or_else(|| AuthError::MissingToken("no Authorization header".to_string()))?
        .to_str()
        .map_err(|_| AuthError::MissingToken("Authorization header is not ASCII".to_string()))?;

    let credential = value
        .strip_prefix(prefix)
        .ok_or_else(|| AuthError::MissingToken(format!("expected {}scheme", prefix)))?
        .trim();

    if credential.is_empty() {
        return Err(AuthError::MissingToken("empty credential".to_string()));
    }
    Ok(credential)
}

/// Read the token from `Authorization: Bearer <token>`
pub fn extract_bearer(headers: &HeaderMap) -> Result<&str, AuthError> {
    extract_credential(headers, BEARER_PREFIX)
}

/// Read the key from `Authorization: ApiKey <key>`
pub fn extract_api_key(headers: &HeaderMap) -> Result<&str, AuthError> {
    extract_credential(headers, API_KEY_PREFIX)
}

/// Authenticate a request by its bearer access token
pub fn authorize(headers: &HeaderMap, secret: &str) -> Result<Uuid, AuthError> {
    let token = extract_bearer(headers)?;
    validate_access_token(token, secret).map_err(|e| AuthError::InvalidToken(e.detail()))
}

/// Whether `user_id` may mutate a resource owned by `owner_id`
pub fn authorize_ownership(user_id: Uuid, owner_id: Uuid) -> bool {
    user_id == owner_id
}

/// Compare a presented API key with the configured one in constant time
pub fn api_key_matches(presented: &str, expected: &str) -> bool {
    let (a, b) = (presented.as_bytes(), expected.as_bytes());
    if a.len() != b.len() {
        return false;
    }

    // Accumulate XOR over every byte, no early exit on the first mismatch
    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::generate_access_token;
    use actix_web::http::header::HeaderValue;

    const SECRET: &str = "valid-secret";

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_extract_bearer() {
        let headers = headers_with("Bearer abc.def.ghi");
        assert_eq!(extract_bearer(&headers).unwrap(), "abc.def.ghi");
    }

    #[test]
    fn test_missing_header() {
        let headers = HeaderMap::new();
        assert!(matches!(extract_bearer(&headers), Err(AuthError::MissingToken(_))));
    }

    #[test]
    fn test_wrong_scheme() {
        let headers = headers_with("ApiKey abc");
        assert!(matches!(extract_bearer(&headers), Err(AuthError::MissingToken(_))));
    }

    #[test]
    fn test_empty_bearer() {
        let headers = headers_with("Bearer ");
        assert!(extract_bearer(&headers).is_err());
    }

    #[test]
    fn test_extract_api_key() {
        let headers = headers_with("ApiKey f271c81ff7084ee5b99a5091b42d486e");
        assert_eq!(
            extract_api_key(&headers).unwrap(),
            "f271c81ff7084ee5b99a5091b42d486e"
        );
    }

    #[test]
    fn test_authorize_valid_token() {
        let user_id = Uuid::new_v4();
        let token = generate_access_token(user_id, SECRET, chrono::Duration::hours(1)).unwrap();
        let headers = headers_with(&format!("Bearer {}", token));

        assert_eq!(authorize(&headers, SECRET).unwrap(), user_id);
    }

    #[test]
    fn test_authorize_collapses_failures() {
        let token = generate_access_token(Uuid::new_v4(), SECRET, chrono::Duration::hours(1)).unwrap();

        let cases = vec![
            HeaderMap::new(),
            headers_with("Bearer garbage"),
            headers_with(&format!("Bearer {}", token)),
        ];

        for headers in cases {
            let result = authorize(&headers, "invalid-secret");
            assert!(matches!(
                result,
                Err(AuthError::MissingToken(_)) | Err(AuthError::InvalidToken(_))
            ));
        }
    }

    #[test]
    fn test_authorize_ownership() {
        let owner = Uuid::new_v4();
        assert!(authorize_ownership(owner, owner));
        assert!(!authorize_ownership(Uuid::new_v4(), owner));
    }

    #[test]
    fn test_api_key_matches() {
        assert!(api_key_matches("secret-key", "secret-key"));
        assert!(!api_key_matches("secret-kez", "secret-key"));
        assert!(!api_key_matches("secret", "secret-key"));
        assert!(!api_key_matches("", "secret-key"));
    }
}
