/// Authentication module
///
/// Access token issuance/validation, password hashing, refresh tokens, the
/// session manager and the authorization guard.

mod claims;
mod extractor;
mod guard;
mod jwt;
mod password;
mod refresh_token;
mod session;

pub use claims::{Claims, TOKEN_ISSUER};
pub use extractor::{AuthenticatedUser, ZingPayCaller};
pub use guard::{
    api_key_matches, authorize, authorize_ownership, extract_api_key, extract_bearer,
};
pub use jwt::{generate_access_token, validate_access_token, TokenError};
pub use password::{CredentialHasher, PasswordError};
pub use refresh_token::{
    generate_refresh_token, hash_token, RefreshTokenRecord, RefreshTokenState,
};
pub use session::{LoginOutcome, SessionManager};
