/// RS256 access-token handling shared by Hoot services
///
/// The identity service signs tokens with its private key. Every other
/// service only holds the public key and calls `initialize_jwt_validation_only`
/// once at startup; HMAC algorithms are rejected outright.
///
/// ```rust,no_run
/// use crypto_core::jwt;
///
/// let pem = jwt::load_validation_key().expect("JWT public key required");
/// jwt::initialize_jwt_validation_only(&pem).expect("Failed to initialize JWT keys");
/// ```
use anyhow::{anyhow, bail, Context, Result};
use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, Algorithm, DecodingKey, EncodingKey, Header, TokenData, Validation,
};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

const ALGORITHM: Algorithm = Algorithm::RS256;
const ACCESS_TOKEN_TTL_HOURS: i64 = 1;
const ACCESS: &str = "access";

/// Inline PEM public key; literal `\n` sequences are accepted
pub const PUBLIC_KEY_ENV: &str = "JWT_PUBLIC_KEY_PEM";
/// Path to a PEM public key, used when `JWT_PUBLIC_KEY_PEM` is unset
pub const PUBLIC_KEY_FILE_ENV: &str = "JWT_PUBLIC_KEY_FILE";

static SIGNING_KEY: OnceCell<EncodingKey> = OnceCell::new();
static VERIFYING_KEY: OnceCell<DecodingKey> = OnceCell::new();

/// Token payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id as a UUID string
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
    /// `access` or `refresh`
    pub token_type: String,
    #[serde(default)]
    pub username: String,
}

impl Claims {
    pub fn user_id(&self) -> Result<Uuid> {
        Uuid::parse_str(&self.sub).with_context(|| format!("subject {:?} is not a UUID", self.sub))
    }
}

fn parse_public_key(pem: &str) -> Result<DecodingKey> {
    DecodingKey::from_rsa_pem(pem.as_bytes()).context("Failed to parse RSA public key")
}

fn install_verifying_key(key: DecodingKey) -> Result<()> {
    VERIFYING_KEY
        .set(key)
        .map_err(|_| anyhow!("JWT verifying key already initialized"))
}

/// Install both halves of the key pair (identity service and tests).
///
/// Keys are process-global and can be set once.
pub fn initialize_jwt_keys(private_key_pem: &str, public_key_pem: &str) -> Result<()> {
    let signing = EncodingKey::from_rsa_pem(private_key_pem.as_bytes())
        .context("Failed to parse RSA private key")?;
    let verifying = parse_public_key(public_key_pem)?;

    SIGNING_KEY
        .set(signing)
        .map_err(|_| anyhow!("JWT signing key already initialized"))?;
    install_verifying_key(verifying)
}

/// Install only the public key; tokens can be checked but not issued.
pub fn initialize_jwt_validation_only(public_key_pem: &str) -> Result<()> {
    install_verifying_key(parse_public_key(public_key_pem)?)
}

/// Read the public key PEM from `JWT_PUBLIC_KEY_PEM` or `JWT_PUBLIC_KEY_FILE`
pub fn load_validation_key() -> Result<String> {
    match std::env::var(PUBLIC_KEY_ENV) {
        Ok(pem) if !pem.trim().is_empty() => return Ok(pem.replace("\\n", "\n")),
        _ => {}
    }

    let path = std::env::var(PUBLIC_KEY_FILE_ENV)
        .map_err(|_| anyhow!("neither {PUBLIC_KEY_ENV} nor {PUBLIC_KEY_FILE_ENV} is set"))?;
    std::fs::read_to_string(&path).with_context(|| format!("Failed to read {path}"))
}

/// Issue a one-hour access token
pub fn generate_access_token(user_id: Uuid, username: &str) -> Result<String> {
    let issued = Utc::now();
    encode_claims(&Claims {
        sub: user_id.to_string(),
        iat: issued.timestamp(),
        exp: (issued + Duration::hours(ACCESS_TOKEN_TTL_HOURS)).timestamp(),
        token_type: ACCESS.to_string(),
        username: username.to_string(),
    })
}

pub fn encode_claims(claims: &Claims) -> Result<String> {
    let key = SIGNING_KEY
        .get()
        .ok_or_else(|| anyhow!("JWT signing key not initialized"))?;
    encode(&Header::new(ALGORITHM), claims, key).context("Failed to sign token")
}

/// Check signature and expiry of a raw token (no `Bearer ` prefix)
pub fn validate_token(token: &str) -> Result<TokenData<Claims>> {
    let key = VERIFYING_KEY
        .get()
        .ok_or_else(|| anyhow!("JWT verifying key not initialized"))?;

    let mut validation = Validation::new(ALGORITHM);
    validation.validate_exp = true;
    decode::<Claims>(token, key, &validation).context("Token validation failed")
}

/// Like `validate_token`, but refresh tokens are refused
pub fn validate_access_token(token: &str) -> Result<Claims> {
    let claims = validate_token(token)?.claims;
    if claims.token_type != ACCESS {
        bail!("expected an access token, got {}", claims.token_type);
    }
    Ok(claims)
}
