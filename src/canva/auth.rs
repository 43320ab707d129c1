// src/canva/auth.rs
//! OAuth 2.0 authorization code flow with PKCE for Canva Connect.

use super::client::{CanvaApi, ClientCredentials};
use super::tokens::{TokenFile, TokenSet};
use crate::constants::{CANVA_AUTHORIZE_URL, CANVA_SCOPES};
use crate::error::AppError;
use crate::types::AccessToken;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use rand::RngCore;
use sha2::{Digest, Sha256};
use std::sync::Mutex;
use url::Url;

/// A PKCE verifier and the challenge derived from it (method `S256`).
#[derive(Debug, Clone)]
pub struct PkcePair {
    pub verifier: String,
    pub challenge: String,
}

impl PkcePair {
    pub fn generate() -> Self {
        let mut bytes = [0u8; 64];
        rand::rng().fill_bytes(&mut bytes);
        Self::from_verifier(URL_SAFE_NO_PAD.encode(bytes))
    }

    pub fn from_verifier(verifier: String) -> Self {
        let challenge = code_challenge(&verifier);
        Self { verifier, challenge }
    }
}

/// base64url(SHA-256(verifier)) without padding.
pub fn code_challenge(verifier: &str) -> String {
    URL_SAFE_NO_PAD.encode(Sha256::digest(verifier.as_bytes()))
}

pub fn authorize_url(
    client_id: &str,
    redirect_uri: &str,
    challenge: &str,
    state: &str,
) -> Result<Url, AppError> {
    Url::parse_with_params(
        CANVA_AUTHORIZE_URL,
        &[
            ("code_challenge", challenge),
            ("code_challenge_method", "S256"),
            ("scope", CANVA_SCOPES),
            ("response_type", "code"),
            ("client_id", client_id),
            ("redirect_uri", redirect_uri),
            ("state", state),
        ],
    )
    .map_err(|e| AppError::MissingConfiguration(format!("Invalid authorize URL: {}", e)))
}

#[derive(Debug, Clone)]
struct PendingAuthorization {
    pkce: PkcePair,
    state: String,
}

/// State of one interactive authorization, shared by the auth server's
/// handlers.
#[derive(Debug)]
pub struct OAuthSession {
    credentials: ClientCredentials,
    token_file: TokenFile,
    pending: Mutex<Option<PendingAuthorization>>,
    access_token: Mutex<Option<AccessToken>>,
}

impl OAuthSession {
    pub fn new(credentials: ClientCredentials, token_file: TokenFile) -> Self {
        Self {
            credentials,
            token_file,
            pending: Mutex::new(None),
            access_token: Mutex::new(None),
        }
    }

    /// Starts a new authorization and returns the URL to send the user to.
    /// Any earlier pending authorization is discarded.
    pub fn begin(&self) -> Result<Url, AppError> {
        let pkce = PkcePair::generate();
        let state = uuid::Uuid::new_v4().simple().to_string();
        let url = authorize_url(
            &self.credentials.client_id,
            &self.credentials.redirect_uri,
            &pkce.challenge,
            &state,
        )?;
        *self.pending.lock().map_err(|_| poisoned())? = Some(PendingAuthorization { pkce, state });
        Ok(url)
    }

    /// Redeems the callback's authorization code and writes the token file.
    pub async fn complete(
        &self,
        api: &dyn CanvaApi,
        code: &str,
        state: Option<&str>,
    ) -> Result<TokenSet, AppError> {
        let pending = self
            .pending
            .lock()
            .map_err(|_| poisoned())?
            .take()
            .ok_or_else(|| {
                AppError::Authentication("No authorization in progress; start again at /".to_string())
            })?;
        if state != Some(pending.state.as_str()) {
            return Err(AppError::Authentication(
                "OAuth state mismatch; start again at /".to_string(),
            ));
        }

        let response = api
            .exchange_code(&self.credentials, code, &pending.pkce.verifier)
            .await?;
        if let Some(expires_in) = response.expires_in {
            log::info!(
                "Access token obtained, expires in {} seconds ({:.1} hours)",
                expires_in,
                expires_in as f64 / 3600.0
            );
        }

        let tokens = TokenSet {
            access_token: AccessToken::new(response.access_token)?,
            refresh_token: response.refresh_token,
        };
        self.token_file.save(&tokens)?;
        *self.access_token.lock().map_err(|_| poisoned())? = Some(tokens.access_token.clone());
        Ok(tokens)
    }

    /// The token obtained in this session, if the flow completed.
    pub fn access_token(&self) -> Option<AccessToken> {
        self.access_token.lock().ok().and_then(|token| token.clone())
    }
}

fn poisoned() -> AppError {
    AppError::InternalError {
        message: "OAuth session lock poisoned".to_string(),
        source: None,
    }
}

/// Confirms the stored token works and returns the Canva user id.
pub async fn check_tokens(api: &dyn CanvaApi, token_file: &TokenFile) -> Result<String, AppError> {
    let token = token_file.access_token()?;
    log::info!("Validating Canva access token...");

    let user = api.current_user(&token).await.map_err(|e| match e {
        AppError::ServiceError { status, message, .. } => {
            AppError::Authentication(format!("Token validation failed ({}): {}", status, message))
        }
        other => other,
    })?;

    user.team_user
        .and_then(|team_user| team_user.user_id)
        .ok_or_else(|| AppError::Authentication("Invalid response format from users/me".to_string()))
        .inspect(|user_id| log::info!("Token is valid (user {})", user_id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rfc7636_challenge() {
        let pair = PkcePair::from_verifier("dBjftJeZ4CVP-mB92K27uhbUJU1p1r_wW1gFWFOEjXk".to_string());
        assert_eq!(pair.challenge, "E9Melhoa2OwvFrEMTJguCHaoeK1t8URWbuGJSstw-cM");
    }

    #[test]
    fn generated_verifier_is_url_safe() {
        let pair = PkcePair::generate();
        // 64 bytes without padding
        assert_eq!(pair.verifier.len(), 86);
        assert!(pair
            .verifier
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
        assert_eq!(pair.challenge, code_challenge(&pair.verifier));
    }

    #[test]
    fn authorize_url_carries_pkce_and_state() {
        let url = authorize_url("client", "http://127.0.0.1:8000/callback", "chal", "st").unwrap();
        let params: std::collections::HashMap<_, _> = url.query_pairs().into_owned().collect();
        assert_eq!(params["code_challenge"], "chal");
        assert_eq!(params["code_challenge_method"], "S256");
        assert_eq!(params["redirect_uri"], "http://127.0.0.1:8000/callback");
        assert_eq!(params["state"], "st");
        assert!(params["scope"].contains("asset:write"));
    }
}
