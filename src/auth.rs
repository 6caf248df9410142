use std::io::{self, BufRead, Write};
use std::path::Path;

use oauth2::basic::BasicClient;
use oauth2::reqwest::async_http_client;
use oauth2::{
    AuthUrl, AuthorizationCode, ClientId, ClientSecret, CsrfToken, RedirectUrl, Scope,
    TokenResponse, TokenUrl,
};
use serde::Deserialize;

use crate::error::AuthError;

/// Fixed relative path the client credentials are read from, once per run
pub const CLIENT_SECRETS_PATH: &str = "client_secrets.json";

/// OAuth2 scope allowing video uploads only
pub const UPLOAD_SCOPE: &str = "https://www.googleapis.com/auth/youtube.upload";

/// Out-of-band redirect: the provider displays the authorization code for
/// the user to paste back into the terminal
const OOB_REDIRECT: &str = "urn:ietf:wg:oauth:2.0:oob";

/// OAuth2 client credentials, from Google's client secrets JSON shape
#[derive(Debug, Clone, Deserialize)]
pub struct ClientSecrets {
    pub client_id: String,
    pub client_secret: String,
    pub auth_uri: String,
    pub token_uri: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
enum SecretsFile {
    Installed(ClientSecrets),
    Web(ClientSecrets),
}

impl ClientSecrets {
    /// Read and parse a client secrets file
    pub fn from_file(path: &Path) -> Result<Self, AuthError> {
        let contents = std::fs::read(path).map_err(|e| AuthError::SecretsReadFailed {
            path: path.to_path_buf(),
            source: e,
        })?;

        let file: SecretsFile =
            serde_json::from_slice(&contents).map_err(|e| AuthError::SecretsParseFailed {
                path: path.to_path_buf(),
                source: e,
            })?;

        Ok(match file {
            SecretsFile::Installed(secrets) | SecretsFile::Web(secrets) => secrets,
        })
    }
}

/// A bearer token authorized for video upload
#[derive(Clone)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(secret: String) -> Self {
        Self(secret)
    }

    pub fn secret(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AccessToken(..)")
    }
}

/// Run the offline authorization-code flow: print the authorization URL,
/// block for the pasted code on stdin, exchange it for a token.
pub async fn authorize(secrets: &ClientSecrets) -> Result<AccessToken, AuthError> {
    let client = BasicClient::new(
        ClientId::new(secrets.client_id.clone()),
        Some(ClientSecret::new(secrets.client_secret.clone())),
        AuthUrl::new(secrets.auth_uri.clone())?,
        Some(TokenUrl::new(secrets.token_uri.clone())?),
    )
    .set_redirect_uri(RedirectUrl::new(OOB_REDIRECT.to_string())?);

    let (auth_url, _csrf) = client
        .authorize_url(CsrfToken::new_random)
        .add_scope(Scope::new(UPLOAD_SCOPE.to_string()))
        .url();

    println!("Go here:\n\t{auth_url}");
    print!("Then enter the code: ");
    io::stdout().flush().map_err(AuthError::CodeReadFailed)?;

    let mut code = String::new();
    io::stdin()
        .lock()
        .read_line(&mut code)
        .map_err(AuthError::CodeReadFailed)?;

    let token = client
        .exchange_code(AuthorizationCode::new(code.trim().to_string()))
        .request_async(async_http_client)
        .await
        .map_err(|e| AuthError::ExchangeFailed(e.to_string()))?;

    Ok(AccessToken::new(token.access_token().secret().clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    fn write_secrets(json: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();
        file
    }

    #[test]
    fn parses_installed_app_secrets() {
        let file = write_secrets(
            r#"{"installed":{
                "client_id":"id-123",
                "client_secret":"sec-456",
                "auth_uri":"https://accounts.google.com/o/oauth2/auth",
                "token_uri":"https://oauth2.googleapis.com/token",
                "redirect_uris":["urn:ietf:wg:oauth:2.0:oob"]
            }}"#,
        );

        let secrets = ClientSecrets::from_file(file.path()).unwrap();
        assert_eq!(secrets.client_id, "id-123");
        assert_eq!(secrets.client_secret, "sec-456");
    }

    #[test]
    fn parses_web_app_secrets() {
        let file = write_secrets(
            r#"{"web":{
                "client_id":"web-id",
                "client_secret":"web-sec",
                "auth_uri":"https://accounts.google.com/o/oauth2/auth",
                "token_uri":"https://oauth2.googleapis.com/token"
            }}"#,
        );

        let secrets = ClientSecrets::from_file(file.path()).unwrap();
        assert_eq!(secrets.client_id, "web-id");
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let result = ClientSecrets::from_file(Path::new("no-such-secrets.json"));
        assert!(matches!(result, Err(AuthError::SecretsReadFailed { .. })));
    }

    #[test]
    fn unexpected_shape_is_a_parse_error() {
        let file = write_secrets(r#"{"service_account":{}}"#);
        let result = ClientSecrets::from_file(file.path());
        assert!(matches!(result, Err(AuthError::SecretsParseFailed { .. })));
    }

    #[test]
    fn access_token_debug_does_not_leak_the_secret() {
        let token = AccessToken::new("super-secret".to_string());
        assert_eq!(format!("{token:?}"), "AccessToken(..)");
    }
}
