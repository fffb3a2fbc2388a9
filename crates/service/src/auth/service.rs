use std::sync::Arc;

use configs::RegistrationMode;
use tracing::{debug, info, instrument, warn};

use super::domain::{AccountSummary, Identity, LoginInput, LoginSession, NewAccount, RegisterInput};
use super::password::{CredentialHasher, PASSWORD_ALGORITHM};
use super::repository::AccountRepository;
use super::resolver::resolve_account;
use super::token::{TokenIssuer, TokenType};
use crate::errors::ServiceError;
use crate::metrics;

/// Registration rules.
#[derive(Debug, Clone, Copy)]
pub struct RegistrationPolicy {
    pub mode: RegistrationMode,
    pub password_min_length: usize,
}

impl Default for RegistrationPolicy {
    fn default() -> Self { Self { mode: RegistrationMode::Explicit, password_min_length: 1 } }
}

impl From<&configs::AuthConfig> for RegistrationPolicy {
    fn from(cfg: &configs::AuthConfig) -> Self {
        Self { mode: cfg.registration_mode, password_min_length: cfg.password_min_length.max(1) }
    }
}

fn non_empty(v: Option<String>) -> Option<String> {
    v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

/// Auth business service independent of web framework
pub struct AuthService<R: AccountRepository + ?Sized> {
    repo: Arc<R>,
    hasher: Arc<CredentialHasher>,
    issuer: Arc<TokenIssuer>,
    policy: RegistrationPolicy,
}

impl<R: AccountRepository + ?Sized> AuthService<R> {
    pub fn new(repo: Arc<R>, hasher: Arc<CredentialHasher>, issuer: Arc<TokenIssuer>, policy: RegistrationPolicy) -> Self {
        Self { repo, hasher, issuer, policy }
    }

    pub fn issuer(&self) -> &Arc<TokenIssuer> { &self.issuer }

    /// Register a new account with a hashed password.
    ///
    /// The username comes from `username`, else `name`, else (in
    /// `email_as_username` mode) the email itself.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use service::auth::domain::RegisterInput;
    /// use service::auth::password::{CredentialHasher, PasswordParams};
    /// use service::auth::repository::memory::InMemoryAccountRepository;
    /// use service::auth::token::{SigningKeys, TokenIssuer, TokenSettings};
    /// use service::auth::AuthService;
    /// let params = PasswordParams { memory_kib: 64, iterations: 1, parallelism: 1 };
    /// let svc = AuthService::new(
    ///     Arc::new(InMemoryAccountRepository::new()),
    ///     Arc::new(CredentialHasher::new(params).unwrap()),
    ///     Arc::new(TokenIssuer::new(SigningKeys::shared(b"doc-secret"), TokenSettings::default())),
    ///     Default::default(),
    /// );
    /// let input = RegisterInput {
    ///     username: Some("alice".into()),
    ///     email: Some("alice@x.com".into()),
    ///     password: Some("p1".into()),
    ///     ..Default::default()
    /// };
    /// let summary = tokio_test::block_on(svc.register(input)).unwrap();
    /// assert_eq!(summary.username, "alice");
    /// ```
    #[instrument(skip(self, input), fields(email = %input.email.as_deref().unwrap_or("")))]
    pub async fn register(&self, input: RegisterInput) -> Result<AccountSummary, ServiceError> {
        let res = self.register_inner(input).await;
        metrics::REGISTRATIONS_TOTAL.with_label_values(&[metrics::outcome(&res)]).inc();
        res
    }

    async fn register_inner(&self, input: RegisterInput) -> Result<AccountSummary, ServiceError> {
        let email = non_empty(input.email).ok_or_else(|| ServiceError::validation("email required"))?;
        let password = input
            .password
            .filter(|p| !p.is_empty())
            .ok_or_else(|| ServiceError::validation("password required"))?;
        if password.chars().count() < self.policy.password_min_length {
            return Err(ServiceError::validation(format!(
                "password too short (>={})",
                self.policy.password_min_length
            )));
        }
        let username = match non_empty(input.username).or_else(|| non_empty(input.name)) {
            Some(u) => u,
            None => match self.policy.mode {
                RegistrationMode::Explicit => return Err(ServiceError::validation("username required")),
                RegistrationMode::EmailAsUsername => email.clone(),
            },
        };
        let first_name = input.first_name.unwrap_or_default();
        let last_name = input.last_name.unwrap_or_default();
        models::account::validate_username(&username)?;
        models::account::validate_email(&email)?;
        models::account::validate_name(&first_name)?;
        models::account::validate_name(&last_name)?;

        let password_hash = self.hash_password(password).await?;
        let created = self
            .repo
            .create_account(NewAccount {
                username,
                email,
                password_hash,
                password_algorithm: PASSWORD_ALGORITHM.to_string(),
                first_name,
                last_name,
            })
            .await
            .map_err(|e| {
                match &e {
                    ServiceError::DuplicateUsername | ServiceError::DuplicateEmail => info!(reason = e.kind(), "registration_rejected"),
                    ServiceError::StoreUnavailable(msg) => warn!(error = %msg, "registration_store_failure"),
                    _ => {}
                }
                e
            })?;
        info!(account_id = created.id, username = %created.username, "account_registered");
        Ok(created.into())
    }

    /// Verify a login identifier and password.
    ///
    /// Unknown identifier, inactive account and wrong password all return
    /// `InvalidCredentials`; only debug logs say which. A store outage is
    /// returned as `StoreUnavailable`, never as a credential failure.
    #[instrument(skip(self, input))]
    pub async fn authenticate(&self, input: &LoginInput) -> Result<Identity, ServiceError> {
        let identifier = input
            .identifier()
            .map(str::to_string)
            .ok_or_else(|| ServiceError::validation("username and password are required"))?;
        let password = input
            .password
            .clone()
            .filter(|p| !p.is_empty())
            .ok_or_else(|| ServiceError::validation("username and password are required"))?;

        let Some((account, resolved_by)) = resolve_account(self.repo.as_ref(), &identifier).await? else {
            // Same hashing work as a real account.
            self.verify_password(password, None).await?;
            debug!(reason = "unknown_identifier", "login_rejected");
            return Err(ServiceError::InvalidCredentials);
        };

        if !self.verify_password(password, Some(account.password_hash.clone())).await? {
            debug!(account_id = account.id, reason = "password_mismatch", "login_rejected");
            return Err(ServiceError::InvalidCredentials);
        }
        if !account.is_active {
            debug!(account_id = account.id, reason = "inactive", "login_rejected");
            return Err(ServiceError::InvalidCredentials);
        }
        debug!(account_id = account.id, resolved_by = resolved_by.as_str(), "credentials_verified");
        Ok(Identity::from(&account))
    }

    /// Authenticate and issue an access/refresh token pair.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use service::auth::domain::{LoginInput, RegisterInput};
    /// use service::auth::password::{CredentialHasher, PasswordParams};
    /// use service::auth::repository::memory::InMemoryAccountRepository;
    /// use service::auth::token::{SigningKeys, TokenIssuer, TokenSettings};
    /// use service::auth::AuthService;
    /// let params = PasswordParams { memory_kib: 64, iterations: 1, parallelism: 1 };
    /// let svc = AuthService::new(
    ///     Arc::new(InMemoryAccountRepository::new()),
    ///     Arc::new(CredentialHasher::new(params).unwrap()),
    ///     Arc::new(TokenIssuer::new(SigningKeys::shared(b"doc-secret"), TokenSettings::default())),
    ///     Default::default(),
    /// );
    /// let _ = tokio_test::block_on(svc.register(RegisterInput {
    ///     username: Some("u".into()),
    ///     email: Some("u@e.com".into()),
    ///     password: Some("Passw0rd".into()),
    ///     ..Default::default()
    /// }));
    /// let session = tokio_test::block_on(svc.login(LoginInput::new("u@e.com", "Passw0rd"))).unwrap();
    /// assert_eq!(session.identity.username, "u");
    /// assert!(!session.tokens.refresh.is_empty());
    /// ```
    pub async fn login(&self, input: LoginInput) -> Result<LoginSession, ServiceError> {
        let res = match self.authenticate(&input).await {
            Ok(identity) => self
                .issuer
                .issue_pair(&identity)
                .map(|tokens| LoginSession { identity, tokens }),
            Err(e) => Err(e),
        };
        metrics::LOGINS_TOTAL.with_label_values(&[metrics::outcome(&res)]).inc();
        if let Ok(session) = &res {
            info!(account_id = session.identity.account_id, "login_succeeded");
        }
        res
    }

    /// Exchange a refresh token for a new access token.
    ///
    /// The account is looked up again so tokens of deactivated accounts stop
    /// working. The refresh token itself is not rotated or invalidated.
    #[instrument(skip_all)]
    pub async fn refresh(&self, refresh_token: &str) -> Result<String, ServiceError> {
        let res = self.refresh_inner(refresh_token).await;
        metrics::TOKEN_REFRESH_TOTAL.with_label_values(&[metrics::outcome(&res)]).inc();
        res
    }

    async fn refresh_inner(&self, refresh_token: &str) -> Result<String, ServiceError> {
        let claims = self.issuer.validate(refresh_token, TokenType::Refresh)?;
        let account_id = claims.account_id()?;
        let account = self
            .repo
            .find_by_id(account_id)
            .await?
            .filter(|a| a.is_active)
            .ok_or_else(|| {
                debug!(account_id, "refresh for missing or inactive account");
                ServiceError::Unauthenticated
            })?;
        let access = self.issuer.issue_access_token(&Identity::from(&account))?;
        debug!(account_id, "access_token_refreshed");
        Ok(access)
    }

    async fn hash_password(&self, password: String) -> Result<String, ServiceError> {
        let hasher = Arc::clone(&self.hasher);
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| ServiceError::Internal(format!("hashing task failed: {e}")))?
    }

    /// `None` verifies against the dummy hash and always yields false.
    async fn verify_password(&self, password: String, stored: Option<String>) -> Result<bool, ServiceError> {
        let hasher = Arc::clone(&self.hasher);
        tokio::task::spawn_blocking(move || match stored {
            Some(hash) => hasher.verify(&password, &hash),
            None => hasher.verify_dummy(&password),
        })
        .await
        .map_err(|e| ServiceError::Internal(format!("verification task failed: {e}")))
    }
}
