//! Token authenticator.
//!
//! Issues opaque bearer tokens for customers and managers and resolves them
//! back to a principal id.
//!
//! ```text
//! issue_token(kind, login, password)
//!   credentials by phone ── none ──► PrincipalNotFound
//!   argon2 verify ───────── no ────► InvalidCredentials
//!   256 random bytes, hex, expires_at = now + ttl ──► token row
//!
//! resolve_principal(kind, token)
//!   token row ───────────── none ──► TokenNotFound
//!   expires_at < now ────── yes ───► TokenExpired
//!   ──► principal id
//! ```

use chrono::{DateTime, Duration, SubsecRound, Utc};
use tally_core::{CoreError, CoreResult, IssuedToken, PrincipalKind, TokenRecord};
use tally_db::security::{generate_token, verify_password};
use tally_db::{Database, DbError};
use tracing::{debug, info, warn};

use super::store_error;

/// Authentication service.
#[derive(Debug, Clone)]
pub struct AuthService {
    db: Database,
    token_ttl: Duration,
}

impl AuthService {
    pub fn new(db: Database, token_ttl: Duration) -> Self {
        AuthService { db, token_ttl }
    }

    /// Verifies a phone/password login and issues a new token.
    pub async fn issue_token(
        &self,
        kind: PrincipalKind,
        login: &str,
        password: &str,
    ) -> CoreResult<IssuedToken> {
        let credentials = match kind {
            PrincipalKind::Customer => self.db.customers().find_credentials(login).await,
            PrincipalKind::Manager => self.db.managers().find_credentials(login).await,
        }
        .map_err(|e| store_error("credential lookup", e))?
        .ok_or(CoreError::PrincipalNotFound { kind })?;

        if !verify_password(password, &credentials.password_hash) {
            warn!(kind = %kind, principal_id = credentials.id, "Password mismatch");
            return Err(CoreError::InvalidCredentials);
        }

        self.store_token(kind, credentials.id).await
    }

    /// Issues a token without checking credentials.
    ///
    /// Only for principals the caller has just created or otherwise vouches
    /// for (manager registration).
    pub async fn issue_token_for_principal(
        &self,
        kind: PrincipalKind,
        principal_id: i64,
    ) -> CoreResult<IssuedToken> {
        self.store_token(kind, principal_id).await
    }

    /// Resolves a token to its principal id against the current clock.
    pub async fn resolve_principal(&self, kind: PrincipalKind, token: &str) -> CoreResult<i64> {
        self.resolve_principal_at(kind, token, Utc::now()).await
    }

    /// Resolves a token to its principal id as of `now`.
    ///
    /// A token is valid up to and including its expiry instant.
    pub async fn resolve_principal_at(
        &self,
        kind: PrincipalKind,
        token: &str,
        now: DateTime<Utc>,
    ) -> CoreResult<i64> {
        let record = self
            .db
            .tokens()
            .find(kind, token)
            .await
            .map_err(|e| store_error("token lookup", e))?
            .ok_or(CoreError::TokenNotFound)?;

        if record.is_expired_at(now) {
            debug!(kind = %kind, principal_id = record.principal_id, "Token expired");
            return Err(CoreError::TokenExpired {
                expired_at: record.expires_at,
            });
        }

        Ok(record.principal_id)
    }

    async fn store_token(&self, kind: PrincipalKind, principal_id: i64) -> CoreResult<IssuedToken> {
        let now = Utc::now().trunc_subsecs(0);
        let record = TokenRecord {
            token: generate_token(),
            principal_id,
            expires_at: now + self.token_ttl,
            created_at: now,
        };

        self.db
            .tokens()
            .insert(kind, &record)
            .await
            .map_err(|e| match e {
                DbError::ForeignKeyViolation { .. } => CoreError::PrincipalNotFound { kind },
                other => store_error("token insert", other),
            })?;

        info!(
            kind = %kind,
            principal_id,
            expires_at = %record.expires_at,
            "Token issued"
        );

        Ok(IssuedToken {
            token: record.token,
            principal_id,
            expires_at: record.expires_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tally_db::testing::{
        fixture_database, ADMIN_ID, ADMIN_PASSWORD, ADMIN_PHONE, CUSTOMER_ID, CUSTOMER_PASSWORD,
        CUSTOMER_PHONE,
    };

    async fn service() -> AuthService {
        let db = fixture_database().await.unwrap();
        AuthService::new(db, Duration::hours(1))
    }

    #[tokio::test]
    async fn test_issue_token_right_password() {
        let auth = service().await;

        let issued = auth
            .issue_token(PrincipalKind::Manager, ADMIN_PHONE, ADMIN_PASSWORD)
            .await
            .unwrap();

        assert_eq!(issued.principal_id, ADMIN_ID);
        assert_eq!(issued.token.len(), 512);
        assert_eq!(
            auth.resolve_principal(PrincipalKind::Manager, &issued.token)
                .await
                .unwrap(),
            ADMIN_ID
        );
    }

    #[tokio::test]
    async fn test_issue_token_wrong_password() {
        let auth = service().await;

        let err = auth
            .issue_token(PrincipalKind::Manager, ADMIN_PHONE, "wrongpass")
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_issue_token_unknown_login() {
        let auth = service().await;

        let err = auth
            .issue_token(PrincipalKind::Manager, "00000000000", "rightpass")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CoreError::PrincipalNotFound {
                kind: PrincipalKind::Manager
            }
        ));
    }

    #[tokio::test]
    async fn test_customer_login_is_not_a_manager_login() {
        let auth = service().await;

        let issued = auth
            .issue_token(PrincipalKind::Customer, CUSTOMER_PHONE, CUSTOMER_PASSWORD)
            .await
            .unwrap();
        assert_eq!(issued.principal_id, CUSTOMER_ID);

        let err = auth
            .resolve_principal(PrincipalKind::Manager, &issued.token)
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::TokenNotFound));

        let err = auth
            .issue_token(PrincipalKind::Manager, CUSTOMER_PHONE, CUSTOMER_PASSWORD)
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::PrincipalNotFound { .. }));
    }

    #[tokio::test]
    async fn test_expiry_boundary() {
        let auth = service().await;

        let issued = auth
            .issue_token_for_principal(PrincipalKind::Manager, ADMIN_ID)
            .await
            .unwrap();
        let kind = PrincipalKind::Manager;

        let at_expiry = auth
            .resolve_principal_at(kind, &issued.token, issued.expires_at)
            .await
            .unwrap();
        assert_eq!(at_expiry, ADMIN_ID);

        let err = auth
            .resolve_principal_at(kind, &issued.token, issued.expires_at + Duration::seconds(1))
            .await
            .unwrap_err();
        match err {
            CoreError::TokenExpired { expired_at } => assert_eq!(expired_at, issued.expires_at),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_every_issuance_adds_one_token() {
        let auth = service().await;

        let first = auth
            .issue_token(PrincipalKind::Manager, ADMIN_PHONE, ADMIN_PASSWORD)
            .await
            .unwrap();
        let second = auth
            .issue_token_for_principal(PrincipalKind::Manager, ADMIN_ID)
            .await
            .unwrap();

        assert_ne!(first.token, second.token);
        let count = auth
            .db
            .tokens()
            .count_for(PrincipalKind::Manager, ADMIN_ID)
            .await
            .unwrap();
        assert_eq!(count, 2);

        // Both stay valid
        for token in [&first.token, &second.token] {
            assert_eq!(
                auth.resolve_principal(PrincipalKind::Manager, token).await.unwrap(),
                ADMIN_ID
            );
        }
    }

    #[tokio::test]
    async fn test_token_for_unknown_principal() {
        let auth = service().await;

        let err = auth
            .issue_token_for_principal(PrincipalKind::Customer, 999)
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::PrincipalNotFound { .. }));
    }

    #[tokio::test]
    async fn test_unknown_token() {
        let auth = service().await;

        let err = auth
            .resolve_principal(PrincipalKind::Customer, "deadbeef")
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::TokenNotFound));
    }
}
