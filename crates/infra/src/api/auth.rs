//! Bearer tokens for authenticated requests
//!
//! [`UaaTokenSource`] holds the process's only mutable long-lived state: the
//! access/refresh token pair. Refreshes are serialized; a caller that waited
//! on an in-flight refresh reuses its outcome instead of refreshing again.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use skiff_core::TokenStore;
use skiff_domain::{Error, Result, TokenPair, Warned, Warnings};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::uaa::UaaClient;

/// Trait for providing access tokens
///
/// This trait allows dependency injection and testing with mock providers.
#[async_trait]
pub trait AccessTokenProvider: Send + Sync {
    /// The cached access token. It may be stale.
    async fn access_token(&self) -> Result<String>;

    /// Exchanges the refresh token for a new pair.
    async fn refresh(&self) -> Warned<()>;
}

/// Token source backed by the UAA refresh grant.
pub struct UaaTokenSource {
    uaa: Arc<UaaClient>,
    tokens: RwLock<TokenPair>,
    refresh_lock: Mutex<()>,
    generation: AtomicU64,
}

impl UaaTokenSource {
    pub fn new(uaa: Arc<UaaClient>, tokens: TokenPair) -> Self {
        Self {
            uaa,
            tokens: RwLock::new(tokens),
            refresh_lock: Mutex::new(()),
            generation: AtomicU64::new(0),
        }
    }

    /// Snapshot of the current pair, for persisting at exit.
    pub fn tokens(&self) -> TokenPair {
        self.tokens.read().clone()
    }

    fn replace(&self, tokens: TokenPair) {
        *self.tokens.write() = tokens;
        self.generation.fetch_add(1, Ordering::SeqCst);
    }

    async fn refresh_steps(&self, warnings: &mut Warnings) -> Result<()> {
        let observed = self.generation.load(Ordering::SeqCst);
        let _guard = self.refresh_lock.lock().await;
        if self.generation.load(Ordering::SeqCst) != observed {
            debug!("token refreshed by a concurrent caller");
            return Ok(());
        }

        let refresh_token = self.tokens.read().refresh_token.clone();
        if refresh_token.is_empty() {
            return Err(Error::InvalidToken { description: "no refresh token available".into() });
        }

        let pair = warnings.absorb(self.uaa.refresh_grant(&refresh_token).await)?;
        self.replace(pair);
        info!("access token refreshed");
        Ok(())
    }
}

#[async_trait]
impl AccessTokenProvider for UaaTokenSource {
    async fn access_token(&self) -> Result<String> {
        let token = self.tokens.read().access_token.clone();
        if token.is_empty() {
            return Err(Error::Unauthenticated);
        }
        Ok(token)
    }

    async fn refresh(&self) -> Warned<()> {
        let mut warnings = Warnings::new();
        let result = self.refresh_steps(&mut warnings).await;
        if let Err(err) = &result {
            warn!(error = %err, "refresh grant failed");
        }
        Warned::new(result, warnings)
    }
}

impl TokenStore for UaaTokenSource {
    fn store_tokens(&self, tokens: TokenPair) {
        self.replace(tokens);
    }
}

impl std::fmt::Debug for UaaTokenSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UaaTokenSource")
            .field("generation", &self.generation.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}
