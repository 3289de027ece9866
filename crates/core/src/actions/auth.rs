use skiff_domain::Warned;
use tracing::{info, instrument};

use super::Actor;

impl Actor {
    /// Password grant against UAA. On success the new token pair is handed
    /// to the token source.
    #[instrument(skip(self, password))]
    pub async fn authenticate(&self, username: &str, password: &str) -> Warned<()> {
        let (result, warnings) = self.uaa.authenticate(username, password).await.into_parts();
        let result = result.map(|tokens| {
            self.tokens.store_tokens(tokens);
            info!("authenticated");
        });
        Warned::new(result, warnings)
    }
}
