//! Cookie & crumb acquisition for the Yahoo v7 endpoint.

use reqwest::header::SET_COOKIE;

use crate::core::Unavailable;

#[derive(Debug, Default)]
pub(super) struct Credentials {
    pub(super) cookie: Option<String>,
    pub(super) crumb: Option<String>,
}

impl super::YahooProvider {
    pub(super) async fn ensure_credentials(&self) -> Result<(), Unavailable> {
        // Fast path: check if credentials exist with a read lock.
        if self.state.read().await.crumb.is_some() {
            return Ok(());
        }

        // Slow path: only one task performs the handshake.
        let _guard = self.credential_fetch_lock.lock().await;

        // Double-check: another task might have fetched credentials while this one was waiting.
        if self.state.read().await.crumb.is_some() {
            return Ok(());
        }

        self.get_cookie().await?;
        self.get_crumb_internal().await
    }

    pub(super) async fn clear_crumb(&self) {
        self.state.write().await.crumb = None;
    }

    pub(super) async fn crumb(&self) -> Option<String> {
        self.state.read().await.crumb.clone()
    }

    async fn get_cookie(&self) -> Result<(), Unavailable> {
        // The consent endpoint sets the cookie even on non-2xx responses.
        let resp = self.http.get(self.cookie_url.clone()).send().await?;

        let cookie = resp
            .headers()
            .get(SET_COOKIE)
            .ok_or_else(|| Unavailable::Rejected("no cookie received".into()))?
            .to_str()
            .map_err(|_| Unavailable::Malformed("invalid cookie header".into()))?
            .to_string();

        self.state.write().await.cookie = Some(cookie);
        Ok(())
    }

    async fn get_crumb_internal(&self) -> Result<(), Unavailable> {
        if self.state.read().await.cookie.is_none() {
            return Err(Unavailable::Rejected("cookie is missing, cannot get crumb".into()));
        }

        let resp = self.http.get(self.crumb_url.clone()).send().await?;
        if !resp.status().is_success() {
            return Err(Unavailable::from_status(resp.status().as_u16(), resp.url()));
        }
        let crumb = resp.text().await?;
        let crumb = crumb.trim();

        if crumb.is_empty() || crumb.contains('{') || crumb.contains('<') {
            return Err(Unavailable::Malformed(format!("invalid crumb: {crumb}")));
        }

        self.state.write().await.crumb = Some(crumb.to_string());
        Ok(())
    }
}
