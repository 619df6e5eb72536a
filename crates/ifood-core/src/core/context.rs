//! Process-wide browse context.
//!
//! [`SessionState`] is passed to every consumer operation instead of living
//! in globals. The session manager owns the tokens, the navigator owns the
//! selections; this type only sequences them against the API and the
//! credential store.

use crate::api::{Address, ApiClient};
use crate::core::navigation::{Line, LineHandle, Navigator};
use crate::core::session::Session;
use crate::credentials::{CredentialStore, Credentials};
use crate::error::{IfoodError, Result};

pub struct SessionState {
    api: ApiClient,
    store: CredentialStore,
    session: Session,
    nav: Navigator,
}

impl SessionState {
    pub fn new(api: ApiClient, store: CredentialStore) -> Self {
        Self {
            api,
            store,
            session: Session::new(),
            nav: Navigator::new(),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn navigator(&self) -> &Navigator {
        &self.nav
    }

    pub fn store(&self) -> &CredentialStore {
        &self.store
    }

    /// Reloads saved credentials and refreshes them.
    ///
    /// The refresh runs on every reload, even for a pair saved moments ago.
    /// The new pair is written back to the store.
    ///
    /// # Errors
    /// `NotFound` without saved credentials, `RefreshFailed` when the stored
    /// refresh token is rejected. Both mean "log in again".
    pub async fn resume(&mut self) -> Result<Credentials> {
        let saved = self.store.load()?;
        self.session = Session::with_credentials(saved);
        let fresh = self.session.refresh(&self.api).await?;
        self.store.save(&fresh)?;
        Ok(fresh)
    }

    /// First half of the login: emails a one-time code.
    ///
    /// # Errors
    /// `Remote` when the OTP request fails.
    pub async fn begin_login(&mut self, email: &str) -> Result<()> {
        self.nav.reset();
        self.session.request_otp(&self.api, email).await
    }

    /// Second half of the login: claims the code, authenticates and saves
    /// the resulting pair.
    ///
    /// # Errors
    /// `Precondition` without a pending code, `InvalidCode` for a rejected
    /// code, `Remote` when authentication fails, `Io` when the pair cannot be
    /// saved.
    pub async fn complete_login(&mut self, code: &str) -> Result<Credentials> {
        let Some(email) = self.session.pending_email().map(str::to_string) else {
            return Err(IfoodError::Precondition(
                "request a one-time code before entering it",
            ));
        };
        let short_lived = self.session.claim_otp(&self.api, code).await?;
        let credentials = self
            .session
            .authenticate(&self.api, &email, &short_lived)
            .await?;
        self.store.save(&credentials)?;
        Ok(credentials)
    }

    /// Forgets the session and removes the saved pair.
    ///
    /// # Errors
    /// `Io` when the credential file cannot be removed.
    pub fn logout(&mut self) -> Result<bool> {
        self.session.reset();
        self.nav.reset();
        self.store.clear()
    }

    /// A 401 means the access token is no longer accepted.
    fn track_expiry<T>(&mut self, result: Result<T>) -> Result<T> {
        if let Err(err) = &result
            && err.is_unauthorized()
        {
            self.session.expire();
        }
        result
    }

    /// Fetches and shows the address screen.
    ///
    /// # Errors
    /// `NotAuthenticated` or `Remote`.
    pub async fn list_addresses(&mut self) -> Result<Vec<Line>> {
        let bearer = self.session.bearer()?.to_string();
        let result = self.api.list_addresses(&bearer).await;
        let addresses = self.track_expiry(result)?;
        tracing::info!(count = addresses.len(), "addresses listed");
        Ok(self.nav.show_addresses(addresses))
    }

    /// # Errors
    /// `NoSuchLine` for a handle not on the address screen.
    pub fn select_address(&mut self, handle: LineHandle) -> Result<Address> {
        self.nav.select_address(handle).cloned()
    }

    /// Zero-value address when `line` matches nothing.
    pub fn select_address_line(&mut self, line: &str) -> Address {
        self.nav.select_address_by_line(line)
    }

    /// Fetches and shows the home feed for the selected address.
    ///
    /// # Errors
    /// `Precondition` before an address is selected, then `NotAuthenticated`
    /// or `Remote`.
    pub async fn home_feed(&mut self) -> Result<Vec<Line>> {
        let at = self.nav.home_feed_request()?;
        let bearer = self.session.bearer()?.to_string();
        let result = self.api.home_feed(&bearer, at).await;
        let page = self.track_expiry(result)?;
        tracing::info!(count = page.entries.len(), "home feed listed");
        self.nav.show_home_feed(page)
    }

    /// # Errors
    /// `NoSuchLine` or `Precondition` (card without identifier).
    pub fn select_home_card(&mut self, handle: LineHandle) -> Result<String> {
        self.nav.select_home_card(handle).map(str::to_string)
    }

    /// Empty string when `line` matches nothing.
    pub fn select_home_card_line(&mut self, line: &str) -> String {
        self.nav.select_home_card_by_line(line)
    }

    /// Fetches and shows the merchants behind the selected home card.
    ///
    /// # Errors
    /// `Precondition` before a card is selected, then `NotAuthenticated`
    /// or `Remote`.
    pub async fn list_merchants(&mut self) -> Result<Vec<Line>> {
        let (page_id, at) = self.nav.merchant_request()?;
        let bearer = self.session.bearer()?.to_string();
        let result = self.api.merchant_page(&bearer, &page_id, at).await;
        let page = self.track_expiry(result)?;
        tracing::info!(count = page.merchants.len(), "merchants listed");
        self.nav.show_merchants(page)
    }
}

impl std::fmt::Debug for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionState")
            .field("authenticated", &self.session.is_authenticated())
            .field("screen", &self.nav.screen())
            .finish_non_exhaustive()
    }
}
