//! Bearer-authenticated read endpoints.

use super::ApiClient;
use super::shared::{body_text, ensure_success, send};
use super::types::{
    Address, Coordinates, HOME_CAPABILITIES, HomeFeedPage, MerchantPage, PAGE_CAPABILITIES,
    parse_addresses, parse_home_feed, parse_merchant_page,
};
use crate::error::Result;

const ADDRESSES: &str = "/v1/customers/me/addresses";
const HOME: &str = "/v2/home";
const PAGE: &str = "/v2/page";

impl ApiClient {
    /// Lists the customer's saved delivery addresses.
    ///
    /// # Errors
    /// `Remote` on transport failure or non-2xx. A malformed body is an
    /// empty list.
    pub async fn list_addresses(&self, bearer: &str) -> Result<Vec<Address>> {
        const OP: &str = "list addresses";
        tracing::debug!(endpoint = ADDRESSES, "listing addresses");

        let request = self.http.get(self.url(ADDRESSES)).bearer_auth(bearer);
        let response = ensure_success(send(request, OP).await?, OP).await?;
        let body = body_text(response, OP).await?;
        Ok(parse_addresses(&body))
    }

    /// Fetches the personalized home feed for a location.
    ///
    /// # Errors
    /// `Remote` on transport failure or non-2xx. Unexpected feed shapes
    /// yield an empty page.
    pub async fn home_feed(&self, bearer: &str, at: Coordinates) -> Result<HomeFeedPage> {
        const OP: &str = "home feed";
        tracing::debug!(endpoint = HOME, "fetching home feed");

        let request = self
            .http
            .post(self.url(HOME))
            .bearer_auth(bearer)
            .query(&[
                ("alias", self.config.home_alias.clone()),
                ("latitude", at.latitude.to_string()),
                ("longitude", at.longitude.to_string()),
                ("channel", self.config.channel.clone()),
                ("size", self.config.home_page_size.to_string()),
            ])
            .json(&HOME_CAPABILITIES);
        let response = ensure_success(send(request, OP).await?, OP).await?;
        let body = body_text(response, OP).await?;
        Ok(parse_home_feed(&body))
    }

    /// Fetches the merchant listing behind a home feed card.
    ///
    /// # Errors
    /// `Remote` on transport failure or non-2xx. Unexpected page shapes
    /// yield an empty listing.
    pub async fn merchant_page(
        &self,
        bearer: &str,
        page_id: &str,
        at: Coordinates,
    ) -> Result<MerchantPage> {
        const OP: &str = "merchant page";
        tracing::debug!(endpoint = PAGE, page_id, "fetching merchant page");

        let mut url = self.url(PAGE);
        url.push('/');
        url.push_str(&encode_path_segment(page_id));

        let request = self
            .http
            .post(url)
            .bearer_auth(bearer)
            .query(&[
                ("latitude", at.latitude.to_string()),
                ("longitude", at.longitude.to_string()),
                ("channel", self.config.channel.clone()),
            ])
            .json(&PAGE_CAPABILITIES);
        let response = ensure_success(send(request, OP).await?, OP).await?;
        let body = body_text(response, OP).await?;
        Ok(parse_merchant_page(&body))
    }
}

fn encode_path_segment(segment: &str) -> String {
    url::form_urlencoded::byte_serialize(segment.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}
