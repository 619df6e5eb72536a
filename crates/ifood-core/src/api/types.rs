//! Request and response types for the marketplace API.
//!
//! The home feed and merchant page are semi-structured documents. Only
//! `sections[0].cards[0].data.contents` is read; anything else, or any shape
//! that does not fit, is treated as "no entries".

use serde::{Deserialize, Serialize};

/// Access/refresh pair returned by authentication and refresh.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenPair {
    #[serde(default)]
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: String,
}

impl TokenPair {
    pub fn is_complete(&self) -> bool {
        !self.access_token.is_empty() && !self.refresh_token.is_empty()
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct OtpChallengeResponse {
    #[serde(default)]
    pub key: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct OtpClaimResponse {
    #[serde(default)]
    pub access_token: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    /// True for the zero value left by an unmatched selection.
    #[allow(clippy::float_cmp)]
    pub fn is_unset(&self) -> bool {
        self.latitude == 0.0 && self.longitude == 0.0
    }
}

/// Saved delivery address.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Address {
    pub neighborhood: String,
    pub street_name: String,
    pub street_number: String,
    pub complement: String,
    pub coordinates: Coordinates,
}

impl Address {
    /// Line shown for this address: street, number, complement, neighborhood.
    ///
    /// An empty complement leaves a double space.
    pub fn display_line(&self) -> String {
        format!(
            "{} {} {} {}",
            self.street_name, self.street_number, self.complement, self.neighborhood
        )
    }
}

/// One selectable category on the home feed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HomeFeedEntry {
    pub title: String,
    /// Deep link attached to the card, kept for diagnostics.
    pub action: String,
    /// Identifier of the page listing this category's merchants.
    pub id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HomeFeedPage {
    pub entries: Vec<HomeFeedEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Merchant {
    pub name: String,
    pub id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MerchantPage {
    pub merchants: Vec<Merchant>,
}

/// Card/action kinds the client claims to render.
#[derive(Debug, Serialize)]
pub(super) struct Capabilities {
    #[serde(rename = "supported-headers")]
    pub headers: &'static [&'static str],
    #[serde(rename = "supported-cards")]
    pub cards: &'static [&'static str],
    #[serde(rename = "supported-actions")]
    pub actions: &'static [&'static str],
}

const SUPPORTED_HEADERS: &[&str] = &["OPERATION_HEADER"];
const SUPPORTED_ACTIONS: &[&str] = &[
    "catalog-item",
    "merchant",
    "page",
    "card-content",
    "last-restaurants",
];

pub(super) const HOME_CAPABILITIES: Capabilities = Capabilities {
    headers: SUPPORTED_HEADERS,
    cards: &["SMALL_BANNER_CAROUSEL"],
    actions: SUPPORTED_ACTIONS,
};

pub(super) const PAGE_CAPABILITIES: Capabilities = Capabilities {
    headers: SUPPORTED_HEADERS,
    cards: &[
        "SMALL_BANNER_CAROUSEL",
        "MERCHANT_LIST",
        "MERCHANT_LIST_V2",
        "CATALOG_ITEM_LIST",
        "BIG_BANNER_CAROUSEL",
        "IMAGE_BANNER",
    ],
    actions: SUPPORTED_ACTIONS,
};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FeedDocument {
    sections: Vec<FeedSection>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FeedSection {
    cards: Vec<FeedCard>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FeedCard {
    data: FeedCardData,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FeedCardData {
    contents: Vec<serde_json::Value>,
}

/// String or numeric identifier.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Identifier {
    Text(String),
    Number(serde_json::Number),
}

impl Identifier {
    fn into_string(self) -> String {
        match self {
            Identifier::Text(s) => s,
            Identifier::Number(n) => n.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct HomeContent {
    #[serde(default)]
    title: String,
    #[serde(default)]
    action: Option<String>,
    #[serde(default)]
    id: Option<Identifier>,
}

#[derive(Debug, Deserialize)]
struct MerchantContent {
    #[serde(default)]
    name: String,
    #[serde(default)]
    id: Option<Identifier>,
}

/// Returns `sections[0].cards[0].data.contents`, or nothing if the body
/// does not have that shape.
fn first_card_contents(body: &str) -> Vec<serde_json::Value> {
    let doc: FeedDocument = match serde_json::from_str(body) {
        Ok(doc) => doc,
        Err(err) => {
            tracing::warn!(error = %err, "malformed feed document, showing no entries");
            return Vec::new();
        }
    };

    doc.sections
        .into_iter()
        .next()
        .and_then(|section| section.cards.into_iter().next())
        .map(|card| card.data.contents)
        .unwrap_or_default()
}

fn parse_contents<T: serde::de::DeserializeOwned>(body: &str) -> Vec<T> {
    first_card_contents(body)
        .into_iter()
        .filter_map(|value| match serde_json::from_value(value) {
            Ok(item) => Some(item),
            Err(err) => {
                tracing::debug!(error = %err, "skipping feed entry");
                None
            }
        })
        .collect()
}

pub(super) fn parse_home_feed(body: &str) -> HomeFeedPage {
    let entries = parse_contents::<HomeContent>(body)
        .into_iter()
        .map(|c| HomeFeedEntry {
            title: c.title,
            action: c.action.unwrap_or_default(),
            id: c.id.map(Identifier::into_string).unwrap_or_default(),
        })
        .collect();
    HomeFeedPage { entries }
}

pub(super) fn parse_merchant_page(body: &str) -> MerchantPage {
    let merchants = parse_contents::<MerchantContent>(body)
        .into_iter()
        .map(|c| Merchant {
            name: c.name,
            id: c.id.map(Identifier::into_string).unwrap_or_default(),
        })
        .collect();
    MerchantPage { merchants }
}

/// Parses the address list, treating a malformed body as empty.
pub(super) fn parse_addresses(body: &str) -> Vec<Address> {
    serde_json::from_str(body).unwrap_or_else(|err| {
        tracing::warn!(error = %err, "malformed address list, showing no entries");
        Vec::new()
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn feed(contents: &serde_json::Value) -> String {
        json!({
            "sections": [
                { "cards": [ { "cardType": "SMALL_BANNER_CAROUSEL", "data": { "contents": contents } } ] },
                { "cards": [ { "data": { "contents": [ { "title": "ignored" } ] } } ] }
            ]
        })
        .to_string()
    }

    #[test]
    fn test_display_line_with_empty_complement() {
        let address = Address {
            street_name: "Rua A".to_string(),
            street_number: "10".to_string(),
            complement: String::new(),
            neighborhood: "Centro".to_string(),
            coordinates: Coordinates::default(),
        };
        assert_eq!(address.display_line(), "Rua A 10  Centro");
    }

    #[test]
    fn test_parse_addresses_camel_case() {
        let body = r#"[{"streetName":"Rua A","streetNumber":"10","complement":"ap 2",
            "neighborhood":"Centro","coordinates":{"latitude":-23.5,"longitude":-46.6},
            "id":"ignored"}]"#;
        let addresses = parse_addresses(body);
        assert_eq!(addresses.len(), 1);
        assert_eq!(addresses[0].street_name, "Rua A");
        assert_eq!(addresses[0].coordinates.latitude, -23.5);
        assert!(!addresses[0].coordinates.is_unset());
    }

    #[test]
    fn test_parse_addresses_malformed_is_empty() {
        assert!(parse_addresses("{\"oops\": true}").is_empty());
        assert!(parse_addresses("").is_empty());
    }

    #[test]
    fn test_parse_home_feed_reads_first_card_only() {
        let body = feed(&json!([
            { "title": "Pizza", "id": "42", "action": "page?identifier=abc&x=1" },
            { "title": "Burger", "id": 7 }
        ]));
        let page = parse_home_feed(&body);
        assert_eq!(
            page.entries,
            vec![
                HomeFeedEntry {
                    title: "Pizza".to_string(),
                    action: "page?identifier=abc&x=1".to_string(),
                    id: "42".to_string(),
                },
                HomeFeedEntry {
                    title: "Burger".to_string(),
                    action: String::new(),
                    id: "7".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_parse_home_feed_unexpected_shapes_are_empty() {
        assert!(parse_home_feed("not json").entries.is_empty());
        assert!(parse_home_feed("{}").entries.is_empty());
        assert!(parse_home_feed(r#"{"sections": []}"#).entries.is_empty());
        assert!(parse_home_feed(r#"{"sections": [{"cards": []}]}"#).entries.is_empty());
        assert!(parse_home_feed(r#"{"sections": "nope"}"#).entries.is_empty());
    }

    #[test]
    fn test_parse_home_feed_skips_bad_entries() {
        let body = feed(&json!([{ "title": 12 }, { "title": "Sushi", "id": "9" }]));
        let page = parse_home_feed(&body);
        assert_eq!(page.entries.len(), 1);
        assert_eq!(page.entries[0].title, "Sushi");
    }

    #[test]
    fn test_parse_merchant_page_projects_name() {
        let body = feed(&json!([
            { "name": "Hamburgueria XPTO", "id": "m1", "rating": 4.5 },
            { "name": "Pizzaria Foo Bar" }
        ]));
        let page = parse_merchant_page(&body);
        let names: Vec<_> = page.merchants.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, ["Hamburgueria XPTO", "Pizzaria Foo Bar"]);
        assert_eq!(page.merchants[0].id, "m1");
    }

    #[test]
    fn test_capabilities_serialize_with_dashed_keys() {
        let value = serde_json::to_value(&HOME_CAPABILITIES).unwrap();
        assert_eq!(value["supported-headers"], json!(["OPERATION_HEADER"]));
        assert_eq!(value["supported-cards"], json!(["SMALL_BANNER_CAROUSEL"]));
        assert_eq!(value["supported-actions"][0], "catalog-item");

        let value = serde_json::to_value(&PAGE_CAPABILITIES).unwrap();
        let cards = value["supported-cards"].as_array().unwrap();
        assert!(cards.contains(&json!("MERCHANT_LIST")));
        assert!(cards.len() > 1);
    }
}
