//! Navigation state machine for the browse flow.
//!
//! ```text
//! Start -> AddressListed -> AddressSelected -> HomeListed -> HomeCardSelected -> MerchantsListed
//! ```
//!
//! Each screen is rendered as [`Line`]s. A line carries a [`LineHandle`]
//! pointing into the candidate list it was built from, so selecting a line
//! never depends on re-formatting text. Matching by the exact display text
//! is still offered for consumers that only know what the user saw.

use crate::api::{Address, Coordinates, HomeFeedEntry, HomeFeedPage, Merchant, MerchantPage};
use crate::error::{IfoodError, Result};

/// Screens of the browse flow, in order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum Screen {
    #[default]
    Start,
    AddressListed,
    AddressSelected,
    HomeListed,
    HomeCardSelected,
    MerchantsListed,
}

/// Opaque reference to a rendered line's entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LineHandle(usize);

impl LineHandle {
    /// Position in the candidate list the line was rendered from.
    pub fn index(self) -> usize {
        self.0
    }
}

/// One selectable line of a screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub handle: LineHandle,
    pub text: String,
}

fn lines<T>(items: &[T], text: impl Fn(&T) -> String) -> Vec<Line> {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| Line {
            handle: LineHandle(i),
            text: text(item),
        })
        .collect()
}

/// Identifier a home card contributes to the merchant listing request.
///
/// The card's own `id` field is the only source; the `action` deep link is
/// not parsed.
pub fn card_identifier(entry: &HomeFeedEntry) -> &str {
    entry.id.trim()
}

/// Holds the user's selections and the candidates they were picked from.
#[derive(Debug, Clone, Default)]
pub struct Navigator {
    screen: Screen,
    addresses: Vec<Address>,
    selected_address: Option<Address>,
    home_entries: Vec<HomeFeedEntry>,
    selected_card_id: Option<String>,
    merchants: Vec<Merchant>,
}

impl Navigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn addresses(&self) -> &[Address] {
        &self.addresses
    }

    pub fn selected_address(&self) -> Option<&Address> {
        self.selected_address.as_ref()
    }

    pub fn home_entries(&self) -> &[HomeFeedEntry] {
        &self.home_entries
    }

    pub fn selected_home_card_id(&self) -> Option<&str> {
        self.selected_card_id.as_deref()
    }

    pub fn merchants(&self) -> &[Merchant] {
        &self.merchants
    }

    /// Back to `Start`, dropping every candidate and selection.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    fn enter(&mut self, screen: Screen) {
        tracing::debug!(from = ?self.screen, to = ?screen, "screen transition");
        self.screen = screen;
    }

    fn clear_from_home(&mut self) {
        self.home_entries.clear();
        self.selected_card_id = None;
        self.merchants.clear();
    }

    /// Caches the fetched addresses and renders one line per address.
    pub fn show_addresses(&mut self, addresses: Vec<Address>) -> Vec<Line> {
        self.addresses = addresses;
        self.selected_address = None;
        self.clear_from_home();
        self.enter(Screen::AddressListed);
        lines(&self.addresses, Address::display_line)
    }

    /// Selects the address behind `handle`.
    ///
    /// # Errors
    /// `NoSuchLine` if the handle is not on the address screen.
    pub fn select_address(&mut self, handle: LineHandle) -> Result<&Address> {
        let address = self
            .addresses
            .get(handle.index())
            .cloned()
            .ok_or(IfoodError::NoSuchLine(handle.index()))?;
        Ok(self.adopt_address(address))
    }

    /// Selects the address whose display line equals `line` exactly.
    ///
    /// Returns the zero-value address when nothing matches. The previous
    /// selection and everything downstream of it is dropped in that case.
    pub fn select_address_by_line(&mut self, line: &str) -> Address {
        let found = self
            .addresses
            .iter()
            .find(|a| a.display_line() == line)
            .cloned();

        match found {
            Some(address) => self.adopt_address(address).clone(),
            None => {
                tracing::debug!("no address matches the selected line");
                self.selected_address = None;
                self.clear_from_home();
                if self.screen > Screen::AddressListed {
                    self.enter(Screen::AddressListed);
                }
                Address::default()
            }
        }
    }

    fn adopt_address(&mut self, address: Address) -> &Address {
        self.clear_from_home();
        self.enter(Screen::AddressSelected);
        self.selected_address.insert(address)
    }

    /// Coordinates for the home feed request.
    ///
    /// # Errors
    /// `Precondition` until an address with coordinates is selected.
    pub fn home_feed_request(&self) -> Result<Coordinates> {
        match &self.selected_address {
            Some(address) if !address.coordinates.is_unset() => Ok(address.coordinates),
            _ => Err(IfoodError::Precondition(
                "select an address before opening the home feed",
            )),
        }
    }

    /// Caches the home feed and renders one line per card title.
    ///
    /// # Errors
    /// `Precondition` until an address is selected.
    pub fn show_home_feed(&mut self, page: HomeFeedPage) -> Result<Vec<Line>> {
        self.home_feed_request()?;
        self.clear_from_home();
        self.home_entries = page.entries;
        self.enter(Screen::HomeListed);
        Ok(lines(&self.home_entries, |e| e.title.clone()))
    }

    /// Selects the home card behind `handle` and returns its identifier.
    ///
    /// # Errors
    /// `NoSuchLine` if the handle is not on the home screen, `Precondition`
    /// if the card has no identifier.
    pub fn select_home_card(&mut self, handle: LineHandle) -> Result<&str> {
        let id = self
            .home_entries
            .get(handle.index())
            .map(|e| card_identifier(e).to_string())
            .ok_or(IfoodError::NoSuchLine(handle.index()))?;

        if id.is_empty() {
            return Err(IfoodError::Precondition(
                "the selected card has no identifier",
            ));
        }
        Ok(self.adopt_card(id))
    }

    /// Selects the home card whose title equals `line` exactly.
    ///
    /// Returns an empty string when nothing matches (or the match has no
    /// identifier). The previous card and its merchants are dropped in that
    /// case.
    pub fn select_home_card_by_line(&mut self, line: &str) -> String {
        let id = self
            .home_entries
            .iter()
            .find(|e| e.title == line)
            .map(|e| card_identifier(e).to_string())
            .unwrap_or_default();

        if id.is_empty() {
            tracing::debug!("no home card matches the selected line");
            self.selected_card_id = None;
            self.merchants.clear();
            if self.screen > Screen::HomeListed {
                self.enter(Screen::HomeListed);
            }
            return id;
        }
        self.adopt_card(id).to_string()
    }

    fn adopt_card(&mut self, id: String) -> &str {
        self.merchants.clear();
        self.enter(Screen::HomeCardSelected);
        self.selected_card_id.insert(id).as_str()
    }

    /// Page id and coordinates for the merchant listing request.
    ///
    /// # Errors
    /// `Precondition` until both an address and a home card are selected.
    pub fn merchant_request(&self) -> Result<(String, Coordinates)> {
        let coordinates = self.home_feed_request()?;
        match self.selected_card_id.as_deref() {
            Some(id) if !id.is_empty() => Ok((id.to_string(), coordinates)),
            _ => Err(IfoodError::Precondition(
                "select a home card before listing merchants",
            )),
        }
    }

    /// Caches the merchant listing and renders one line per merchant name.
    ///
    /// # Errors
    /// `Precondition` until a home card is selected.
    pub fn show_merchants(&mut self, page: MerchantPage) -> Result<Vec<Line>> {
        self.merchant_request()?;
        self.merchants = page.merchants;
        self.enter(Screen::MerchantsListed);
        Ok(lines(&self.merchants, |m| m.name.clone()))
    }
}
