//! # Domain Types
//!
//! The four persisted entities of Balcao and the drafts the web layer sends.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │     Store       │   │      Note       │   │      Sale       │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  id (UUID)      │       │
//! │  │  name           │   │  title          │   │  sale_time      │       │
//! │  │  address        │   │  content        │   │  total          │       │
//! │  │  phone          │   │  created_at     │   │  finalized      │       │
//! │  └─────────────────┘   │  modified_at    │   │  items ──┐      │       │
//! │                        └─────────────────┘   └──────────┼──────┘       │
//! │                                                         │ owns         │
//! │                        ┌─────────────────┐   ┌──────────▼──────┐       │
//! │                        │  QuantityKind   │   │    SaleItem     │       │
//! │                        │  ─────────────  │◄──│  quantity_kind  │       │
//! │                        │  Unit | Kg      │   │  qty × price    │       │
//! │                        └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Derived Values
//! `SaleItem::subtotal` and `Sale::total` are stored, not computed on read.
//! [`SaleItem::recompute_subtotal`] and [`Sale::recompute_total`] refresh
//! them; the sale repository calls both after every item mutation.
//!
//! ## JSON Shape
//! The `Serialize` impls are the mapping handed to the web layer. Absent
//! timestamps render as `null`. A sale item's owning sale id is left out.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;
use uuid::Uuid;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::validation::{
    validate_content, validate_optional_text, validate_quantity, validate_required_text,
    validate_unit_price, validate_uuid, ValidationResult,
};
use crate::{
    MAX_CUSTOMER_NAME_LEN, MAX_NOTE_TITLE_LEN, MAX_PAYMENT_METHOD_LEN, MAX_PRODUCT_NAME_LEN,
    MAX_STORE_ADDRESS_LEN, MAX_STORE_NAME_LEN, MAX_STORE_PHONE_LEN,
};

/// Generates a new entity id (UUID v4).
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

// =============================================================================
// Store
// =============================================================================

/// A physical shop. Static reference data printed on receipts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Store {
    pub id: String,
    pub name: String,
    pub address: String,
    pub phone: String,
}

impl Store {
    /// Creates a store with a fresh id. Text fields are trimmed.
    ///
    /// ## Example
    /// ```rust
    /// use balcao_core::Store;
    ///
    /// let store = Store::new("Mercadinho Central", "Rua das Flores, 10", "(11) 5555-0100").unwrap();
    /// assert_eq!(store.name, "Mercadinho Central");
    /// assert!(Store::new("", "Rua das Flores, 10", "(11) 5555-0100").is_err());
    /// ```
    pub fn new(
        name: impl Into<String>,
        address: impl Into<String>,
        phone: impl Into<String>,
    ) -> ValidationResult<Self> {
        let store = Store {
            id: new_id(),
            name: name.into().trim().to_string(),
            address: address.into().trim().to_string(),
            phone: phone.into().trim().to_string(),
        };
        store.validate()?;
        Ok(store)
    }

    /// Checks the three required text fields.
    pub fn validate(&self) -> ValidationResult<()> {
        validate_required_text("name", &self.name, MAX_STORE_NAME_LEN)?;
        validate_required_text("address", &self.address, MAX_STORE_ADDRESS_LEN)?;
        validate_required_text("phone", &self.phone, MAX_STORE_PHONE_LEN)?;
        Ok(())
    }
}

// =============================================================================
// Note
// =============================================================================

/// A free-text note.
///
/// Timestamps stay `None` until the note is stored; the repository stamps
/// them through [`Note::stamp_inserted`] and [`Note::touch`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Note {
    pub id: String,
    pub title: String,
    pub content: String,
    #[ts(as = "Option<String>")]
    pub created_at: Option<DateTime<Utc>>,
    #[ts(as = "Option<String>")]
    pub modified_at: Option<DateTime<Utc>>,
}

impl Note {
    /// Creates an unsaved note with a fresh id and no timestamps.
    ///
    /// The title is trimmed; content is kept as written.
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> ValidationResult<Self> {
        let note = Note {
            id: new_id(),
            title: title.into().trim().to_string(),
            content: content.into(),
            created_at: None,
            modified_at: None,
        };
        note.validate()?;
        Ok(note)
    }

    pub fn validate(&self) -> ValidationResult<()> {
        validate_required_text("title", &self.title, MAX_NOTE_TITLE_LEN)?;
        validate_content(&self.content)
    }

    /// Stamps a note being inserted: created-at only if unset, modified-at always.
    pub fn stamp_inserted(&mut self, now: DateTime<Utc>) {
        self.created_at.get_or_insert(now);
        self.touch(now);
    }

    /// Refreshes modified-at. Never moves it below created-at.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        let modified = match self.created_at {
            Some(created) if created > now => created,
            _ => now,
        };
        self.modified_at = Some(modified);
    }
}

// =============================================================================
// Quantity Kind
// =============================================================================

/// How a line quantity is measured.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum QuantityKind {
    /// Counted pieces.
    #[default]
    #[serde(alias = "unidade")]
    Unit,
    /// Weighed, fractional kilograms.
    Kg,
}

impl QuantityKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            QuantityKind::Unit => "unit",
            QuantityKind::Kg => "kg",
        }
    }
}

impl fmt::Display for QuantityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuantityKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "unit" | "unidade" => Ok(QuantityKind::Unit),
            "kg" => Ok(QuantityKind::Kg),
            _ => Err(ValidationError::NotAllowed {
                field: "quantity_kind".to_string(),
                allowed: vec!["unit".to_string(), "kg".to_string()],
            }),
        }
    }
}

// =============================================================================
// Sale Item
// =============================================================================

/// A single line within a sale.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct SaleItem {
    pub id: String,
    /// Owning sale. Not part of the JSON mapping.
    #[serde(skip)]
    #[ts(skip)]
    pub sale_id: String,
    pub product_name: String,
    pub quantity: f64,
    pub quantity_kind: QuantityKind,
    pub unit_price: f64,
    /// quantity × unit_price, as of the last recompute.
    pub subtotal: f64,
}

impl SaleItem {
    /// Creates a line for `sale_id` with a fresh id.
    ///
    /// The subtotal is taken as given; call [`SaleItem::recompute_subtotal`]
    /// to derive it.
    pub fn new(
        sale_id: impl Into<String>,
        product_name: impl Into<String>,
        quantity: f64,
        quantity_kind: QuantityKind,
        unit_price: f64,
        subtotal: f64,
    ) -> ValidationResult<Self> {
        let item = SaleItem {
            id: new_id(),
            sale_id: sale_id.into(),
            product_name: product_name.into(),
            quantity,
            quantity_kind,
            unit_price,
            subtotal,
        };
        item.validate()?;
        Ok(item)
    }

    pub fn validate(&self) -> ValidationResult<()> {
        validate_uuid("sale_id", &self.sale_id)?;
        validate_required_text("product_name", &self.product_name, MAX_PRODUCT_NAME_LEN)?;
        validate_quantity(self.quantity)?;
        validate_unit_price(self.unit_price)?;

        if !self.subtotal.is_finite() {
            return Err(ValidationError::InvalidFormat {
                field: "subtotal".to_string(),
                reason: "must be a finite number".to_string(),
            });
        }

        Ok(())
    }

    /// Sets `subtotal = quantity × unit_price` and returns it.
    ///
    /// ## Example
    /// ```rust
    /// use balcao_core::{QuantityKind, SaleItem};
    ///
    /// let sale_id = balcao_core::new_id();
    /// let mut item = SaleItem::new(&sale_id, "Sabão", 3.0, QuantityKind::Unit, 2.5, 0.0).unwrap();
    /// assert_eq!(item.recompute_subtotal(), 7.5);
    /// ```
    pub fn recompute_subtotal(&mut self) -> f64 {
        self.subtotal = self.quantity * self.unit_price;
        self.subtotal
    }

    /// Changes quantity and unit price, then recomputes the subtotal.
    ///
    /// Nothing changes when either value is rejected.
    pub fn reprice(&mut self, quantity: f64, unit_price: f64) -> ValidationResult<f64> {
        validate_quantity(quantity)?;
        validate_unit_price(unit_price)?;

        self.quantity = quantity;
        self.unit_price = unit_price;
        Ok(self.recompute_subtotal())
    }
}

/// A line as submitted by the web layer, before it has an id or subtotal.
#[derive(Debug, Clone, PartialEq, Deserialize, TS)]
#[ts(export)]
pub struct NewSaleItem {
    pub product_name: String,
    #[serde(default = "default_quantity")]
    pub quantity: f64,
    #[serde(default)]
    pub quantity_kind: QuantityKind,
    pub unit_price: f64,
}

fn default_quantity() -> f64 {
    1.0
}

impl NewSaleItem {
    pub fn new(
        product_name: impl Into<String>,
        quantity: f64,
        quantity_kind: QuantityKind,
        unit_price: f64,
    ) -> Self {
        NewSaleItem {
            product_name: product_name.into(),
            quantity,
            quantity_kind,
            unit_price,
        }
    }

    /// Builds the line for `sale_id` with its subtotal derived.
    pub fn into_item(self, sale_id: &str) -> ValidationResult<SaleItem> {
        let mut item = SaleItem::new(
            sale_id,
            self.product_name.trim(),
            self.quantity,
            self.quantity_kind,
            self.unit_price,
            0.0,
        )?;
        item.recompute_subtotal();
        Ok(item)
    }
}

// =============================================================================
// Sale
// =============================================================================

/// A sale transaction header and the lines it owns.
///
/// Open until `finalized` is set. Nothing here guards that transition;
/// callers may flip `finalized` directly.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Sale {
    pub id: String,
    /// Local wall-clock time of the sale, without offset.
    #[ts(as = "Option<String>")]
    pub sale_time: Option<NaiveDateTime>,
    /// Sum of item subtotals, as of the last recompute.
    pub total: f64,
    pub finalized: bool,
    pub customer_name: Option<String>,
    pub payment_method: Option<String>,
    /// Lines in insertion order.
    #[cfg_attr(feature = "sqlx", sqlx(skip))]
    pub items: Vec<SaleItem>,
}

impl Sale {
    /// Opens an empty sale stamped at `sale_time`.
    pub fn open(sale_time: NaiveDateTime) -> Self {
        Sale {
            id: new_id(),
            sale_time: Some(sale_time),
            total: 0.0,
            finalized: false,
            customer_name: None,
            payment_method: None,
            items: Vec::new(),
        }
    }

    pub fn validate(&self) -> ValidationResult<()> {
        validate_optional_text(
            "customer_name",
            self.customer_name.as_deref(),
            MAX_CUSTOMER_NAME_LEN,
        )?;
        validate_optional_text(
            "payment_method",
            self.payment_method.as_deref(),
            MAX_PAYMENT_METHOD_LEN,
        )
    }

    #[inline]
    pub fn is_open(&self) -> bool {
        !self.finalized
    }

    /// Sets `total` to the sum of the owned items' subtotals and returns it.
    ///
    /// Reads subtotals as stored; it does not recompute them.
    pub fn recompute_total(&mut self) -> f64 {
        self.total = self.items.iter().map(|item| item.subtotal).sum();
        self.total
    }

    /// Appends an item built for this sale.
    pub fn push_item(&mut self, item: SaleItem) -> CoreResult<()> {
        if item.sale_id != self.id {
            return Err(CoreError::ItemBelongsToOtherSale {
                item_id: item.id,
                item_sale_id: item.sale_id,
                sale_id: self.id.clone(),
            });
        }

        self.items.push(item);
        Ok(())
    }

    pub fn item(&self, item_id: &str) -> Option<&SaleItem> {
        self.items.iter().find(|item| item.id == item_id)
    }

    pub fn item_mut(&mut self, item_id: &str) -> CoreResult<&mut SaleItem> {
        let sale_id = &self.id;
        self.items
            .iter_mut()
            .find(|item| item.id == item_id)
            .ok_or_else(|| CoreError::SaleItemNotFound {
                sale_id: sale_id.clone(),
                item_id: item_id.to_string(),
            })
    }

    /// Removes an item, keeping the remaining lines in order.
    pub fn remove_item(&mut self, item_id: &str) -> CoreResult<SaleItem> {
        let position = self
            .items
            .iter()
            .position(|item| item.id == item_id)
            .ok_or_else(|| CoreError::SaleItemNotFound {
                sale_id: self.id.clone(),
                item_id: item_id.to_string(),
            })?;

        Ok(self.items.remove(position))
    }

    /// Removes every item and returns them.
    pub fn clear_items(&mut self) -> Vec<SaleItem> {
        std::mem::take(&mut self.items)
    }

    /// Closes the sale, recording whichever checkout details were given.
    pub fn finalize(&mut self, checkout: SaleCheckout) -> ValidationResult<()> {
        let checkout = checkout.normalized();
        checkout.validate()?;

        if checkout.customer_name.is_some() {
            self.customer_name = checkout.customer_name;
        }
        if checkout.payment_method.is_some() {
            self.payment_method = checkout.payment_method;
        }
        self.finalized = true;
        Ok(())
    }
}

/// Header fields for a new sale. Everything is optional.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, TS)]
#[ts(export)]
pub struct NewSale {
    #[serde(default)]
    #[ts(as = "Option<String>")]
    pub sale_time: Option<NaiveDateTime>,
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub payment_method: Option<String>,
}

impl NewSale {
    /// Opens the sale. `now` supplies the sale time when none was given and
    /// is not called otherwise.
    pub fn open(self, now: impl FnOnce() -> NaiveDateTime) -> ValidationResult<Sale> {
        let mut sale = Sale::open(self.sale_time.unwrap_or_else(now));
        sale.customer_name = blank_to_none(self.customer_name);
        sale.payment_method = blank_to_none(self.payment_method);
        sale.validate()?;
        Ok(sale)
    }
}

/// Details recorded when a sale is finalized.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, TS)]
#[ts(export)]
pub struct SaleCheckout {
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub payment_method: Option<String>,
}

impl SaleCheckout {
    pub fn new(customer_name: Option<&str>, payment_method: Option<&str>) -> Self {
        SaleCheckout {
            customer_name: customer_name.map(str::to_string),
            payment_method: payment_method.map(str::to_string),
        }
    }

    /// Trims both fields; blank means not given.
    pub fn normalized(self) -> Self {
        SaleCheckout {
            customer_name: blank_to_none(self.customer_name),
            payment_method: blank_to_none(self.payment_method),
        }
    }

    pub fn validate(&self) -> ValidationResult<()> {
        validate_optional_text(
            "customer_name",
            self.customer_name.as_deref(),
            MAX_CUSTOMER_NAME_LEN,
        )?;
        validate_optional_text(
            "payment_method",
            self.payment_method.as_deref(),
            MAX_PAYMENT_METHOD_LEN,
        )
    }
}

fn blank_to_none(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

// =============================================================================
// Unit Tests
// =============================================================================
