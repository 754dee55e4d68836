//! # Currency Module
//!
//! Provides the `Currency` type for the three-denomination wallet used across
//! Emporium, plus the `BaseUnits` copper-equivalent representation all
//! arithmetic flows through.
//!
//! ## Why Base Units?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  THE DENOMINATION PROBLEM                                           │
//! │                                                                     │
//! │  Is {gold: 0, silver: 10, copper: 0} enough to pay 1 gold?          │
//! │  Comparing field-by-field says NO. By value it is YES:              │
//! │                                                                     │
//! │    1 gp = 10 sp = 100 cp                                            │
//! │                                                                     │
//! │  OUR SOLUTION: flatten to copper-equivalent integers                │
//! │    {0, 10, 0} → 100 base units                                      │
//! │    {1,  0, 0} → 100 base units   → equal in value                   │
//! │                                                                     │
//! │  Every comparison, add and subtract happens in base units, then     │
//! │  the result is re-decomposed greedily (most gold first).            │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use emporium_core::currency::Currency;
//!
//! let wallet = Currency::new(5, 0, 0);
//! let price = Currency::new(3, 0, 0);
//!
//! assert!(wallet.can_afford(&price));
//! let remaining = wallet.checked_sub(&price).unwrap();
//! assert_eq!(remaining, Currency::new(2, 0, 0));
//! ```

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::ops::Add;

// =============================================================================
// Base Units
// =============================================================================

/// Copper pieces per silver piece.
pub const COPPER_PER_SILVER: u64 = 10;

/// Copper pieces per gold piece.
pub const COPPER_PER_GOLD: u64 = 100;

/// A total value in copper-equivalent units.
///
/// ## Design Decision
/// This is a branded newtype rather than a bare `u64` so that a raw
/// denomination count (e.g. "3 gold") can never be passed where a converted
/// total is expected. Conversions in and out go through
/// [`Currency::to_base`] and [`Currency::from_base`].
///
/// Unsigned by construction: negative balances are unrepresentable, so the
/// "undefined for negative totals" corner of the conversion simply does not
/// exist. Insufficient funds are signalled with `Option` upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BaseUnits(u64);

impl BaseUnits {
    /// Wraps a raw copper-equivalent total.
    #[inline]
    pub const fn new(units: u64) -> Self {
        BaseUnits(units)
    }

    /// Returns the raw copper-equivalent total.
    #[inline]
    pub const fn get(&self) -> u64 {
        self.0
    }

    /// Zero base units.
    #[inline]
    pub const fn zero() -> Self {
        BaseUnits(0)
    }

    /// Checked subtraction; `None` when `other` exceeds `self`.
    #[inline]
    pub const fn checked_sub(self, other: Self) -> Option<Self> {
        match self.0.checked_sub(other.0) {
            Some(units) => Some(BaseUnits(units)),
            None => None,
        }
    }
}

impl Add for BaseUnits {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        BaseUnits(self.0 + other.0)
    }
}

impl fmt::Display for BaseUnits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} cp", self.0)
    }
}

// =============================================================================
// Denomination
// =============================================================================

/// A single coin denomination.
///
/// Serialized as the abbreviations players know: `"cp"`, `"sp"`, `"gp"`.
/// Stored in SQLite as the same text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
pub enum Denomination {
    /// Copper pieces - the base unit.
    #[serde(rename = "cp")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "cp"))]
    Copper,
    /// Silver pieces - 10 copper.
    #[serde(rename = "sp")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "sp"))]
    Silver,
    /// Gold pieces - 100 copper.
    #[serde(rename = "gp")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "gp"))]
    Gold,
}

impl Denomination {
    /// Copper-equivalent value of one coin of this denomination.
    #[inline]
    pub const fn base_value(&self) -> u64 {
        match self {
            Denomination::Copper => 1,
            Denomination::Silver => COPPER_PER_SILVER,
            Denomination::Gold => COPPER_PER_GOLD,
        }
    }

    /// Display abbreviation ("CP", "SP", "GP").
    #[inline]
    pub const fn abbrev(&self) -> &'static str {
        match self {
            Denomination::Copper => "CP",
            Denomination::Silver => "SP",
            Denomination::Gold => "GP",
        }
    }
}

impl fmt::Display for Denomination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.abbrev())
    }
}

// =============================================================================
// Currency
// =============================================================================

/// A three-denomination wallet value (gold / silver / copper).
///
/// ## Design Decisions
/// - **Immutable value type**: every operation returns a new `Currency`;
///   nothing mutates in place.
/// - **u32 fields**: denominations are non-negative by construction. A wallet
///   that cannot cover a price yields `None` from [`checked_sub`], never a
///   negative field.
/// - **Structural equality**: `PartialEq` compares fields. `{0,10,0}` and
///   `{1,0,0}` are *not* structurally equal even though they are equal in
///   value; use [`cmp_value`] for value comparisons.
///
/// [`checked_sub`]: Currency::checked_sub
/// [`cmp_value`]: Currency::cmp_value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Currency {
    /// Gold pieces.
    pub gold: u32,
    /// Silver pieces.
    pub silver: u32,
    /// Copper pieces.
    pub copper: u32,
}

impl Currency {
    /// Creates a wallet value from explicit denomination counts.
    ///
    /// The triple is kept as given; call [`normalize`](Currency::normalize)
    /// for the canonical greedy form.
    #[inline]
    pub const fn new(gold: u32, silver: u32, copper: u32) -> Self {
        Currency {
            gold,
            silver,
            copper,
        }
    }

    /// The zero wallet `{0, 0, 0}`.
    #[inline]
    pub const fn zero() -> Self {
        Currency {
            gold: 0,
            silver: 0,
            copper: 0,
        }
    }

    /// Places `amount` entirely in the given denomination, zero elsewhere.
    ///
    /// ## Example
    /// ```rust
    /// use emporium_core::currency::{Currency, Denomination};
    ///
    /// let price = Currency::from_denomination(3, Denomination::Gold);
    /// assert_eq!(price, Currency::new(3, 0, 0));
    /// ```
    #[inline]
    pub const fn from_denomination(amount: u32, denomination: Denomination) -> Self {
        match denomination {
            Denomination::Gold => Currency::new(amount, 0, 0),
            Denomination::Silver => Currency::new(0, amount, 0),
            Denomination::Copper => Currency::new(0, 0, amount),
        }
    }

    /// Checks if all three fields are zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.gold == 0 && self.silver == 0 && self.copper == 0
    }

    /// Flattens the wallet to copper-equivalent base units.
    ///
    /// `gp*100 + sp*10 + cp`, computed in `u64` so it cannot lose precision
    /// or overflow for any `u32` triple.
    #[inline]
    pub const fn to_base(&self) -> BaseUnits {
        BaseUnits(
            self.gold as u64 * COPPER_PER_GOLD
                + self.silver as u64 * COPPER_PER_SILVER
                + self.copper as u64,
        )
    }

    /// Greedy decomposition of a base-unit total back into denominations.
    ///
    /// As many gold as fit, remainder into silver, remainder into copper:
    /// `237 → {gold: 2, silver: 3, copper: 7}`.
    ///
    /// Round-trip law: `Currency::from_base(x).to_base() == x` for every
    /// total whose gold count fits in `u32` (far beyond any campaign hoard).
    ///
    /// ## Example
    /// ```rust
    /// use emporium_core::currency::{BaseUnits, Currency};
    ///
    /// let c = Currency::from_base(BaseUnits::new(237));
    /// assert_eq!(c, Currency::new(2, 3, 7));
    /// ```
    #[inline]
    pub const fn from_base(total: BaseUnits) -> Self {
        let units = total.get();
        Currency {
            gold: (units / COPPER_PER_GOLD) as u32,
            silver: (units % COPPER_PER_GOLD / COPPER_PER_SILVER) as u32,
            copper: (units % COPPER_PER_SILVER) as u32,
        }
    }

    /// Returns the canonical greedy form of this wallet.
    ///
    /// `{0, 10, 0}` normalizes to `{1, 0, 0}`.
    #[inline]
    pub const fn normalize(&self) -> Self {
        Currency::from_base(self.to_base())
    }

    /// Checks whether this wallet can cover `price`, by value.
    ///
    /// ## Example
    /// ```rust
    /// use emporium_core::currency::Currency;
    ///
    /// // 1 gp == 10 sp, so this is affordable
    /// assert!(Currency::new(1, 0, 0).can_afford(&Currency::new(0, 10, 0)));
    /// ```
    #[inline]
    pub fn can_afford(&self, price: &Currency) -> bool {
        self.to_base() >= price.to_base()
    }

    /// Subtracts `price` from this wallet.
    ///
    /// Returns `None` when the wallet cannot cover the price (the ordinary,
    /// recoverable insufficient-funds case - not an error). On success the
    /// result is the normalized difference; no field is ever negative.
    #[inline]
    pub fn checked_sub(&self, price: &Currency) -> Option<Currency> {
        self.to_base()
            .checked_sub(price.to_base())
            .map(Currency::from_base)
    }

    /// Compares two wallet values by worth, not by shape.
    ///
    /// `{0, 10, 0}` and `{1, 0, 0}` are `Ordering::Equal` here even though
    /// they differ structurally.
    #[inline]
    pub fn cmp_value(&self, other: &Currency) -> Ordering {
        self.to_base().cmp(&other.to_base())
    }
}

/// Addition of two wallet values; the sum is normalized.
impl Add for Currency {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Currency::from_base(self.to_base() + other.to_base())
    }
}

/// Display joins the non-zero denominations high-to-low:
/// `"2 GP, 5 CP"`. The zero wallet renders as `"0 CP"`.
impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_zero() {
            return f.write_str("0 CP");
        }

        let mut first = true;
        for (amount, denomination) in [
            (self.gold, Denomination::Gold),
            (self.silver, Denomination::Silver),
            (self.copper, Denomination::Copper),
        ] {
            if amount == 0 {
                continue;
            }
            if !first {
                f.write_str(", ")?;
            }
            write!(f, "{} {}", amount, denomination)?;
            first = false;
        }
        Ok(())
    }
}

// =============================================================================
// Item Cost
// =============================================================================

/// An amount paired with a single denomination.
///
/// This is the canonical price of a catalog item. A shop listing may override
/// it with a full [`Currency`]-shaped price of its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemCost {
    /// Number of coins.
    pub amount: u32,
    /// Which coin.
    pub denomination: Denomination,
}

impl ItemCost {
    /// Creates a cost of `amount` coins of `denomination`.
    #[inline]
    pub const fn new(amount: u32, denomination: Denomination) -> Self {
        ItemCost {
            amount,
            denomination,
        }
    }

    /// Converts the cost to a wallet value in its own denomination.
    #[inline]
    pub const fn to_currency(&self) -> Currency {
        Currency::from_denomination(self.amount, self.denomination)
    }

    /// The buy-back price a shop pays for this item.
    ///
    /// `floor(amount * modifier)` in the item's original denomination only -
    /// a 10 gp sword sells back for 5 gp at the default 0.5 modifier, never
    /// for 5 gp converted into silver.
    #[inline]
    pub fn sell_value(&self, modifier: f64) -> ItemCost {
        ItemCost {
            amount: (self.amount as f64 * modifier).floor() as u32,
            denomination: self.denomination,
        }
    }
}

impl fmt::Display for ItemCost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.amount, self.denomination)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_base() {
        assert_eq!(Currency::new(2, 3, 7).to_base(), BaseUnits::new(237));
        assert_eq!(Currency::new(0, 0, 0).to_base(), BaseUnits::zero());
        assert_eq!(Currency::new(1, 0, 0).to_base(), BaseUnits::new(100));
        assert_eq!(Currency::new(0, 10, 0).to_base(), BaseUnits::new(100));
    }

    #[test]
    fn test_from_base_canonical_decomposition() {
        assert_eq!(Currency::from_base(BaseUnits::new(237)), Currency::new(2, 3, 7));
        assert_eq!(Currency::from_base(BaseUnits::zero()), Currency::zero());
        assert_eq!(Currency::from_base(BaseUnits::new(9)), Currency::new(0, 0, 9));
        assert_eq!(Currency::from_base(BaseUnits::new(110)), Currency::new(1, 1, 0));
    }

    #[test]
    fn test_round_trip() {
        for units in 0..=1_000u64 {
            let total = BaseUnits::new(units);
            assert_eq!(Currency::from_base(total).to_base(), total);
        }
        // Spot checks well past everyday wallet sizes
        for units in [12_345u64, 999_999, 100_000_007] {
            let total = BaseUnits::new(units);
            assert_eq!(Currency::from_base(total).to_base(), total);
        }
    }

    #[test]
    fn test_affordability_boundary() {
        // 1 gp == 10 sp
        assert!(Currency::new(1, 0, 0).can_afford(&Currency::new(0, 10, 0)));
        // 9 sp 9 cp = 99 base units < 1 gp
        assert!(!Currency::new(0, 9, 9).can_afford(&Currency::new(1, 0, 0)));
        // Exact cover counts as affordable
        assert!(Currency::new(0, 0, 100).can_afford(&Currency::new(1, 0, 0)));
    }

    #[test]
    fn test_checked_sub_insufficient_funds() {
        let wallet = Currency::new(0, 0, 5);
        let price = Currency::new(1, 0, 0);
        assert_eq!(wallet.checked_sub(&price), None);
    }

    #[test]
    fn test_checked_sub_value_law() {
        let wallet = Currency::new(5, 2, 3);
        let price = Currency::new(1, 7, 8);
        let remaining = wallet.checked_sub(&price).unwrap();
        assert_eq!(
            remaining.to_base().get(),
            wallet.to_base().get() - price.to_base().get()
        );
    }

    #[test]
    fn test_checked_sub_breaks_coins() {
        // Paying 1 sp from a wallet holding only gold breaks a gold piece
        let wallet = Currency::new(1, 0, 0);
        let price = Currency::new(0, 1, 0);
        assert_eq!(wallet.checked_sub(&price), Some(Currency::new(0, 9, 0)));
    }

    #[test]
    fn test_add_then_sub_round_trips_to_normalized() {
        let wallet = Currency::new(0, 23, 45); // non-canonical on purpose
        let amount = Currency::new(3, 1, 4);
        let back = (wallet + amount).checked_sub(&amount).unwrap();
        assert_eq!(back, wallet.normalize());
        assert_eq!(back.to_base(), wallet.to_base());
    }

    #[test]
    fn test_add_normalizes() {
        let sum = Currency::new(0, 9, 5) + Currency::new(0, 1, 5);
        assert_eq!(sum, Currency::new(1, 1, 0));
    }

    #[test]
    fn test_display() {
        assert_eq!(Currency::zero().to_string(), "0 CP");
        assert_eq!(Currency::new(2, 0, 5).to_string(), "2 GP, 5 CP");
        assert_eq!(Currency::new(1, 2, 3).to_string(), "1 GP, 2 SP, 3 CP");
        assert_eq!(Currency::new(0, 4, 0).to_string(), "4 SP");
    }

    #[test]
    fn test_cmp_value_ignores_shape() {
        assert_eq!(
            Currency::new(1, 0, 0).cmp_value(&Currency::new(0, 10, 0)),
            Ordering::Equal
        );
        assert_eq!(
            Currency::new(0, 0, 99).cmp_value(&Currency::new(1, 0, 0)),
            Ordering::Less
        );
        assert_eq!(
            Currency::new(2, 0, 0).cmp_value(&Currency::new(1, 9, 9)),
            Ordering::Greater
        );
    }

    #[test]
    fn test_from_denomination() {
        assert_eq!(
            Currency::from_denomination(7, Denomination::Silver),
            Currency::new(0, 7, 0)
        );
        assert_eq!(
            Currency::from_denomination(0, Denomination::Gold),
            Currency::zero()
        );
    }

    #[test]
    fn test_item_cost_to_currency() {
        let cost = ItemCost::new(3, Denomination::Gold);
        assert_eq!(cost.to_currency(), Currency::new(3, 0, 0));
        assert_eq!(cost.to_string(), "3 GP");
    }

    #[test]
    fn test_sell_value_floors_in_same_denomination() {
        let cost = ItemCost::new(10, Denomination::Gold);
        assert_eq!(cost.sell_value(0.5), ItemCost::new(5, Denomination::Gold));

        // Odd amounts floor rather than round
        let cost = ItemCost::new(7, Denomination::Silver);
        assert_eq!(cost.sell_value(0.5), ItemCost::new(3, Denomination::Silver));

        // A 1 cp trinket sells back for nothing at 0.5
        let cost = ItemCost::new(1, Denomination::Copper);
        assert_eq!(cost.sell_value(0.5), ItemCost::new(0, Denomination::Copper));
    }

    #[test]
    fn test_serde_denomination_abbreviations() {
        let cost = ItemCost::new(3, Denomination::Gold);
        let json = serde_json::to_string(&cost).unwrap();
        assert_eq!(json, r#"{"amount":3,"denomination":"gp"}"#);

        let parsed: ItemCost = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, cost);
    }
}
