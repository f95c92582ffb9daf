// ── Ingredient value type ──
//
// An ingredient is identified by its exact `(name, unit)` pair. Quantities
// of the same ingredient merge by summation; nothing is ever normalized,
// so "g" and "kg" (or "Milk" and "milk") stay distinct.

use std::fmt;
use std::ops::{Add, Mul};
use std::str::FromStr;

use bigdecimal::{BigDecimal, ParseBigDecimalError};
use serde::de::{self, Unexpected, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::CoreError;

// ── Quantity ────────────────────────────────────────────────────────

/// Amount of an ingredient: an exact integer or an exact decimal.
///
/// Integer arithmetic stays in `i64`. Mixing in a decimal (or overflowing
/// `i64`) promotes the result to a [`BigDecimal`], so sums are exact and
/// independent of grouping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Quantity {
    Integer(i64),
    Decimal(BigDecimal),
}

impl Quantity {
    /// The value as an exact decimal.
    pub fn to_decimal(&self) -> BigDecimal {
        match self {
            Self::Integer(n) => BigDecimal::from(*n),
            Self::Decimal(d) => d.clone(),
        }
    }

    pub fn is_integer(&self) -> bool {
        matches!(self, Self::Integer(_))
    }
}

impl Default for Quantity {
    fn default() -> Self {
        Self::Integer(0)
    }
}

impl Add for Quantity {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        if let (Self::Integer(a), Self::Integer(b)) = (&self, &rhs) {
            if let Some(sum) = a.checked_add(*b) {
                return Self::Integer(sum);
            }
        }
        Self::Decimal(self.to_decimal() + rhs.to_decimal())
    }
}

impl Mul<u32> for Quantity {
    type Output = Self;

    fn mul(self, factor: u32) -> Self {
        if let Self::Integer(n) = &self {
            if let Some(product) = n.checked_mul(i64::from(factor)) {
                return Self::Integer(product);
            }
        }
        Self::Decimal(self.to_decimal() * BigDecimal::from(factor))
    }
}

impl From<i64> for Quantity {
    fn from(n: i64) -> Self {
        Self::Integer(n)
    }
}

impl From<u32> for Quantity {
    fn from(n: u32) -> Self {
        Self::Integer(i64::from(n))
    }
}

impl From<i32> for Quantity {
    fn from(n: i32) -> Self {
        Self::Integer(i64::from(n))
    }
}

impl From<BigDecimal> for Quantity {
    fn from(d: BigDecimal) -> Self {
        Self::Decimal(d)
    }
}

/// Shortest plain rendering: `1.50` prints as `1.5`, `2.0` as `2`.
fn plain_decimal(d: &BigDecimal) -> String {
    let normalized = d.normalized();
    let (_, scale) = normalized.as_bigint_and_exponent();
    if scale <= 0 {
        normalized.with_scale(0).to_string()
    } else {
        normalized.to_string()
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(n) => write!(f, "{n}"),
            Self::Decimal(d) => f.write_str(&plain_decimal(d)),
        }
    }
}

/// Accepts integers and finite decimal literals (`12`, `0.25`, `1e3`).
/// `nan` and `inf` are not numbers here.
impl FromStr for Quantity {
    type Err = ParseBigDecimalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(n) = s.parse::<i64>() {
            return Ok(Self::Integer(n));
        }
        BigDecimal::from_str(s).map(Self::Decimal)
    }
}

// ── Quantity serde ──────────────────────────────────────────────────
//
// Stored as a bare JSON number whenever that number reads back to the
// same decimal; otherwise as a decimal string.

impl Serialize for Quantity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Integer(n) => serializer.serialize_i64(*n),
            Self::Decimal(d) => {
                let text = plain_decimal(d);
                match text.parse::<f64>() {
                    Ok(x) if x.is_finite() && x.to_string() == text => serializer.serialize_f64(x),
                    _ => serializer.serialize_str(&text),
                }
            }
        }
    }
}

impl<'de> Deserialize<'de> for Quantity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(QuantityVisitor)
    }
}

struct QuantityVisitor;

impl Visitor<'_> for QuantityVisitor {
    type Value = Quantity;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a finite number or a decimal string")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Quantity, E> {
        Ok(Quantity::Integer(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Quantity, E> {
        Ok(i64::try_from(v).map_or_else(|_| Quantity::Decimal(BigDecimal::from(v)), Quantity::Integer))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Quantity, E> {
        if !v.is_finite() {
            return Err(E::invalid_value(Unexpected::Float(v), &self));
        }
        BigDecimal::from_str(&v.to_string())
            .map(Quantity::Decimal)
            .map_err(|_| E::invalid_value(Unexpected::Float(v), &self))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Quantity, E> {
        v.parse()
            .map_err(|_| E::invalid_value(Unexpected::Str(v), &self))
    }
}

// ── IngredientKey ───────────────────────────────────────────────────

/// Merge identity of an ingredient. Quantity is deliberately not part of it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IngredientKey {
    pub name: String,
    pub unit: String,
}

impl fmt::Display for IngredientKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.unit)
    }
}

// ── Ingredient ──────────────────────────────────────────────────────

/// A quantity of a named substance in a given unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    pub name: String,
    pub quantity: Quantity,
    pub unit: String,
}

impl Ingredient {
    pub fn new(name: impl Into<String>, quantity: impl Into<Quantity>, unit: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            quantity: quantity.into(),
            unit: unit.into(),
        }
    }

    pub fn key(&self) -> IngredientKey {
        IngredientKey {
            name: self.name.clone(),
            unit: self.unit.clone(),
        }
    }

    /// Whether `other` is the same ingredient (exact name and unit match).
    pub fn same_as(&self, other: &Self) -> bool {
        self.name == other.name && self.unit == other.unit
    }

    /// Combine two instances of the same ingredient into a new one.
    ///
    /// Fails with [`CoreError::IncompatibleIngredient`] when names or
    /// units differ.
    pub fn merge(&self, other: &Self) -> Result<Self, CoreError> {
        if !self.same_as(other) {
            return Err(CoreError::IncompatibleIngredient {
                left: self.key(),
                right: other.key(),
            });
        }
        Ok(Self {
            name: self.name.clone(),
            quantity: self.quantity.clone() + other.quantity.clone(),
            unit: self.unit.clone(),
        })
    }

    /// The same ingredient with its quantity multiplied by `factor`.
    pub fn scaled(&self, factor: u32) -> Self {
        Self {
            name: self.name.clone(),
            quantity: self.quantity.clone() * factor,
            unit: self.unit.clone(),
        }
    }
}

impl fmt::Display for Ingredient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {} {}", self.name, self.quantity, self.unit)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn merge_sums_quantities() {
        let a = Ingredient::new("pasta", 500, "g");
        let b = Ingredient::new("pasta", 600, "g");
        let merged = a.merge(&b).unwrap();
        assert_eq!(merged, Ingredient::new("pasta", 1100, "g"));
    }

    #[test]
    fn merge_rejects_different_unit() {
        let litre = Ingredient::new("milk", 1, "l");
        let millilitre = Ingredient::new("milk", 1, "ml");
        let err = litre.merge(&millilitre).unwrap_err();
        assert!(matches!(err, CoreError::IncompatibleIngredient { .. }));
    }

    #[test]
    fn merge_rejects_different_name() {
        let a = Ingredient::new("Milk", 1, "l");
        let b = Ingredient::new("milk", 1, "l");
        assert!(a.merge(&b).is_err());
    }

    #[test]
    fn merge_is_commutative() {
        let a = Ingredient::new("flour", 250, "g");
        let b = Ingredient::new("flour", 75, "g");
        assert_eq!(a.merge(&b).unwrap(), b.merge(&a).unwrap());
    }

    #[test]
    fn merge_is_associative() {
        let a = Ingredient::new("sugar", 10, "g");
        let b = Ingredient::new("sugar", 20, "g");
        let c = Ingredient::new("sugar", 30, "g");
        let left = a.merge(&b).unwrap().merge(&c).unwrap();
        let right = a.merge(&b.merge(&c).unwrap()).unwrap();
        assert_eq!(left, right);
    }

    #[test]
    fn merge_leaves_operands_untouched() {
        let a = Ingredient::new("egg", 2, "pcs");
        let b = Ingredient::new("egg", 3, "pcs");
        let _ = a.merge(&b).unwrap();
        assert_eq!(a.quantity, Quantity::Integer(2));
        assert_eq!(b.quantity, Quantity::Integer(3));
    }

    #[test]
    fn key_ignores_quantity() {
        let a = Ingredient::new("salt", 1, "pinch");
        let b = Ingredient::new("salt", 9, "pinch");
        assert_eq!(a.key(), b.key());
    }

    #[test]
    fn scaled_multiplies_quantity() {
        let a = Ingredient::new("tomato", 500, "g");
        assert_eq!(a.scaled(3).quantity, Quantity::Integer(1500));
    }

    fn dec(s: &str) -> Quantity {
        Quantity::Decimal(s.parse().unwrap())
    }

    #[test]
    fn decimal_promotes_sum() {
        let q = Quantity::Integer(1) + dec("0.5");
        assert_eq!(q, dec("1.5"));
        assert_eq!(q.to_string(), "1.5");
    }

    #[test]
    fn integer_overflow_promotes_to_decimal() {
        let q = Quantity::Integer(i64::MAX) + Quantity::Integer(1);
        assert!(!q.is_integer());
        assert_eq!(q.to_string(), "9223372036854775808");
    }

    #[test]
    fn decimal_merge_is_exact_and_associative() {
        let a = Ingredient::new("vinegar", dec("0.1"), "l");
        let b = Ingredient::new("vinegar", dec("0.2"), "l");
        let c = Ingredient::new("vinegar", dec("0.3"), "l");
        let left = a.merge(&b).unwrap().merge(&c).unwrap();
        let right = a.merge(&b.merge(&c).unwrap()).unwrap();
        assert_eq!(left, right);
        assert_eq!(left.quantity.to_string(), "0.6");
    }

    #[test]
    fn decimal_scaling_is_exact() {
        assert_eq!((dec("0.1") * 3).to_string(), "0.3");
        assert_eq!((dec("0.5") * 4).to_string(), "2");
    }

    #[test]
    fn quantity_parses_integers_and_decimals() {
        assert_eq!("12".parse::<Quantity>().unwrap(), Quantity::Integer(12));
        assert_eq!("0.25".parse::<Quantity>().unwrap(), dec("0.25"));
        assert!("a lot".parse::<Quantity>().is_err());
    }

    #[test]
    fn non_finite_quantities_are_rejected() {
        for raw in ["nan", "NaN", "inf", "-inf", "infinity"] {
            assert!(raw.parse::<Quantity>().is_err(), "{raw} parsed");
        }
        // Too large for f64, still an exact decimal.
        let huge: Quantity = "1e400".parse().unwrap();
        let json = serde_json::to_value(&huge).unwrap();
        assert_eq!(serde_json::from_value::<Quantity>(json).unwrap(), huge);
    }

    #[test]
    fn decimal_round_trips_as_json_number() {
        let ingredient = Ingredient::new("oil", dec("1.5"), "tbsp");
        let json = serde_json::to_value(&ingredient).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"name": "oil", "quantity": 1.5, "unit": "tbsp"})
        );
        let back: Ingredient = serde_json::from_value(json).unwrap();
        assert_eq!(back, ingredient);
    }

    #[test]
    fn decimal_string_is_accepted() {
        let q: Quantity = serde_json::from_value(serde_json::json!("0.75")).unwrap();
        assert_eq!(q, dec("0.75"));
        assert!(serde_json::from_value::<Quantity>(serde_json::json!(null)).is_err());
    }

    #[test]
    fn quantity_serializes_as_bare_number() {
        let ingredient = Ingredient::new("carrot", 2, "pcs");
        let json = serde_json::to_value(&ingredient).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"name": "carrot", "quantity": 2, "unit": "pcs"})
        );
        let back: Ingredient = serde_json::from_value(json).unwrap();
        assert_eq!(back, ingredient);
    }

    #[test]
    fn display_matches_listing_format() {
        let a = Ingredient::new("milk", 1, "l");
        assert_eq!(a.to_string(), "milk -> 1 l");
    }
}
