//! Tariff domain entities

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Utility department an account or tariff belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Department {
    Electricity,
    Gas,
    Water,
}

impl Department {
    pub const ALL: [Department; 3] = [Self::Electricity, Self::Gas, Self::Water];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Electricity => "electricity",
            Self::Gas => "gas",
            Self::Water => "water",
        }
    }
}

impl std::fmt::Display for Department {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Consumer category a tariff set is priced for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TariffCategory {
    Residential,
    Commercial,
    Industrial,
    Agricultural,
}

impl Default for TariffCategory {
    fn default() -> Self {
        Self::Residential
    }
}

impl TariffCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Residential => "residential",
            Self::Commercial => "commercial",
            Self::Industrial => "industrial",
            Self::Agricultural => "agricultural",
        }
    }
}

impl std::fmt::Display for TariffCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Region + locality pair that scopes tariffs
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Jurisdiction {
    pub region: String,
    pub locality: String,
}

impl Jurisdiction {
    pub fn new(region: impl Into<String>, locality: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            locality: locality.into(),
        }
    }
}

impl std::fmt::Display for Jurisdiction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.region, self.locality)
    }
}

/// Key a tariff set is looked up by
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TariffScope {
    pub jurisdiction: Jurisdiction,
    pub department: Department,
    pub category: TariffCategory,
}

/// One rate tier: `[from_units, to_units)` billed at `rate_per_unit`.
#[derive(Debug, Clone, PartialEq)]
pub struct TariffSlab {
    pub from_units: Decimal,
    /// `None` means unbounded
    pub to_units: Option<Decimal>,
    pub rate_per_unit: Decimal,
}

impl TariffSlab {
    pub fn new(from_units: Decimal, to_units: Option<Decimal>, rate_per_unit: Decimal) -> Self {
        Self {
            from_units,
            to_units,
            rate_per_unit,
        }
    }

    /// Number of units this slab can absorb, `None` when unbounded.
    pub fn width(&self) -> Option<Decimal> {
        self.to_units
            .map(|to| (to - self.from_units).max(Decimal::ZERO))
    }
}

/// A complete tariff: ordered slabs plus set-level fixed charge and tax.
///
/// Fixed charge and tax percentage live on the set, never on a slab row,
/// so they apply the same way whichever tier consumption reaches.
#[derive(Debug, Clone, PartialEq)]
pub struct TariffSet {
    pub id: i32,
    pub name: String,
    pub scope: TariffScope,
    pub fixed_charge: Decimal,
    pub tax_percentage: Decimal,
    pub slabs: Vec<TariffSlab>,
}

impl TariffSet {
    /// Sort slabs ascending by lower bound.
    pub fn sort_slabs(&mut self) {
        self.slabs.sort_by(|a, b| a.from_units.cmp(&b.from_units));
    }

    pub fn is_sorted(&self) -> bool {
        self.slabs
            .windows(2)
            .all(|pair| pair[0].from_units <= pair[1].from_units)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn slab_width() {
        assert_eq!(
            TariffSlab::new(dec!(0), Some(dec!(100)), dec!(6.42)).width(),
            Some(dec!(100))
        );
        assert_eq!(TariffSlab::new(dec!(300), None, dec!(9)).width(), None);
        // inverted bounds never yield negative capacity
        assert_eq!(
            TariffSlab::new(dec!(50), Some(dec!(10)), dec!(1)).width(),
            Some(dec!(0))
        );
    }

    #[test]
    fn sort_slabs_orders_by_lower_bound() {
        let mut set = TariffSet {
            id: 1,
            name: "t".into(),
            scope: TariffScope {
                jurisdiction: Jurisdiction::new("North", "Springfield"),
                department: Department::Electricity,
                category: TariffCategory::Residential,
            },
            fixed_charge: dec!(0),
            tax_percentage: dec!(0),
            slabs: vec![
                TariffSlab::new(dec!(300), None, dec!(9)),
                TariffSlab::new(dec!(0), Some(dec!(100)), dec!(6.42)),
                TariffSlab::new(dec!(101), Some(dec!(300)), dec!(8)),
            ],
        };
        assert!(!set.is_sorted());
        set.sort_slabs();
        assert!(set.is_sorted());
        assert_eq!(set.slabs[0].from_units, dec!(0));
        assert_eq!(set.slabs[2].from_units, dec!(300));
    }

    #[test]
    fn enum_display() {
        assert_eq!(Department::Water.to_string(), "water");
        assert_eq!(TariffCategory::Agricultural.to_string(), "agricultural");
        assert_eq!(
            Jurisdiction::new("North", "Springfield").to_string(),
            "North/Springfield"
        );
    }
}
