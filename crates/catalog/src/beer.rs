use core::str::FromStr;

use serde::{Deserialize, Serialize};

use beerstock_core::{BeerId, DomainError, DomainResult, Entity, ValueObject};

/// Longest accepted `name` / `brand`, in characters.
pub const MAX_TEXT_LEN: usize = 200;

/// Upper bound for a beer's capacity ceiling.
pub const MAX_CAPACITY: u32 = 500;

/// Upper bound for the quantity supplied at registration.
pub const MAX_INITIAL_QUANTITY: u32 = 100;

/// Beer style (closed set).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BeerType {
    Lager,
    Pilsen,
    Malte,
    Witbier,
    Weiss,
    Ale,
    Ipa,
    Stout,
    Porter,
}

impl BeerType {
    pub const ALL: [BeerType; 9] = [
        BeerType::Lager,
        BeerType::Pilsen,
        BeerType::Malte,
        BeerType::Witbier,
        BeerType::Weiss,
        BeerType::Ale,
        BeerType::Ipa,
        BeerType::Stout,
        BeerType::Porter,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            BeerType::Lager => "LAGER",
            BeerType::Pilsen => "PILSEN",
            BeerType::Malte => "MALTE",
            BeerType::Witbier => "WITBIER",
            BeerType::Weiss => "WEISS",
            BeerType::Ale => "ALE",
            BeerType::Ipa => "IPA",
            BeerType::Stout => "STOUT",
            BeerType::Porter => "PORTER",
        }
    }
}

impl core::fmt::Display for BeerType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BeerType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BeerType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| DomainError::validation(format!("unknown beer type: {s}")))
    }
}

/// A registered beer.
///
/// `quantity` only changes through the ledger's adjustment operations; every
/// other field is fixed once the store has assigned the id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Beer {
    id: BeerId,
    name: String,
    brand: String,
    #[serde(rename = "type")]
    kind: BeerType,
    quantity: u32,
    max: u32,
}

impl Beer {
    /// Attach a store-assigned id to a registration candidate.
    pub fn from_new(id: BeerId, new: NewBeer) -> Self {
        Self {
            id,
            name: new.name,
            brand: new.brand,
            kind: new.kind,
            quantity: new.quantity,
            max: new.max,
        }
    }

    pub fn id_typed(&self) -> BeerId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn brand(&self) -> &str {
        &self.brand
    }

    pub fn kind(&self) -> BeerType {
        self.kind
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn max(&self) -> u32 {
        self.max
    }

    /// Same beer, with `quantity` replaced.
    pub fn with_quantity(self, quantity: u32) -> Self {
        Self { quantity, ..self }
    }
}

impl Entity for Beer {
    type Id = BeerId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Registration candidate: every `Beer` field except the id.
///
/// `quantity <= max` is deliberately not required here; only adjustments
/// enforce the ceiling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBeer {
    pub name: String,
    pub brand: String,
    #[serde(rename = "type")]
    pub kind: BeerType,
    pub quantity: u32,
    pub max: u32,
}

impl NewBeer {
    /// Field-level checks applied at the request boundary.
    pub fn validate(&self) -> DomainResult<()> {
        validate_text("name", &self.name)?;
        validate_text("brand", &self.brand)?;

        if self.max > MAX_CAPACITY {
            return Err(DomainError::validation(format!(
                "max must be at most {MAX_CAPACITY}"
            )));
        }
        if self.quantity > MAX_INITIAL_QUANTITY {
            return Err(DomainError::validation(format!(
                "quantity must be at most {MAX_INITIAL_QUANTITY}"
            )));
        }
        Ok(())
    }
}

fn validate_text(field: &str, value: &str) -> DomainResult<()> {
    if value.trim().is_empty() {
        return Err(DomainError::validation(format!("{field} cannot be empty")));
    }
    if value.chars().count() > MAX_TEXT_LEN {
        return Err(DomainError::validation(format!(
            "{field} must be at most {MAX_TEXT_LEN} characters"
        )));
    }
    Ok(())
}

/// Amount moved by a single increment or decrement.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct StockDelta(u32);

impl StockDelta {
    pub const MIN: u32 = 1;
    pub const MAX: u32 = 100;

    pub fn new(amount: u32) -> DomainResult<Self> {
        if !(Self::MIN..=Self::MAX).contains(&amount) {
            return Err(DomainError::validation(format!(
                "quantity must be between {} and {}",
                Self::MIN,
                Self::MAX
            )));
        }
        Ok(Self(amount))
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl ValueObject for StockDelta {}

impl core::fmt::Display for StockDelta {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}
