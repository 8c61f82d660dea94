use serde::Deserialize;

use beerstock_catalog::{Beer, BeerType, NewBeer, StockDelta};
use beerstock_core::DomainResult;

// -------------------------
// Request DTOs
// -------------------------

/// Body of `POST /api/v1/beers`. An `id` field, if sent, is ignored.
#[derive(Debug, Deserialize)]
pub struct CreateBeerRequest {
    pub name: String,
    pub brand: String,
    pub max: u32,
    pub quantity: u32,
    #[serde(rename = "type")]
    pub kind: BeerType,
}

impl CreateBeerRequest {
    /// Validated registration candidate.
    pub fn into_new_beer(self) -> DomainResult<NewBeer> {
        let new = NewBeer {
            name: self.name,
            brand: self.brand,
            kind: self.kind,
            quantity: self.quantity,
            max: self.max,
        };
        new.validate()?;
        Ok(new)
    }
}

/// Body of the increment/decrement endpoints.
#[derive(Debug, Deserialize)]
pub struct QuantityRequest {
    pub quantity: u32,
}

impl QuantityRequest {
    pub fn into_delta(self) -> DomainResult<StockDelta> {
        StockDelta::new(self.quantity)
    }
}

// -------------------------
// JSON mapping helpers
// -------------------------

pub fn beer_to_json(beer: &Beer) -> serde_json::Value {
    serde_json::json!({
        "id": beer.id_typed().to_string(),
        "name": beer.name(),
        "brand": beer.brand(),
        "max": beer.max(),
        "quantity": beer.quantity(),
        "type": beer.kind().as_str(),
    })
}
