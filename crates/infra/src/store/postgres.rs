//! Postgres-backed beer store.
//!
//! ## Error Mapping
//!
//! | Source | StoreError |
//! |--------|------------|
//! | any `sqlx::Error` | `Backend` (message includes the operation name) |
//! | unknown `beer_type` text, negative or oversized integers | `Corrupt` |
//! | `UPDATE` matching no row | `Missing` |
//!
//! A unique violation on `name` (two registrations racing past the ledger's
//! name check) surfaces as `Backend`.

use std::sync::Arc;

use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use tracing::instrument;

use beerstock_catalog::{Beer, BeerStore, BeerType, NewBeer, StoreError, StoreResult};
use beerstock_core::BeerId;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS beers (
    id           UUID PRIMARY KEY,
    name         TEXT NOT NULL UNIQUE,
    brand        TEXT NOT NULL,
    beer_type    TEXT NOT NULL,
    quantity     INTEGER NOT NULL CHECK (quantity >= 0),
    max_quantity INTEGER NOT NULL CHECK (max_quantity >= 0)
)
"#;

const COLUMNS: &str = "id, name, brand, beer_type, quantity, max_quantity";

/// Postgres-backed beer store.
///
/// Uses the SQLx connection pool, which is `Send + Sync`. Each trait call is
/// a single statement; nothing here wraps the ledger's read and write in one
/// transaction.
#[derive(Debug, Clone)]
pub struct PostgresBeerStore {
    pool: Arc<PgPool>,
}

impl PostgresBeerStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    /// Create the `beers` table if it does not exist yet.
    pub async fn ensure_schema(&self) -> StoreResult<()> {
        sqlx::query(SCHEMA)
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("ensure_schema", e))?;
        Ok(())
    }
}

fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) => StoreError::Backend(format!(
            "database error in {operation}: {} (code {})",
            db_err.message(),
            db_err.code().as_deref().unwrap_or("none"),
        )),
        other => StoreError::Backend(format!("{operation}: {other}")),
    }
}

fn to_db_int(field: &str, value: u32) -> StoreResult<i32> {
    i32::try_from(value).map_err(|_| StoreError::Corrupt(format!("{field} {value} out of range")))
}

fn from_db_int(field: &str, value: i32) -> StoreResult<u32> {
    u32::try_from(value).map_err(|_| StoreError::Corrupt(format!("{field} {value} is negative")))
}

fn row_to_beer(row: &PgRow) -> StoreResult<Beer> {
    let get_err = |e: sqlx::Error| StoreError::Corrupt(e.to_string());

    let id: uuid::Uuid = row.try_get("id").map_err(get_err)?;
    let name: String = row.try_get("name").map_err(get_err)?;
    let brand: String = row.try_get("brand").map_err(get_err)?;
    let beer_type: String = row.try_get("beer_type").map_err(get_err)?;
    let quantity: i32 = row.try_get("quantity").map_err(get_err)?;
    let max: i32 = row.try_get("max_quantity").map_err(get_err)?;

    let kind: BeerType = beer_type
        .parse()
        .map_err(|e| StoreError::Corrupt(format!("beer {id}: {e}")))?;

    Ok(Beer::from_new(
        BeerId::from_uuid(id),
        NewBeer {
            name,
            brand,
            kind,
            quantity: from_db_int("quantity", quantity)?,
            max: from_db_int("max_quantity", max)?,
        },
    ))
}

#[async_trait::async_trait]
impl BeerStore for PostgresBeerStore {
    #[instrument(skip(self))]
    async fn find_by_name(&self, name: &str) -> StoreResult<Option<Beer>> {
        let row = sqlx::query(&format!("SELECT {COLUMNS} FROM beers WHERE name = $1"))
            .bind(name)
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_by_name", e))?;

        row.as_ref().map(row_to_beer).transpose()
    }

    #[instrument(skip(self), fields(beer_id = %id))]
    async fn find_by_id(&self, id: BeerId) -> StoreResult<Option<Beer>> {
        let row = sqlx::query(&format!("SELECT {COLUMNS} FROM beers WHERE id = $1"))
            .bind(id.as_uuid())
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_by_id", e))?;

        row.as_ref().map(row_to_beer).transpose()
    }

    #[instrument(skip_all, fields(name = %beer.name))]
    async fn insert(&self, beer: NewBeer) -> StoreResult<Beer> {
        let id = BeerId::new();
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO beers ({COLUMNS})
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(id.as_uuid())
        .bind(&beer.name)
        .bind(&beer.brand)
        .bind(beer.kind.as_str())
        .bind(to_db_int("quantity", beer.quantity)?)
        .bind(to_db_int("max", beer.max)?)
        .fetch_one(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("insert", e))?;

        row_to_beer(&row)
    }

    #[instrument(skip_all, fields(beer_id = %beer.id_typed()))]
    async fn save(&self, beer: Beer) -> StoreResult<Beer> {
        let row = sqlx::query(&format!(
            r#"
            UPDATE beers
            SET name = $2, brand = $3, beer_type = $4, quantity = $5, max_quantity = $6
            WHERE id = $1
            RETURNING {COLUMNS}
            "#
        ))
        .bind(beer.id_typed().as_uuid())
        .bind(beer.name())
        .bind(beer.brand())
        .bind(beer.kind().as_str())
        .bind(to_db_int("quantity", beer.quantity())?)
        .bind(to_db_int("max", beer.max())?)
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("save", e))?;

        match row {
            Some(row) => row_to_beer(&row),
            None => Err(StoreError::Missing(beer.id_typed())),
        }
    }

    #[instrument(skip(self), fields(beer_id = %id))]
    async fn delete_by_id(&self, id: BeerId) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM beers WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete_by_id", e))?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self))]
    async fn find_all(&self) -> StoreResult<Vec<Beer>> {
        let rows = sqlx::query(&format!("SELECT {COLUMNS} FROM beers ORDER BY id"))
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_all", e))?;

        rows.iter().map(row_to_beer).collect()
    }
}
