use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::schema::fungible_token_prices;

/// Cached USD price of one ERC-20 deployment, keyed by
/// `(token_address, chain_id)`. Staleness is judged by the caller.
#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Selectable, Insertable)]
#[diesel(table_name = fungible_token_prices)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct FungibleTokenPriceRow {
    pub token_address: String,
    pub chain_id: i64,
    pub usd_value: BigDecimal,
    pub decimals: i32,
    pub updated_at: DateTime<Utc>,
}

impl FungibleTokenPriceRow {
    /// Bulk keyed lookup for the given `(token_address, chain_id)` pairs.
    pub fn find_by_tokens(
        keys: &[(String, i64)],
        conn: &mut diesel::PgConnection,
    ) -> QueryResult<Vec<Self>> {
        if keys.is_empty() {
            return Ok(Vec::new());
        }

        let mut query = fungible_token_prices::table.into_boxed();
        for (token_address, chain_id) in keys {
            query = query.or_filter(
                fungible_token_prices::token_address
                    .eq(token_address.clone())
                    .and(fungible_token_prices::chain_id.eq(*chain_id)),
            );
        }
        query.load(conn)
    }

    /// Insert-or-replace by `(token_address, chain_id)`.
    pub fn upsert(row: &Self, conn: &mut diesel::PgConnection) -> QueryResult<Self> {
        diesel::insert_into(fungible_token_prices::table)
            .values(row)
            .on_conflict((
                fungible_token_prices::token_address,
                fungible_token_prices::chain_id,
            ))
            .do_update()
            .set((
                fungible_token_prices::usd_value.eq(&row.usd_value),
                fungible_token_prices::decimals.eq(row.decimals),
                fungible_token_prices::updated_at.eq(row.updated_at),
            ))
            .returning(Self::as_returning())
            .get_result(conn)
    }
}
