use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::schema::native_asset_prices;

/// Cached USD price of one chain's native asset: the raw oracle answer plus
/// the feed's decimal scale. Staleness is judged by the caller.
#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Selectable, Insertable)]
#[diesel(table_name = native_asset_prices)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NativeAssetPriceRow {
    pub chain_id: i64,
    pub usd_value: BigDecimal,
    pub decimals: i32,
    pub updated_at: DateTime<Utc>,
}

impl NativeAssetPriceRow {
    /// Bulk keyed lookup for the given chains.
    pub fn find_by_chain_ids(
        chain_ids: &[i64],
        conn: &mut diesel::PgConnection,
    ) -> QueryResult<Vec<Self>> {
        native_asset_prices::table
            .filter(native_asset_prices::chain_id.eq_any(chain_ids))
            .load(conn)
    }

    /// Insert-or-replace by chain id.
    pub fn upsert(row: &Self, conn: &mut diesel::PgConnection) -> QueryResult<Self> {
        diesel::insert_into(native_asset_prices::table)
            .values(row)
            .on_conflict(native_asset_prices::chain_id)
            .do_update()
            .set((
                native_asset_prices::usd_value.eq(&row.usd_value),
                native_asset_prices::decimals.eq(row.decimals),
                native_asset_prices::updated_at.eq(row.updated_at),
            ))
            .returning(Self::as_returning())
            .get_result(conn)
    }
}
