use chrono::{DateTime, Utc};
use diesel::prelude::*;
use folio_types::WalletPortfolioData;
use serde::{Deserialize, Serialize};

use crate::schema::wallet_portfolios;

/// One wallet's balance snapshot. The balance lists travel as Jsonb so the
/// whole snapshot is written in a single atomic upsert.
#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Selectable, Insertable)]
#[diesel(table_name = wallet_portfolios)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct WalletPortfolioRow {
    pub wallet_address: String,
    pub native_balances: serde_json::Value,
    pub fungible_balances: serde_json::Value,
    pub nft_balances: serde_json::Value,
    pub failed_calls: serde_json::Value,
    pub updated_at: DateTime<Utc>,
}

impl WalletPortfolioRow {
    /// Find a wallet's snapshot. `None` means the wallet was never fetched,
    /// which is distinct from "fetched but stale".
    pub fn find_by_wallet(
        wallet_address: &str,
        conn: &mut diesel::PgConnection,
    ) -> QueryResult<Option<Self>> {
        wallet_portfolios::table
            .find(wallet_address)
            .first(conn)
            .optional()
    }

    /// Insert-or-replace by wallet address: the last successful refresh wins
    /// wholesale, never a partial mutation.
    pub fn upsert(row: &Self, conn: &mut diesel::PgConnection) -> QueryResult<Self> {
        diesel::insert_into(wallet_portfolios::table)
            .values(row)
            .on_conflict(wallet_portfolios::wallet_address)
            .do_update()
            .set((
                wallet_portfolios::native_balances.eq(&row.native_balances),
                wallet_portfolios::fungible_balances.eq(&row.fungible_balances),
                wallet_portfolios::nft_balances.eq(&row.nft_balances),
                wallet_portfolios::failed_calls.eq(&row.failed_calls),
                wallet_portfolios::updated_at.eq(row.updated_at),
            ))
            .returning(Self::as_returning())
            .get_result(conn)
    }

    pub fn from_data(data: &WalletPortfolioData) -> Result<Self, serde_json::Error> {
        Ok(Self {
            wallet_address: data.wallet_address.clone(),
            native_balances: serde_json::to_value(&data.native_balances)?,
            fungible_balances: serde_json::to_value(&data.fungible_balances)?,
            nft_balances: serde_json::to_value(&data.nft_balances)?,
            failed_calls: serde_json::to_value(&data.failed_calls)?,
            updated_at: data.updated_at,
        })
    }

    pub fn into_data(self) -> Result<WalletPortfolioData, serde_json::Error> {
        Ok(WalletPortfolioData {
            wallet_address: self.wallet_address,
            native_balances: serde_json::from_value(self.native_balances)?,
            fungible_balances: serde_json::from_value(self.fungible_balances)?,
            nft_balances: serde_json::from_value(self.nft_balances)?,
            failed_calls: serde_json::from_value(self.failed_calls)?,
            updated_at: self.updated_at,
        })
    }
}
