//! Petition search for the SQLite backend.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::Row;

use crate::core::PetitionSearchProvider;
use crate::error::{BackendError, StorageError, StorageResult};
use crate::types::{PetitionSummary, SearchFilters};

use super::SqliteBackend;
use super::search::{QueryBuilder, SqlParam};

fn internal_error(message: String) -> StorageError {
    StorageError::Backend(BackendError::Internal {
        backend_name: "sqlite".to_string(),
        message,
        source: None,
    })
}

fn summary_from_row(row: &Row<'_>) -> rusqlite::Result<PetitionSummary> {
    let creation_date: DateTime<Utc> = row.get(6)?;
    Ok(PetitionSummary {
        petition_id: row.get(0)?,
        title: row.get(1)?,
        category_id: row.get(2)?,
        owner_id: row.get(3)?,
        owner_first_name: row.get(4)?,
        owner_last_name: row.get(5)?,
        creation_date,
        number_of_supporters: row.get(7)?,
        supporting_cost: row.get(8)?,
    })
}

#[async_trait]
impl PetitionSearchProvider for SqliteBackend {
    async fn find_petitions(
        &self,
        filters: &SearchFilters,
    ) -> StorageResult<Vec<PetitionSummary>> {
        let query = QueryBuilder::new().build(filters);
        tracing::debug!(
            sql = %query.sql,
            params = query.params.len(),
            "Executing petition search"
        );

        let conn = self.get_connection()?;
        let mut stmt = conn
            .prepare(&query.sql)
            .map_err(|e| internal_error(format!("Failed to prepare search: {}", e)))?;

        let bound: Vec<Box<dyn rusqlite::ToSql>> = query
            .params
            .iter()
            .map(|param| -> Box<dyn rusqlite::ToSql> {
                match param {
                    SqlParam::String(s) => Box::new(s.clone()),
                    SqlParam::Integer(i) => Box::new(*i),
                    SqlParam::Null => Box::new(Option::<i64>::None),
                }
            })
            .collect();
        let param_refs: Vec<&dyn rusqlite::ToSql> = bound.iter().map(|p| p.as_ref()).collect();

        let rows = stmt
            .query_map(param_refs.as_slice(), summary_from_row)
            .map_err(|e| internal_error(format!("Failed to execute search: {}", e)))?;

        rows.collect::<Result<Vec<_>, _>>()
            .map_err(|e| internal_error(format!("Failed to read row: {}", e)))
    }
}
