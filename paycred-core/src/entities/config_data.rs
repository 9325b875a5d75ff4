//! SQL processors for the `core_config_data` table.
//!
//! Rows are keyed by `(scope, scope_id, path)`. Saves are upserts; deletes
//! of absent rows affect zero rows and are not an error.

use kanau::processor::Processor;

use crate::ScopeDescriptor;
use crate::framework::{DatabaseAccessor, DatabaseProcessor};
use crate::store::ConfigEntry;

const UPSERT_CONFIG_VALUE: &str = r#"
    INSERT INTO core_config_data (scope, scope_id, path, value)
    VALUES ($1, $2, $3, $4)
    ON CONFLICT (scope, scope_id, path)
    DO UPDATE SET value = EXCLUDED.value, updated_at = now()
"#;

const DELETE_CONFIG_VALUE: &str = r#"
    DELETE FROM core_config_data
    WHERE scope = $1 AND scope_id = $2 AND path = $3
"#;

async fn upsert_config_value(
    accessor: &mut impl DatabaseAccessor,
    scope: &ScopeDescriptor,
    path: &str,
    value: &str,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(UPSERT_CONFIG_VALUE)
        .bind(scope.scope.as_str())
        .bind(i64::from(scope.scope_id))
        .bind(path)
        .bind(value)
        .execute(accessor.acquire())
        .await?;
    Ok(result.rows_affected())
}

#[derive(Debug, Clone)]
/// Insert or overwrite one configuration value.
pub struct SaveConfigValue {
    pub scope: ScopeDescriptor,
    pub path: String,
    pub value: String,
}

impl Processor<SaveConfigValue> for DatabaseProcessor {
    type Output = u64;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:SaveConfigValue")]
    async fn process(&self, save: SaveConfigValue) -> Result<u64, sqlx::Error> {
        let mut db = self.clone();
        upsert_config_value(&mut db, &save.scope, &save.path, &save.value).await
    }
}

#[derive(Debug, Clone)]
/// Insert or overwrite several values of one scope in a single transaction.
///
/// Either every entry is stored or none is.
pub struct SaveConfigValues {
    pub scope: ScopeDescriptor,
    pub entries: Vec<ConfigEntry>,
}

impl Processor<SaveConfigValues> for DatabaseProcessor {
    type Output = u64;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:SaveConfigValues")]
    async fn process(&self, save: SaveConfigValues) -> Result<u64, sqlx::Error> {
        if save.entries.is_empty() {
            return Ok(0);
        }

        let mut tx = self.begin().await?;
        let mut affected = 0;
        for entry in &save.entries {
            affected += upsert_config_value(&mut tx, &save.scope, &entry.path, &entry.value).await?;
        }
        tx.commit().await?;
        Ok(affected)
    }
}

#[derive(Debug, Clone)]
/// Remove one configuration value.
pub struct DeleteConfigValue {
    pub scope: ScopeDescriptor,
    pub path: String,
}

impl Processor<DeleteConfigValue> for DatabaseProcessor {
    type Output = u64;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:DeleteConfigValue")]
    async fn process(&self, delete: DeleteConfigValue) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(DELETE_CONFIG_VALUE)
            .bind(delete.scope.scope.as_str())
            .bind(i64::from(delete.scope.scope_id))
            .bind(&delete.path)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
