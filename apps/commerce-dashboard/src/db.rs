use sqlx::sqlite::{SqliteConnectOptions, SqliteRow};
use sqlx::{Connection, FromRow, SqliteConnection};
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    #[error("failed to open {path}: {source}")]
    Connect {
        path: PathBuf,
        #[source]
        source: sqlx::Error,
    },
    #[error(transparent)]
    Sql(#[from] sqlx::Error),
}

/// Positional parameter bound into a report query.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlParam {
    Int(i64),
    Text(String),
}

/// Handle to the read-only report store. Holds no open connection; every
/// query opens its own and closes it before returning.
#[derive(Debug, Clone)]
pub struct Database {
    path: PathBuf,
    options: SqliteConnectOptions,
}

impl Database {
    pub fn open_read_only(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let options = SqliteConnectOptions::new()
            .filename(&path)
            .read_only(true)
            .create_if_missing(false);
        Self { path, options }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn connect(&self) -> Result<SqliteConnection, QueryError> {
        SqliteConnection::connect_with(&self.options)
            .await
            .map_err(|source| QueryError::Connect {
                path: self.path.clone(),
                source,
            })
    }

    pub async fn fetch_all<T>(&self, sql: &str, params: &[SqlParam]) -> Result<Vec<T>, QueryError>
    where
        T: for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
    {
        let mut conn = self.connect().await?;
        let mut query = sqlx::query_as::<_, T>(sql);
        for param in params {
            query = match param {
                SqlParam::Int(value) => query.bind(*value),
                SqlParam::Text(value) => query.bind(value.clone()),
            };
        }
        let result = query.fetch_all(&mut conn).await;
        close_quietly(conn).await;
        Ok(result?)
    }

    pub async fn fetch_one<T>(&self, sql: &str) -> Result<T, QueryError>
    where
        T: for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
    {
        let mut conn = self.connect().await?;
        let result = sqlx::query_as::<_, T>(sql).fetch_one(&mut conn).await;
        close_quietly(conn).await;
        Ok(result?)
    }
}

async fn close_quietly(conn: SqliteConnection) {
    if let Err(err) = conn.close().await {
        tracing::warn!(error = %err, "failed to close database connection");
    }
}
