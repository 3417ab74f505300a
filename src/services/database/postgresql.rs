// PostgreSQL driver: one short-lived connection per executed statement
use crate::config::DatabaseConfig;
use crate::models::{ResultSet, Row};
use crate::services::database::adapter::{Database, DbError, Session};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::{json, Value};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use tokio::task::JoinHandle;
use tokio_postgres::types::Type;
use tokio_postgres::{Client, NoTls};

pub struct PostgresDatabase {
    config: DatabaseConfig,
}

impl PostgresDatabase {
    pub fn new(config: DatabaseConfig) -> Self {
        Self { config }
    }

    /// Build driver parameters. Missing values are left unset so the driver
    /// reports them when connecting.
    fn connection_config(&self) -> Result<tokio_postgres::Config, DbError> {
        let mut cfg = tokio_postgres::Config::new();
        if let Some(name) = &self.config.name {
            cfg.dbname(name);
        }
        if let Some(user) = &self.config.user {
            cfg.user(user);
        }
        if let Some(password) = &self.config.password {
            cfg.password(password);
        }
        if let Some(host) = &self.config.host {
            cfg.host(host);
        }
        if let Some(port) = &self.config.port {
            let port = port
                .trim()
                .parse::<u16>()
                .map_err(|e| DbError::Connect(format!("invalid port {:?}: {}", port, e)))?;
            cfg.port(port);
        }
        Ok(cfg)
    }
}

#[async_trait::async_trait]
impl Database for PostgresDatabase {
    async fn connect(&self) -> Result<Box<dyn Session>, DbError> {
        let cfg = self.connection_config()?;
        let (client, connection) = cfg
            .connect(NoTls)
            .await
            .map_err(|e| DbError::Connect(e.to_string()))?;

        let driver = tokio::spawn(async move {
            if let Err(e) = connection.await {
                tracing::warn!("PostgreSQL connection closed with error: {}", e);
            }
        });

        tracing::debug!("Opened PostgreSQL connection");
        Ok(Box::new(PostgresSession { client, driver }))
    }
}

struct PostgresSession {
    client: Client,
    driver: JoinHandle<()>,
}

#[async_trait::async_trait]
impl Session for PostgresSession {
    async fn fetch_all(&mut self, sql: &str) -> Result<ResultSet, DbError> {
        let rows = self.client.query(sql, &[]).await.map_err(|e| {
            let details = match e.as_db_error() {
                Some(db_error) => format!(
                    "Code: {}, Message: {}",
                    db_error.code().code(),
                    db_error.message()
                ),
                None => e.to_string(),
            };
            DbError::Query(details)
        })?;

        rows.iter().map(convert_row).collect()
    }

    async fn close(self: Box<Self>) {
        let PostgresSession { client, driver } = *self;
        // Dropping the client terminates the session; the driver task then ends
        drop(client);
        if let Err(e) = driver.await {
            tracing::warn!("PostgreSQL connection task failed: {}", e);
        }
        tracing::debug!("Closed PostgreSQL connection");
    }
}

fn convert_row(row: &tokio_postgres::Row) -> Result<Row, DbError> {
    (0..row.columns().len())
        .map(|idx| convert_cell(row, idx))
        .collect()
}

fn convert_cell(row: &tokio_postgres::Row, idx: usize) -> Result<Value, DbError> {
    let ty = row.columns()[idx].type_().clone();
    let decode_err = |e: tokio_postgres::Error| {
        DbError::Decode(format!("column {} ({}): {}", row.columns()[idx].name(), ty, e))
    };
    // Types with no usable decoding are shown by name
    let placeholder = || Some(json!(format!("<{}>", ty.name())));

    let value = match ty {
        Type::BOOL => row.try_get::<_, Option<bool>>(idx).map_err(decode_err)?.map(Value::from),
        Type::INT2 => row.try_get::<_, Option<i16>>(idx).map_err(decode_err)?.map(Value::from),
        Type::INT4 => row.try_get::<_, Option<i32>>(idx).map_err(decode_err)?.map(Value::from),
        Type::INT8 => row.try_get::<_, Option<i64>>(idx).map_err(decode_err)?.map(Value::from),
        Type::FLOAT4 => row
            .try_get::<_, Option<f32>>(idx)
            .map_err(decode_err)?
            // Through text so 0.1f32 stays 0.1 instead of 0.10000000149011612
            .map(|v| float_value(v.to_string().parse::<f64>().unwrap_or(f64::from(v)))),
        Type::FLOAT8 => row.try_get::<_, Option<f64>>(idx).map_err(decode_err)?.map(float_value),
        // NaN, infinities and values beyond 28 digits do not fit a Decimal
        Type::NUMERIC => match row.try_get::<_, Option<Decimal>>(idx) {
            Ok(v) => v.map(decimal_value),
            Err(_) => placeholder(),
        },
        Type::DATE => row
            .try_get::<_, Option<NaiveDate>>(idx)
            .map_err(decode_err)?
            .map(|d| json!(d.to_string())),
        Type::TIMESTAMP => row
            .try_get::<_, Option<NaiveDateTime>>(idx)
            .map_err(decode_err)?
            .map(|d| json!(d.to_string())),
        Type::TIMESTAMPTZ => row
            .try_get::<_, Option<DateTime<Utc>>>(idx)
            .map_err(decode_err)?
            .map(|d| json!(d.to_rfc3339())),
        Type::JSON | Type::JSONB => row.try_get::<_, Option<Value>>(idx).map_err(decode_err)?,
        _ => match row.try_get::<_, Option<String>>(idx) {
            Ok(v) => v.map(Value::from),
            Err(_) => placeholder(),
        },
    };

    Ok(value.unwrap_or(Value::Null))
}

fn float_value(v: f64) -> Value {
    serde_json::Number::from_f64(v)
        .map(Value::Number)
        .unwrap_or_else(|| json!(v.to_string()))
}

/// Whole numbers (`count`, `sum` over int8) stay integers; anything with a
/// scale becomes a float.
fn decimal_value(d: Decimal) -> Value {
    if d.scale() == 0 {
        if let Some(v) = d.to_i64() {
            return json!(v);
        }
    }
    match d.to_string().parse::<f64>() {
        Ok(v) => float_value(v),
        Err(_) => json!(d.to_string()),
    }
}
