use tokio_postgres::Client;

/// Schema metadata for PostgreSQL tables.
///
/// All methods return `&'static str`; implementors splice table names into
/// their DDL at compile time with `const_format::concatcp!`.
///
/// The trait itself does no I/O. Table creation is driven through
/// [`ensure`].
pub trait Schema {
    /// Returns the table name in the database.
    fn name() -> &'static str;
    /// Returns `CREATE TABLE IF NOT EXISTS` DDL statement.
    fn creates() -> &'static str;
    /// Returns `CREATE INDEX IF NOT EXISTS` statements for all indices.
    fn indices() -> &'static str;
    /// Returns PostgreSQL column types, in declaration order.
    fn columns() -> &'static [tokio_postgres::types::Type];
}

/// Creates the table and indices for `T` if they do not already exist.
///
/// Idempotent; called once per entity at server boot. Creation order
/// matters across entities because of foreign keys.
pub async fn ensure<T>(client: &Client) -> Result<(), crate::PgErr>
where
    T: Schema,
{
    log::info!("ensuring table ({})", T::name());
    client.batch_execute(T::creates()).await?;
    client.batch_execute(T::indices()).await
}
