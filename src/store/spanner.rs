use anyhow::{Context, Result};
use async_trait::async_trait;
use gcloud_gax::grpc::Status;
use gcloud_gax::retry::TryAs;
use gcloud_spanner::client::{Client, ClientConfig};
use gcloud_spanner::key::Key;
use gcloud_spanner::mutation::{delete, insert_or_update, update};
use gcloud_spanner::session::SessionError;
use gcloud_spanner::statement::Statement;
use gcloud_spanner::value::CommitTimestamp;

use super::provision::auto_provision;
use super::{Document, DocumentStore, generate_document_id};
use crate::config::SpannerSettings;
use crate::models::{TodoFields, merge_fields};

/// Failure raised inside a read-write transaction closure
#[derive(Debug, thiserror::Error)]
enum TxError {
    #[error(transparent)]
    Grpc(#[from] Status),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Row(#[from] gcloud_spanner::row::Error),
    #[error("Failed to (de)serialize JSON data: {0}")]
    Json(#[from] serde_json::Error),
}

impl TryAs<Status> for TxError {
    fn try_as(&self) -> Option<&Status> {
        match self {
            TxError::Grpc(status) => Some(status),
            _ => None,
        }
    }
}

/// Todo collection stored as JSON documents in a Cloud Spanner table
///
/// Each row holds one document: its key, the JSON body and commit
/// timestamps for creation and last write.
pub struct SpannerStore {
    inner: Client,
    table: String,
}

impl SpannerStore {
    /// Connect to Spanner and make sure the collection table exists
    ///
    /// The gcloud-spanner library picks up SPANNER_EMULATOR_HOST on its own
    /// and connects to the emulator when it is set. Instance, database and
    /// table are created if they are missing.
    pub async fn from_config(settings: &SpannerSettings, table: &str) -> Result<Self> {
        auto_provision(settings, table).await?;

        let database_path = format!(
            "projects/{}/instances/{}/databases/{}",
            settings.project, settings.instance, settings.database
        );

        match &settings.emulator_host {
            Some(host) => tracing::info!("Connecting to Spanner emulator at: {}", host),
            None => tracing::info!("Connecting to production Spanner"),
        }

        let client = Client::new(&database_path, ClientConfig::default())
            .await
            .context("Failed to create Spanner client")?;

        tracing::info!(
            "Successfully connected to Spanner database: {} (table: {})",
            database_path,
            table
        );

        Ok(Self {
            inner: client,
            table: table.to_string(),
        })
    }

    /// Release the session pool. Call once the server has stopped.
    pub async fn close(self) {
        self.inner.close().await;
        tracing::info!("Spanner client closed");
    }

    async fn write_row(&self, id: &str, data: &TodoFields) -> Result<()> {
        let id = id.to_string();
        let data_str = serde_json::to_string(data).context("Failed to serialize JSON data")?;

        let mutation = insert_or_update(
            &self.table,
            &["id", "data", "created_at", "updated_at"],
            &[&id, &data_str, &CommitTimestamp::new(), &CommitTimestamp::new()],
        );

        self.inner
            .apply(vec![mutation])
            .await
            .context("Failed to write document to Spanner")?;
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for SpannerStore {
    fn new_document_id(&self) -> String {
        generate_document_id()
    }

    async fn get(&self, id: &str) -> Result<Option<TodoFields>> {
        let mut statement = Statement::new(format!("SELECT data FROM {} WHERE id = @id", self.table));
        statement.add_param("id", &id.to_string());

        let mut tx = self
            .inner
            .single()
            .await
            .context("Failed to create read transaction")?;

        let mut result_set = tx
            .query(statement)
            .await
            .context("Failed to query document from Spanner")?;

        if let Some(row) = result_set.next().await? {
            let data_str: String = row.column_by_name("data")?;
            let data: TodoFields =
                serde_json::from_str(&data_str).context("Failed to deserialize JSON data")?;

            tracing::debug!("Read document with id: {}", id);
            Ok(Some(data))
        } else {
            tracing::debug!("Document not found with id: {}", id);
            Ok(None)
        }
    }

    async fn set(&self, id: &str, data: &TodoFields) -> Result<()> {
        self.write_row(id, data).await?;
        tracing::debug!("Set document with id: {}", id);
        Ok(())
    }

    /// Read, merge and write back inside one read-write transaction
    ///
    /// Spanner aborts and the client retries the closure when another
    /// transaction touches the same row, so concurrent merges never drop
    /// each other's keys.
    async fn update(&self, id: &str, partial: &TodoFields) -> Result<bool> {
        let table = self.table.clone();
        let id = id.to_string();
        let partial = partial.clone();

        let result: std::result::Result<(_, bool), TxError> = self
            .inner
            .read_write_transaction(|tx| {
                let table = table.clone();
                let id = id.clone();
                let partial = partial.clone();
                Box::pin(async move {
                    let key = Key::new(&id);
                    let mut reader = tx.read(&table, &["data"], key).await?;
                    let Some(row) = reader.next().await? else {
                        return Ok(false);
                    };

                    let data_str: String = row.column_by_name("data")?;
                    let mut data: TodoFields = serde_json::from_str(&data_str)?;
                    merge_fields(&mut data, &partial);
                    let data_str = serde_json::to_string(&data)?;

                    tx.buffer_write(vec![update(
                        &table,
                        &["id", "data", "updated_at"],
                        &[&id, &data_str, &CommitTimestamp::new()],
                    )]);
                    Ok(true)
                })
            })
            .await;

        let (_, applied) = result.context("Failed to update document in Spanner")?;

        if applied {
            tracing::debug!("Updated document with id: {}", id);
        } else {
            tracing::debug!("Document not found for update with id: {}", id);
        }
        Ok(applied)
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let mutation = delete(&self.table, Key::new(&id.to_string()));

        self.inner
            .apply(vec![mutation])
            .await
            .context("Failed to delete document from Spanner")?;

        tracing::debug!("Deleted document with id: {}", id);
        Ok(())
    }

    async fn stream_all(&self) -> Result<Vec<Document>> {
        let statement = Statement::new(format!(
            "SELECT id, data FROM {} ORDER BY created_at ASC",
            self.table
        ));

        let mut tx = self
            .inner
            .single()
            .await
            .context("Failed to create read transaction")?;

        let mut result_set = tx
            .query(statement)
            .await
            .context("Failed to query documents from Spanner")?;

        let mut documents = Vec::new();
        while let Some(row) = result_set.next().await? {
            let id: String = row.column_by_name("id")?;
            let data_str: String = row.column_by_name("data")?;
            let fields: TodoFields = serde_json::from_str(&data_str)
                .with_context(|| format!("Failed to deserialize JSON data of document {}", id))?;

            documents.push(Document { id, fields });
        }

        tracing::debug!("Streamed {} documents from {}", documents.len(), self.table);
        Ok(documents)
    }

    /// Executes `SELECT 1` to verify the connection is alive
    async fn health_check(&self) -> Result<()> {
        let statement = Statement::new("SELECT 1");

        let mut tx = self
            .inner
            .single()
            .await
            .context("Failed to create health check transaction")?;

        let mut result_set = tx
            .query(statement)
            .await
            .context("Failed to execute health check query")?;

        if result_set.next().await?.is_some() {
            tracing::debug!("Health check query succeeded");
            Ok(())
        } else {
            Err(anyhow::anyhow!("Health check query returned no results"))
        }
    }
}
