use anyhow::{Context, Result};
use gcloud_gax::grpc::{Code, Status};
use gcloud_googleapis::spanner::admin::database::v1::{
    CreateDatabaseRequest, GetDatabaseDdlRequest, GetDatabaseRequest, UpdateDatabaseDdlRequest,
};
use gcloud_googleapis::spanner::admin::instance::v1::{
    CreateInstanceRequest, GetInstanceRequest, Instance,
};
use gcloud_spanner::admin::AdminClientConfig;
use gcloud_spanner::admin::client::Client as AdminClient;

use crate::config::SpannerSettings;

/// Provision the Spanner instance, database and collection table
///
/// Lets a fresh emulator come up with zero manual setup.
pub(super) async fn auto_provision(settings: &SpannerSettings, table: &str) -> Result<()> {
    tracing::info!("Checking Spanner resources for collection '{}'", table);

    let provisioner = Provisioner::connect(settings).await?;
    provisioner.instance().await?;
    provisioner.database().await?;
    provisioner.collection_table(table).await?;

    tracing::info!("Spanner resources ready");
    Ok(())
}

/// Outcome of a lookup: `true` when the resource is there, `false` on NOT_FOUND
fn found<T>(lookup: std::result::Result<T, Status>, kind: &str, path: &str) -> Result<bool> {
    match lookup {
        Ok(_) => {
            tracing::info!("{} present: {}", kind, path);
            Ok(true)
        }
        Err(status) if status.code() == Code::NotFound => {
            tracing::info!("{} missing, creating: {}", kind, path);
            Ok(false)
        }
        Err(status) => Err(anyhow::anyhow!(
            "Failed to check {} {}: {}",
            kind.to_lowercase(),
            path,
            status.message()
        )),
    }
}

struct Provisioner<'a> {
    admin: AdminClient,
    settings: &'a SpannerSettings,
    project_path: String,
    instance_path: String,
    database_path: String,
}

impl<'a> Provisioner<'a> {
    async fn connect(settings: &'a SpannerSettings) -> Result<Self> {
        let admin = AdminClient::new(AdminClientConfig::default())
            .await
            .context("Failed to create Spanner admin client")?;

        let project_path = format!("projects/{}", settings.project);
        let instance_path = format!("{}/instances/{}", project_path, settings.instance);
        let database_path = format!("{}/databases/{}", instance_path, settings.database);

        Ok(Self {
            admin,
            settings,
            project_path,
            instance_path,
            database_path,
        })
    }

    fn instance_config(&self) -> String {
        let config = if self.settings.emulator_host.is_some() {
            "emulator-config"
        } else {
            "regional-us-central1"
        };
        format!("{}/instanceConfigs/{}", self.project_path, config)
    }

    async fn instance(&self) -> Result<()> {
        let lookup = self
            .admin
            .instance()
            .get_instance(
                GetInstanceRequest {
                    name: self.instance_path.clone(),
                    field_mask: None,
                },
                None,
            )
            .await;
        if found(lookup, "Instance", &self.instance_path)? {
            return Ok(());
        }

        let request = CreateInstanceRequest {
            parent: self.project_path.clone(),
            instance_id: self.settings.instance.clone(),
            instance: Some(Instance {
                name: self.instance_path.clone(),
                config: self.instance_config(),
                display_name: format!("{} instance", self.settings.instance),
                node_count: 1,
                ..Default::default()
            }),
        };

        self.admin
            .instance()
            .create_instance(request, None)
            .await
            .context("Failed to start instance creation")?
            .wait(None)
            .await
            .context("Failed to create instance")?;
        Ok(())
    }

    async fn database(&self) -> Result<()> {
        let lookup = self
            .admin
            .database()
            .get_database(
                GetDatabaseRequest {
                    name: self.database_path.clone(),
                },
                None,
            )
            .await;
        if found(lookup, "Database", &self.database_path)? {
            return Ok(());
        }

        let request = CreateDatabaseRequest {
            parent: self.instance_path.clone(),
            create_statement: format!("CREATE DATABASE `{}`", self.settings.database),
            extra_statements: vec![],
            encryption_config: None,
            // GoogleStandardSql
            database_dialect: 1,
            proto_descriptors: vec![],
        };

        self.admin
            .database()
            .create_database(request, None)
            .await
            .context("Failed to start database creation")?
            .wait(None)
            .await
            .context("Failed to create database")?;
        Ok(())
    }

    async fn collection_table(&self, table: &str) -> Result<()> {
        let ddl = self
            .admin
            .database()
            .get_database_ddl(
                GetDatabaseDdlRequest {
                    database: self.database_path.clone(),
                },
                None,
            )
            .await
            .context("Failed to get database DDL")?
            .into_inner();

        if ddl_declares_table(&ddl.statements, table) {
            tracing::info!("Table present: {}", table);
            return Ok(());
        }
        tracing::info!("Table missing, creating: {}", table);

        let request = UpdateDatabaseDdlRequest {
            database: self.database_path.clone(),
            statements: vec![create_table_ddl(table)],
            operation_id: String::new(),
            proto_descriptors: vec![],
            throughput_mode: false,
        };

        self.admin
            .database()
            .update_database_ddl(request, None)
            .await
            .context("Failed to start table creation")?
            .wait(None)
            .await
            .context("Failed to create table")?;
        Ok(())
    }
}

fn create_table_ddl(table: &str) -> String {
    format!(
        r#"
CREATE TABLE {table} (
    id STRING(64) NOT NULL,
    data JSON NOT NULL,
    created_at TIMESTAMP NOT NULL OPTIONS (allow_commit_timestamp=true),
    updated_at TIMESTAMP NOT NULL OPTIONS (allow_commit_timestamp=true),
) PRIMARY KEY (id)
"#
    )
    .trim()
    .to_string()
}

fn ddl_declares_table(statements: &[String], table: &str) -> bool {
    let plain = format!("CREATE TABLE {} ", table);
    let quoted = format!("CREATE TABLE `{}`", table);
    statements
        .iter()
        .any(|stmt| stmt.starts_with(&plain) || stmt.starts_with(&quoted))
}
