use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use gcloud_gax::grpc::{Code, Status as GrpcStatus};
use gcloud_googleapis::spanner::admin::database::v1::{
    CreateDatabaseRequest, GetDatabaseDdlRequest, GetDatabaseRequest, UpdateDatabaseDdlRequest,
};
use gcloud_googleapis::spanner::admin::instance::v1::{
    CreateInstanceRequest, GetInstanceRequest, Instance,
};
use gcloud_spanner::admin::client::Client as AdminClient;
use gcloud_spanner::admin::AdminClientConfig;
use gcloud_spanner::client::{self, Client, ClientConfig};
use gcloud_spanner::key::Key;
use gcloud_spanner::mutation::{delete, replace, update};
use gcloud_spanner::row::Row;
use gcloud_spanner::statement::{Statement, ToKind};
use std::sync::Arc;

use crate::config::SpannerConfig;
use crate::post::{format_timestamp, parse_timestamp, Post, PostPatch, Status};
use crate::store::PostTable;

/// Shareable Spanner client for use across async handlers
#[derive(Clone)]
pub struct SpannerClient {
    inner: Arc<Client>,
    table: Arc<str>,
}

impl SpannerClient {
    /// Create a new Spanner client from configuration
    ///
    /// The gcloud-spanner library automatically detects the
    /// SPANNER_EMULATOR_HOST environment variable and connects to
    /// the emulator when set, or production Spanner otherwise.
    ///
    /// This function also performs auto-provisioning: it will automatically
    /// create the instance, database, and post table if they don't exist.
    pub async fn from_config(config: &SpannerConfig) -> Result<Self> {
        auto_provision(config).await?;

        let database_path = config.database_path();

        match &config.emulator_host {
            Some(host) => tracing::info!("Connecting to Spanner emulator at: {}", host),
            None => tracing::info!("Connecting to production Spanner"),
        }

        // ClientConfig::default() automatically uses SPANNER_EMULATOR_HOST if set
        let client = Client::new(&database_path, ClientConfig::default())
            .await
            .context("Failed to create Spanner client")?;

        tracing::info!(
            "Successfully connected to Spanner database: {}",
            database_path
        );

        Ok(Self {
            inner: Arc::new(client),
            table: Arc::from(config.post_table.as_str()),
        })
    }

    fn select_by_id(&self) -> Statement {
        Statement::new(format!(
            "SELECT id, title, content, status, created_at, updated_at FROM {} WHERE id = @id",
            self.table
        ))
    }
}

#[async_trait]
impl PostTable for SpannerClient {
    /// Replace the whole row; columns not listed (`updated_at`) are reset to NULL
    async fn put(&self, post: &Post) -> Result<()> {
        let status = post.status.as_str().to_string();
        let created_at = format_timestamp(&post.created_at);

        let mutation = replace(
            &self.table,
            &["id", "title", "content", "status", "created_at"],
            &[&post.id, &post.title, &post.content, &status, &created_at],
        );

        self.inner
            .apply(vec![mutation])
            .await
            .context("Failed to write post to Spanner")?;

        tracing::debug!("Wrote post with id: {}", post.id);
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Option<Post>> {
        let mut statement = self.select_by_id();
        statement.add_param("id", &id.to_string());

        let mut tx = self.inner
            .single()
            .await
            .context("Failed to create read transaction")?;

        let mut result_set = tx
            .query(statement)
            .await
            .context("Failed to query post from Spanner")?;

        if let Some(row) = result_set.next().await? {
            let post = post_from_row(&row)?;
            tracing::debug!("Read post with id: {}", id);
            Ok(Some(post))
        } else {
            tracing::debug!("Post not found with id: {}", id);
            Ok(None)
        }
    }

    /// `update` mutations only touch existing rows; the missing-row commit
    /// error is reported as `None`, every other failure propagates
    async fn merge(
        &self,
        id: &str,
        patch: &PostPatch,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<Post>> {
        let id = id.to_string();
        let status = patch.status.map(|s| s.as_str().to_string());
        let updated_at = format_timestamp(&updated_at);

        // The column/value lists must not live across an await
        let mutation = {
            let mut columns: Vec<&str> = vec!["id"];
            let mut values: Vec<&dyn ToKind> = vec![&id];
            if let Some(title) = &patch.title {
                columns.push("title");
                values.push(title);
            }
            if let Some(content) = &patch.content {
                columns.push("content");
                values.push(content);
            }
            if let Some(status) = &status {
                columns.push("status");
                values.push(status);
            }
            columns.push("updated_at");
            values.push(&updated_at);

            update(&self.table, columns.as_slice(), values.as_slice())
        };

        match self.inner.apply(vec![mutation]).await {
            Ok(_) => {}
            Err(client::Error::GRPC(status)) if is_missing_row(&status) => {
                tracing::debug!("Merge skipped, post not found with id: {}", id);
                return Ok(None);
            }
            Err(e) => return Err(e).context("Failed to merge post into Spanner"),
        }

        tracing::debug!("Merged post with id: {}", id);

        // A concurrent delete between the two calls also surfaces as None
        self.get(&id).await
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let mutation = delete(&self.table, Key::new(&id.to_string()));

        self.inner
            .apply(vec![mutation])
            .await
            .context("Failed to delete post from Spanner")?;

        tracing::debug!("Deleted post with id: {}", id);
        Ok(())
    }

    /// Perform a health check by executing a simple query
    ///
    /// This method performs a lightweight query (SELECT 1) to verify
    /// that the database connection is alive and responsive.
    async fn ping(&self) -> Result<()> {
        let statement = Statement::new("SELECT 1");

        let mut tx = self.inner
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

/// Spanner also answers NOT_FOUND for expired sessions and missing
/// databases or tables; only the missing-row commit error means "no post"
fn is_missing_row(status: &GrpcStatus) -> bool {
    let message = status.message();
    status.code() == Code::NotFound && message.contains("Row ") && message.contains(" is missing")
}

fn post_from_row(row: &Row) -> Result<Post> {
    let id: String = row.column_by_name("id")?;
    let title: String = row.column_by_name("title")?;
    let content: String = row.column_by_name("content")?;
    let status: String = row.column_by_name("status")?;
    let created_at: String = row.column_by_name("created_at")?;
    let updated_at: Option<String> = row.column_by_name("updated_at")?;

    let status = status
        .parse::<Status>()
        .with_context(|| format!("Invalid status stored for post {}", id))?;
    let created_at = parse_timestamp(&created_at)
        .context("Failed to parse created_at timestamp")?;
    let updated_at = updated_at
        .as_deref()
        .map(parse_timestamp)
        .transpose()
        .context("Failed to parse updated_at timestamp")?;

    Ok(Post {
        id,
        title,
        content,
        status,
        created_at,
        updated_at,
    })
}

fn create_table_ddl(table: &str) -> String {
    format!(
        r#"
CREATE TABLE {table} (
    id STRING(MAX) NOT NULL,
    title STRING(MAX) NOT NULL,
    content STRING(MAX) NOT NULL,
    status STRING(32) NOT NULL,
    created_at STRING(32) NOT NULL,
    updated_at STRING(32),
) PRIMARY KEY (id)
"#
    )
    .trim()
    .to_string()
}

/// Automatically provision Spanner instance, database, and post table
///
/// This function checks if the configured resources exist and creates them if needed.
/// It's designed to enable zero-setup local development with the emulator.
async fn auto_provision(config: &SpannerConfig) -> Result<()> {
    tracing::info!("Starting auto-provisioning checks...");

    let admin_client = AdminClient::new(AdminClientConfig::default())
        .await
        .context("Failed to create Spanner admin client")?;

    let project_path = format!("projects/{}", config.project);
    let instance_path = format!("{}/instances/{}", project_path, config.instance);
    let database_path = config.database_path();

    let lookup = admin_client
        .instance()
        .get_instance(
            GetInstanceRequest {
                name: instance_path.clone(),
                field_mask: None,
            },
            None,
        )
        .await;
    if !resource_exists("Instance", &instance_path, lookup)? {
        let request = CreateInstanceRequest {
            parent: project_path.clone(),
            instance_id: config.instance.clone(),
            instance: Some(Instance {
                name: instance_path.clone(),
                config: instance_config_path(config, &project_path),
                display_name: format!("{} instance", config.instance),
                node_count: 1,
                ..Default::default()
            }),
        };
        admin_client
            .instance()
            .create_instance(request, None)
            .await
            .context("Failed to start instance creation")?
            .wait(None)
            .await
            .context("Failed to create instance")?;
        tracing::info!("Instance created: {}", instance_path);
    }

    let lookup = admin_client
        .database()
        .get_database(
            GetDatabaseRequest {
                name: database_path.clone(),
            },
            None,
        )
        .await;
    if !resource_exists("Database", &database_path, lookup)? {
        let request = CreateDatabaseRequest {
            parent: instance_path.clone(),
            create_statement: format!("CREATE DATABASE `{}`", config.database),
            extra_statements: vec![],
            encryption_config: None,
            database_dialect: 1, // Google Standard SQL
            proto_descriptors: vec![],
        };
        admin_client
            .database()
            .create_database(request, None)
            .await
            .context("Failed to start database creation")?
            .wait(None)
            .await
            .context("Failed to create database")?;
        tracing::info!("Database created: {}", database_path);
    }

    ensure_table_exists(&admin_client, &database_path, &config.post_table).await?;

    tracing::info!("Auto-provisioning complete");
    Ok(())
}

/// `Ok(true)` when the admin lookup found the resource, `Ok(false)` when
/// Spanner reports it missing
fn resource_exists<T>(
    kind: &str,
    path: &str,
    lookup: std::result::Result<T, GrpcStatus>,
) -> Result<bool> {
    match lookup {
        Ok(_) => {
            tracing::info!("{} already exists: {}", kind, path);
            Ok(true)
        }
        Err(status) if status.code() == Code::NotFound => {
            tracing::info!("{} not found, creating: {}", kind, path);
            Ok(false)
        }
        Err(e) => Err(anyhow::anyhow!(
            "Failed to check {} existence: {}",
            kind.to_lowercase(),
            e.message()
        )),
    }
}

fn instance_config_path(config: &SpannerConfig, project_path: &str) -> String {
    if config.emulator_host.is_some() {
        format!("{}/instanceConfigs/emulator-config", project_path)
    } else {
        format!("{}/instanceConfigs/regional-us-central1", project_path)
    }
}

/// Ensure the post table exists, creating it if necessary
async fn ensure_table_exists(
    admin_client: &AdminClient,
    database_path: &str,
    table: &str,
) -> Result<()> {
    let get_ddl_request = GetDatabaseDdlRequest {
        database: database_path.to_string(),
    };

    let ddl_response = admin_client
        .database()
        .get_database_ddl(get_ddl_request, None)
        .await
        .context("Failed to get database DDL")?;

    let plain = format!("CREATE TABLE {} (", table);
    let quoted = format!("CREATE TABLE `{}` (", table);
    let table_exists = ddl_response
        .into_inner()
        .statements
        .iter()
        .any(|stmt| stmt.contains(&plain) || stmt.contains(&quoted));

    if table_exists {
        tracing::info!("Table '{}' already exists", table);
        return Ok(());
    }

    tracing::info!("Table '{}' not found, creating...", table);

    let update_request = UpdateDatabaseDdlRequest {
        database: database_path.to_string(),
        statements: vec![create_table_ddl(table)],
        operation_id: String::new(),
        proto_descriptors: vec![],
        throughput_mode: false,
    };

    let mut operation = admin_client
        .database()
        .update_database_ddl(update_request, None)
        .await
        .context("Failed to start table creation")?;

    operation
        .wait(None)
        .await
        .context("Failed to create table")?;

    tracing::info!("Table '{}' created successfully", table);
    Ok(())
}
