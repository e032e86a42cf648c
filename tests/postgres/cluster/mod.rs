//! Embedded `PostgreSQL` cluster shared by the integration tests.
//!
//! The cluster is started once per test binary. Each test gets its own
//! database cloned from a template that already carries the board schema.

mod fs_utils;

use self::env_utils::{EnvVarGuard, bootstrap_env_changes, env_vars_to_os};
use self::fs_utils::{sync_password_from_file, sync_port_from_pid};
use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use pg_embedded_setup_unpriv::worker_process_test_api::{
    WorkerOperation, WorkerRequest, WorkerRequestArgs, run as run_worker,
};
use pg_embedded_setup_unpriv::{ExecutionPrivileges, TestBootstrapSettings, bootstrap_for_tests};
use postgresql_embedded::{PostgreSQL, Status};
use rstest::fixture;
use std::sync::{Mutex, OnceLock};
use std::time::Duration;
use tokio::runtime::Runtime;
use uuid::Uuid;

/// Boxed error type used by the cluster fixtures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Shared cluster handle.
pub type PostgresCluster = &'static ManagedCluster;

const TEMPLATE_DB: &str = "carpenter_test_template";

static SHARED_CLUSTER: OnceLock<Result<ManagedCluster, String>> = OnceLock::new();
static TEMPLATE_LOCK: OnceLock<Mutex<bool>> = OnceLock::new();

/// Embedded `PostgreSQL` server started for the test run.
pub struct ManagedCluster {
    bootstrap: TestBootstrapSettings,
    env_vars: Vec<(String, Option<String>)>,
    runtime: Option<Runtime>,
    postgres: Option<PostgreSQL>,
}

impl ManagedCluster {
    fn start() -> Result<Self, BoxError> {
        let bootstrap_guard = EnvVarGuard::set_many(&bootstrap_env_changes()?);
        let mut bootstrap = bootstrap_for_tests()?;
        drop(bootstrap_guard);
        sync_password_from_file(&mut bootstrap.settings)?;

        let env_vars = bootstrap.environment.to_env();
        let mut cluster = Self {
            bootstrap,
            env_vars,
            runtime: None,
            postgres: None,
        };
        match cluster.bootstrap.privileges {
            ExecutionPrivileges::Root => cluster.start_via_worker()?,
            ExecutionPrivileges::Unprivileged => cluster.start_in_process()?,
        }
        sync_port_from_pid(&mut cluster.bootstrap.settings)?;
        Ok(cluster)
    }

    fn start_in_process(&mut self) -> Result<(), BoxError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        let env_guard = EnvVarGuard::set_many(&env_vars_to_os(&self.env_vars));
        let mut postgres = PostgreSQL::new(self.bootstrap.settings.clone());
        runtime.block_on(async {
            postgres.setup().await?;
            if !matches!(postgres.status(), Status::Started) {
                postgres.start().await?;
            }
            Ok::<(), postgresql_embedded::Error>(())
        })?;
        drop(env_guard);
        self.bootstrap.settings = postgres.settings().clone();
        self.runtime = Some(runtime);
        self.postgres = Some(postgres);
        Ok(())
    }

    fn start_via_worker(&self) -> Result<(), BoxError> {
        self.run_worker_step(WorkerOperation::Setup, self.bootstrap.setup_timeout)?;
        self.run_worker_step(WorkerOperation::Start, self.bootstrap.start_timeout)
    }

    fn run_worker_step(
        &self,
        operation: WorkerOperation,
        timeout: Duration,
    ) -> Result<(), BoxError> {
        let worker = self
            .bootstrap
            .worker_binary
            .as_ref()
            .ok_or("PG_EMBEDDED_WORKER is required when running as root")?;
        let args = WorkerRequestArgs {
            worker: worker.as_path(),
            settings: &self.bootstrap.settings,
            env_vars: &self.env_vars,
            operation,
            timeout,
        };
        run_worker(&WorkerRequest::new(args))?;
        Ok(())
    }

    /// Returns the connection URL for `database`.
    #[must_use]
    pub fn database_url(&self, database: &str) -> String {
        self.bootstrap.settings.url(database)
    }

    fn execute_admin_sql(&self, sql: &str) -> Result<(), BoxError> {
        let mut connection = PgConnection::establish(&self.database_url("postgres"))?;
        diesel::sql_query(sql).execute(&mut connection)?;
        Ok(())
    }

    /// Creates the schema template on first use.
    fn ensure_template(&self, schema_sql: &str) -> Result<(), BoxError> {
        let mut ready = TEMPLATE_LOCK
            .get_or_init(|| Mutex::new(false))
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        if *ready {
            return Ok(());
        }
        let template = quote_identifier(TEMPLATE_DB);
        self.execute_admin_sql(&format!("DROP DATABASE IF EXISTS {template}"))?;
        self.execute_admin_sql(&format!("CREATE DATABASE {template}"))?;
        let mut connection = PgConnection::establish(&self.database_url(TEMPLATE_DB))?;
        connection.batch_execute(schema_sql)?;
        *ready = true;
        Ok(())
    }

    /// Clones the schema template into a fresh database for one test.
    ///
    /// # Errors
    ///
    /// Returns an error when the template or the copy cannot be created.
    pub fn temporary_database(
        &'static self,
        schema_sql: &str,
    ) -> Result<TemporaryDatabase, BoxError> {
        self.ensure_template(schema_sql)?;
        let name = format!("test_{}", Uuid::new_v4().simple());
        self.execute_admin_sql(&format!(
            "CREATE DATABASE {} TEMPLATE {}",
            quote_identifier(&name),
            quote_identifier(TEMPLATE_DB),
        ))?;
        Ok(TemporaryDatabase {
            cluster: self,
            name,
        })
    }
}

impl Drop for ManagedCluster {
    fn drop(&mut self) {
        let stopped = match (self.runtime.as_ref(), self.postgres.take()) {
            (Some(runtime), Some(postgres)) => runtime
                .block_on(postgres.stop())
                .map_err(|err| err.to_string()),
            _ if matches!(self.bootstrap.privileges, ExecutionPrivileges::Root) => self
                .run_worker_step(WorkerOperation::Stop, self.bootstrap.shutdown_timeout)
                .map_err(|err| err.to_string()),
            _ => Ok(()),
        };
        if let Err(err) = stopped {
            tracing::warn!(error = %err, "failed to stop embedded PostgreSQL");
        }
    }
}

/// Database owned by a single test and dropped with it.
pub struct TemporaryDatabase {
    cluster: PostgresCluster,
    name: String,
}

impl TemporaryDatabase {
    /// Returns the connection URL of this database.
    #[must_use]
    pub fn url(&self) -> String {
        self.cluster.database_url(&self.name)
    }
}

impl Drop for TemporaryDatabase {
    fn drop(&mut self) {
        let sql = format!(
            "DROP DATABASE IF EXISTS {} WITH (FORCE)",
            quote_identifier(&self.name)
        );
        if let Err(err) = self.cluster.execute_admin_sql(&sql) {
            tracing::warn!(database = %self.name, error = %err, "failed to drop test database");
        }
    }
}

/// Starts (once) and returns the shared cluster.
///
/// Start-up runs on its own thread so that it never blocks inside the
/// test's async runtime.
#[fixture]
pub fn postgres_cluster() -> Result<PostgresCluster, BoxError> {
    let shared = SHARED_CLUSTER.get_or_init(|| {
        std::thread::spawn(|| ManagedCluster::start().map_err(|err| err.to_string()))
            .join()
            .unwrap_or_else(|_| Err("cluster start-up panicked".to_owned()))
    });
    shared
        .as_ref()
        .map_err(|err| format!("failed to start embedded PostgreSQL: {err}").into())
}

fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
