//! `PostgreSQL` repository implementation for task lifecycle storage.

use super::{
    models::{NewTaskRow, TaskLifecycleChangeset, TaskRow},
    schema::tasks,
};
use crate::order::domain::OrderId;
use crate::task::{
    domain::{Assignee, PersistedTaskData, Task, TaskDetails, TaskId, TaskState},
    ports::{TaskFilter, TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL` connection pool type used by task adapters.
pub type TaskPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed task repository.
#[derive(Debug, Clone)]
pub struct PostgresTaskRepository {
    pool: TaskPgPool,
}

impl PostgresTaskRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: TaskPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> TaskRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> TaskRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(TaskRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(TaskRepositoryError::persistence)?
    }
}

#[async_trait]
impl TaskRepository for PostgresTaskRepository {
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()> {
        let task_id = task.id();
        let new_row = to_new_row(task)?;

        self.run_blocking(move |connection| {
            diesel::insert_into(tasks::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        TaskRepositoryError::DuplicateTask(task_id)
                    }
                    _ => TaskRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn update(&self, task: &Task, expected_revision: u64) -> TaskRepositoryResult<()> {
        let task_id = task.id();
        let changeset = to_changeset(task)?;
        let expected = to_db_int(expected_revision)?;

        self.run_blocking(move |connection| {
            // The revision predicate makes this a single compare-and-swap.
            let updated_count = diesel::update(
                tasks::table
                    .filter(tasks::id.eq(task_id.into_inner()))
                    .filter(tasks::revision.eq(expected)),
            )
            .set(&changeset)
            .execute(connection)
            .map_err(TaskRepositoryError::persistence)?;

            if updated_count > 0 {
                return Ok(());
            }

            let exists = diesel::select(diesel::dsl::exists(
                tasks::table.filter(tasks::id.eq(task_id.into_inner())),
            ))
            .get_result::<bool>(connection)
            .map_err(TaskRepositoryError::persistence)?;
            if exists {
                Err(TaskRepositoryError::Conflict {
                    task_id,
                    expected_revision,
                })
            } else {
                Err(TaskRepositoryError::NotFound(task_id))
            }
        })
        .await
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        self.run_blocking(move |connection| {
            let row = tasks::table
                .filter(tasks::id.eq(id.into_inner()))
                .select(TaskRow::as_select())
                .first::<TaskRow>(connection)
                .optional()
                .map_err(TaskRepositoryError::persistence)?;
            row.map(row_to_task).transpose()
        })
        .await
    }

    async fn list(&self, filter: &TaskFilter) -> TaskRepositoryResult<Vec<Task>> {
        let assignee = filter.assignee().map(|value| value.as_str().to_owned());
        let state = filter.state().map(|value| value.as_str().to_owned());

        self.run_blocking(move |connection| {
            let mut query = tasks::table
                .select(TaskRow::as_select())
                .order((tasks::created_at.asc(), tasks::id.asc()))
                .into_boxed();
            if let Some(assignee_value) = assignee {
                query = query.filter(tasks::assignee.eq(assignee_value));
            }
            if let Some(state_value) = state {
                query = query.filter(tasks::state.eq(state_value));
            }
            let rows = query
                .load::<TaskRow>(connection)
                .map_err(TaskRepositoryError::persistence)?;
            rows.into_iter().map(row_to_task).collect()
        })
        .await
    }
}

fn to_db_int(value: u64) -> TaskRepositoryResult<i64> {
    i64::try_from(value).map_err(TaskRepositoryError::persistence)
}

fn from_db_int(value: i64) -> TaskRepositoryResult<u64> {
    u64::try_from(value).map_err(TaskRepositoryError::persistence)
}

fn to_new_row(task: &Task) -> TaskRepositoryResult<NewTaskRow> {
    let details = task.details();
    Ok(NewTaskRow {
        id: task.id().into_inner(),
        order_id: task.order_id().value(),
        title: details.title().to_owned(),
        description: details.description().map(str::to_owned),
        area: details.area().to_owned(),
        priority: details.priority().to_owned(),
        assignee: task.assignee().as_str().to_owned(),
        state: task.state().as_str().to_owned(),
        started_at: task.started_at(),
        accumulated_seconds: to_db_int(task.accumulated_seconds())?,
        revision: to_db_int(task.revision())?,
        created_at: task.created_at(),
        updated_at: task.updated_at(),
    })
}

fn to_changeset(task: &Task) -> TaskRepositoryResult<TaskLifecycleChangeset> {
    Ok(TaskLifecycleChangeset {
        state: task.state().as_str().to_owned(),
        started_at: task.started_at(),
        accumulated_seconds: to_db_int(task.accumulated_seconds())?,
        revision: to_db_int(task.revision())?,
        updated_at: task.updated_at(),
    })
}

fn row_to_task(row: TaskRow) -> TaskRepositoryResult<Task> {
    let TaskRow {
        id,
        order_id: raw_order_id,
        title,
        description,
        area,
        priority,
        assignee: raw_assignee,
        state: raw_state,
        started_at,
        accumulated_seconds,
        revision,
        created_at,
        updated_at,
    } = row;

    let order_id = OrderId::new(raw_order_id).map_err(TaskRepositoryError::persistence)?;
    let mut details =
        TaskDetails::new(title, area, priority).map_err(TaskRepositoryError::persistence)?;
    if let Some(text) = description {
        details = details.with_description(text);
    }
    let assignee = Assignee::new(raw_assignee).map_err(TaskRepositoryError::persistence)?;
    let state = TaskState::try_from(raw_state.as_str()).map_err(TaskRepositoryError::persistence)?;

    let data = PersistedTaskData {
        id: TaskId::from_uuid(id),
        order_id,
        details,
        assignee,
        state,
        started_at,
        accumulated_seconds: from_db_int(accumulated_seconds)?,
        revision: from_db_int(revision)?,
        created_at,
        updated_at,
    };
    Ok(Task::from_persisted(data))
}
