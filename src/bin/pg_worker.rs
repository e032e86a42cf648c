//! Runs embedded `PostgreSQL` lifecycle steps on behalf of a root test runner.
//!
//! ```text
//! pg_worker <setup|start|stop> <payload.json>
//! ```
//!
//! `PostgreSQL` refuses to run as root, so when the integration tests run
//! privileged the cluster bootstrap delegates each step to this binary. The
//! worker reads the JSON [`WorkerPayload`] written by the bootstrap, drops to
//! the `nobody` account, applies the payload environment and drives
//! `postgresql_embedded` for the requested step. After `start` the server is
//! left running for the tests.

#[cfg(unix)]
use camino::{Utf8Path, Utf8PathBuf};
#[cfg(unix)]
use nix::unistd::{Uid, User, initgroups, setgid, setuid};
#[cfg(unix)]
use pg_embedded_setup_unpriv::ambient_dir_and_path;
#[cfg(unix)]
use pg_embedded_setup_unpriv::worker::{PlainSecret, WorkerPayload};
#[cfg(unix)]
use postgresql_embedded::{PostgreSQL, Status};
#[cfg(unix)]
use std::ffi::CString;
#[cfg(unix)]
use std::io::Read;
#[cfg(unix)]
use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[cfg(unix)]
const UNPRIVILEGED_USER: &str = "nobody";

#[cfg(unix)]
#[derive(Debug, Error)]
enum WorkerError {
    #[error("usage: pg_worker <setup|start|stop> <payload.json>: {0}")]
    Usage(String),
    #[error("failed to read payload: {0}")]
    PayloadRead(#[source] BoxError),
    #[error("failed to parse payload: {0}")]
    PayloadParse(#[source] serde_json::Error),
    #[error("invalid postgres settings: {0}")]
    Settings(String),
    #[error("failed to switch to '{UNPRIVILEGED_USER}': {0}")]
    PrivilegeDrop(String),
    #[error("failed to build runtime: {0}")]
    Runtime(#[source] std::io::Error),
    #[error("postgres {step} failed: {message}")]
    Postgres {
        step: &'static str,
        message: String,
    },
}

#[cfg(unix)]
#[derive(Debug, Clone, Copy)]
enum Step {
    Setup,
    Start,
    Stop,
}

#[cfg(unix)]
impl Step {
    fn parse(value: &str) -> Result<Self, WorkerError> {
        match value {
            "setup" => Ok(Self::Setup),
            "start" => Ok(Self::Start),
            "stop" => Ok(Self::Stop),
            other => Err(WorkerError::Usage(format!("unknown step '{other}'"))),
        }
    }
}

#[cfg(unix)]
fn main() -> Result<(), BoxError> {
    let (step, payload_path) = parse_args(std::env::args())?;
    let payload = read_payload(&payload_path)?;
    drop_privileges()?;
    run_step(step, payload)?;
    Ok(())
}

#[cfg(not(unix))]
fn main() -> Result<(), BoxError> {
    Err("pg_worker only runs on Unix".into())
}

#[cfg(unix)]
fn parse_args(
    mut args: impl Iterator<Item = String>,
) -> Result<(Step, Utf8PathBuf), WorkerError> {
    let _program = args.next();
    let step = args
        .next()
        .ok_or_else(|| WorkerError::Usage("missing step".to_owned()))
        .and_then(|value| Step::parse(&value))?;
    let payload_path = args
        .next()
        .map(Utf8PathBuf::from)
        .ok_or_else(|| WorkerError::Usage("missing payload path".to_owned()))?;
    if let Some(extra) = args.next() {
        return Err(WorkerError::Usage(format!("unexpected argument '{extra}'")));
    }
    Ok((step, payload_path))
}

#[cfg(unix)]
fn read_payload(path: &Utf8Path) -> Result<WorkerPayload, WorkerError> {
    let bytes = read_file(path).map_err(WorkerError::PayloadRead)?;
    serde_json::from_slice(&bytes).map_err(WorkerError::PayloadParse)
}

#[cfg(unix)]
fn read_file(path: &Utf8Path) -> Result<Vec<u8>, BoxError> {
    let (dir, relative) = ambient_dir_and_path(path)?;
    let mut file = dir.open(relative.as_std_path())?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)?;
    Ok(bytes)
}

#[cfg(unix)]
fn drop_privileges() -> Result<(), WorkerError> {
    if !Uid::effective().is_root() {
        return Ok(());
    }
    let user = User::from_name(UNPRIVILEGED_USER)
        .map_err(|err| WorkerError::PrivilegeDrop(err.to_string()))?
        .ok_or_else(|| WorkerError::PrivilegeDrop("user does not exist".to_owned()))?;
    let name = CString::new(user.name.clone())
        .map_err(|err| WorkerError::PrivilegeDrop(err.to_string()))?;

    initgroups(&name, user.gid).map_err(|err| WorkerError::PrivilegeDrop(err.to_string()))?;
    setgid(user.gid).map_err(|err| WorkerError::PrivilegeDrop(err.to_string()))?;
    setuid(user.uid).map_err(|err| WorkerError::PrivilegeDrop(err.to_string()))?;
    std::env::set_current_dir("/").map_err(|err| WorkerError::PrivilegeDrop(err.to_string()))?;

    // SAFETY: the worker is single-threaded until the runtime is built.
    unsafe {
        std::env::set_var("HOME", &user.dir);
        std::env::set_var("USER", &user.name);
        std::env::set_var("LOGNAME", &user.name);
    }
    Ok(())
}

#[cfg(unix)]
fn apply_environment(environment: &[(String, Option<PlainSecret>)]) {
    for (key, value) in environment {
        // SAFETY: the worker is single-threaded until the runtime is built.
        unsafe {
            match value {
                Some(secret) => std::env::set_var(key, secret.expose()),
                None => std::env::remove_var(key),
            }
        }
    }
}

#[cfg(unix)]
fn run_step(step: Step, payload: WorkerPayload) -> Result<(), WorkerError> {
    let settings = payload
        .settings
        .into_settings()
        .map_err(|err| WorkerError::Settings(err.to_string()))?;
    apply_environment(&payload.environment);
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(WorkerError::Runtime)?;

    let mut postgres = PostgreSQL::new(settings);
    runtime.block_on(async move {
        match step {
            Step::Setup => {
                postgres
                    .setup()
                    .await
                    .map_err(|err| postgres_error("setup", &err))?;
                ensure_started(&mut postgres).await
            }
            Step::Start => {
                ensure_started(&mut postgres).await?;
                // Dropping the handle would stop the server.
                let _running = std::mem::ManuallyDrop::new(postgres);
                Ok(())
            }
            Step::Stop => postgres
                .stop()
                .await
                .map_err(|err| postgres_error("stop", &err)),
        }
    })
}

#[cfg(unix)]
async fn ensure_started(postgres: &mut PostgreSQL) -> Result<(), WorkerError> {
    if matches!(postgres.status(), Status::Started) {
        return Ok(());
    }
    postgres
        .start()
        .await
        .map_err(|err| postgres_error("start", &err))
}

#[cfg(unix)]
fn postgres_error(step: &'static str, err: &impl std::fmt::Display) -> WorkerError {
    WorkerError::Postgres {
        step,
        message: err.to_string(),
    }
}
