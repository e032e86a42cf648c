//! Filesystem reads that keep the cluster settings in sync with the server.

use super::BoxError;
use camino::Utf8Path;
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use postgresql_embedded::Settings;
use std::io::ErrorKind;

fn open_dir(path: &Utf8Path) -> Result<Dir, BoxError> {
    Ok(Dir::open_ambient_dir(path, ambient_authority())?)
}

fn read_optional(dir_path: &Utf8Path, file_name: &str) -> Result<Option<String>, BoxError> {
    match open_dir(dir_path)?.read_to_string(file_name) {
        Ok(contents) => Ok(Some(contents)),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
        Err(err) => Err(err.into()),
    }
}

/// Picks up the password the bootstrap generated, when it wrote one.
pub(super) fn sync_password_from_file(settings: &mut Settings) -> Result<(), BoxError> {
    let raw_path = settings.password_file.to_string_lossy().into_owned();
    let path = Utf8Path::new(&raw_path);
    let (Some(parent), Some(file_name)) = (path.parent(), path.file_name()) else {
        return Ok(());
    };
    if let Some(contents) = read_optional(parent, file_name)? {
        let password = contents.trim_end();
        if !password.is_empty() {
            password.clone_into(&mut settings.password);
        }
    }
    Ok(())
}

/// Reads the listening port from `postmaster.pid` (fourth line).
pub(super) fn sync_port_from_pid(settings: &mut Settings) -> Result<(), BoxError> {
    let raw_dir = settings.data_dir.to_string_lossy().into_owned();
    let Some(contents) = read_optional(Utf8Path::new(&raw_dir), "postmaster.pid")? else {
        return Ok(());
    };
    if let Some(port) = contents
        .lines()
        .nth(3)
        .and_then(|line| line.trim().parse::<u16>().ok())
    {
        settings.port = port;
    }
    Ok(())
}
