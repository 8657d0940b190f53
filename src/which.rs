//! Locate executables on the search path.
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    match path.metadata() {
        Ok(meta) => meta.is_file() && meta.permissions().mode() & 0o111 != 0,
        Err(_) => false,
    }
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

/// Find `program` on `PATH`.
///
/// A name containing a directory component is checked directly instead of
/// searched for. Returns `None` when nothing matches.
pub fn which(program: &str) -> Option<PathBuf> {
    let path_var = std::env::var_os("PATH").unwrap_or_default();
    which_in(program, &path_var)
}

/// Like [`which`], searching the given path list instead of `PATH`.
pub fn which_in(program: &str, path_var: &OsStr) -> Option<PathBuf> {
    let candidate = Path::new(program);
    let has_dir = candidate
        .parent()
        .is_some_and(|p| !p.as_os_str().is_empty());
    if has_dir {
        return is_executable(candidate).then(|| candidate.to_path_buf());
    }

    std::env::split_paths(path_var)
        .map(|dir| {
            let s = dir.to_string_lossy();
            PathBuf::from(s.trim_matches('"').to_string())
        })
        .map(|dir| dir.join(program))
        .find(|exe| is_executable(exe))
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::ffi::OsString;
    use std::fs;
    use std::os::unix::fs::PermissionsExt;

    fn make_file(dir: &Path, name: &str, mode: u32) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, "#!/bin/sh\n").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(mode)).unwrap();
        path
    }

    fn join(dirs: &[&Path]) -> OsString {
        std::env::join_paths(dirs).unwrap()
    }

    #[test]
    fn finds_first_match_in_order() {
        let a = tempfile::tempdir().unwrap();
        let b = tempfile::tempdir().unwrap();
        make_file(b.path(), "pitremove", 0o755);
        let second = make_file(a.path(), "aread8", 0o755);
        make_file(b.path(), "aread8", 0o755);

        let path_var = join(&[a.path(), b.path()]);
        assert_eq!(which_in("aread8", &path_var), Some(second));
        assert_eq!(
            which_in("pitremove", &path_var),
            Some(b.path().join("pitremove"))
        );
    }

    #[test]
    fn missing_program_is_none() {
        let a = tempfile::tempdir().unwrap();
        assert_eq!(which_in("no-such-tool", &join(&[a.path()])), None);
    }

    #[test]
    fn non_executable_files_are_skipped() {
        let a = tempfile::tempdir().unwrap();
        make_file(a.path(), "plain", 0o644);
        assert_eq!(which_in("plain", &join(&[a.path()])), None);
    }

    #[test]
    fn quoted_entries_are_unquoted() {
        let a = tempfile::tempdir().unwrap();
        let exe = make_file(a.path(), "gagewatershed", 0o755);
        let quoted = OsString::from(format!("\"{}\"", a.path().display()));
        assert_eq!(which_in("gagewatershed", &quoted), Some(exe));
    }

    #[test]
    fn direct_paths_skip_search() {
        let a = tempfile::tempdir().unwrap();
        let exe = make_file(a.path(), "d8flowdir", 0o755);
        let direct = exe.to_string_lossy().into_owned();

        assert_eq!(which_in(&direct, OsStr::new("")), Some(exe.clone()));
        let missing = a.path().join("missing").to_string_lossy().into_owned();
        assert_eq!(which_in(&missing, OsStr::new("")), None);
    }
}
