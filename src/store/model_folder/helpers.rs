// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Casemodel-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of casemodel and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

// Filesystem helpers shared by `ModelFolder` and the background writer.

fn validate_relative_path(field: &'static str, path: &Path) -> Result<(), StoreError> {
    if path.as_os_str().is_empty() || path.is_absolute() {
        return Err(StoreError::InvalidRelativePath {
            field,
            value: path.to_path_buf(),
        });
    }

    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir | Component::ParentDir => {
                return Err(StoreError::InvalidRelativePath {
                    field,
                    value: path.to_path_buf(),
                });
            }
            Component::CurDir | Component::Normal(_) => {}
        }
    }

    Ok(())
}

/// A model name becomes a file stem, so it must be exactly one plain path segment.
fn validate_model_name(name: &str) -> Result<(), StoreError> {
    let path = Path::new(name);
    validate_relative_path("model name", path)?;
    let single_segment = path.components().count() == 1
        && matches!(path.components().next(), Some(Component::Normal(_)));
    if !single_segment || name.trim() != name {
        return Err(StoreError::InvalidModelName {
            name: name.to_owned(),
        });
    }
    Ok(())
}

fn to_relative_path(root: &Path, path: &Path, field: &'static str) -> Result<PathBuf, StoreError> {
    let relative = if path.is_absolute() {
        path.strip_prefix(root)
            .map(PathBuf::from)
            .map_err(|_| StoreError::PathOutsideFolder {
                root: root.to_path_buf(),
                path: path.to_path_buf(),
            })?
    } else {
        path.to_path_buf()
    };

    validate_relative_path(field, &relative)?;
    Ok(relative)
}

fn rename_overwrite(from: &Path, to: &Path) -> io::Result<()> {
    #[cfg(windows)]
    {
        match fs::rename(from, to) {
            Ok(()) => Ok(()),
            Err(err)
                if matches!(
                    err.kind(),
                    io::ErrorKind::AlreadyExists | io::ErrorKind::PermissionDenied
                ) =>
            {
                let _ = fs::remove_file(to);
                fs::rename(from, to)
            }
            Err(err) => Err(err),
        }
    }

    #[cfg(not(windows))]
    {
        fs::rename(from, to)
    }
}

/// Writes `contents` to `path` directly inside `root` through a temp file and a rename.
///
/// Refuses nested paths, symlinks and anything outside `root`. With
/// [`WriteDurability::Durable`] the file and its directory are synced as well.
pub(crate) fn write_atomic(
    root: &Path,
    path: &Path,
    contents: &[u8],
    durability: WriteDurability,
) -> Result<(), StoreError> {
    fs::create_dir_all(root).map_err(|source| StoreError::Io {
        path: root.to_path_buf(),
        source,
    })?;

    let relative = to_relative_path(root, path, "path")?;
    if relative.components().count() != 1 {
        return Err(StoreError::InvalidRelativePath {
            field: "path",
            value: relative,
        });
    }

    let path = root.join(&relative);
    match fs::symlink_metadata(&path) {
        Ok(md) if md.file_type().is_symlink() => {
            return Err(StoreError::SymlinkRefused { path });
        }
        Ok(_) => {}
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(source) => return Err(StoreError::Io { path, source }),
    }

    let (Some(parent), Some(file_name)) = (path.parent(), path.file_name()) else {
        return Err(StoreError::Io {
            path: path.clone(),
            source: io::Error::new(io::ErrorKind::InvalidInput, "path has no parent or file name"),
        });
    };

    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let tmp_path = parent.join(format!(
        ".casemodel.tmp.{}.{nanos}",
        file_name.to_string_lossy()
    ));

    let mut file = fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&tmp_path)
        .map_err(|source| StoreError::Io {
            path: tmp_path.clone(),
            source,
        })?;
    file.write_all(contents).map_err(|source| StoreError::Io {
        path: tmp_path.clone(),
        source,
    })?;
    if durability == WriteDurability::Durable {
        file.sync_all().map_err(|source| StoreError::Io {
            path: tmp_path.clone(),
            source,
        })?;
    }
    drop(file);

    if let Err(source) = rename_overwrite(&tmp_path, &path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(StoreError::Io { path, source });
    }

    #[cfg(unix)]
    if durability == WriteDurability::Durable {
        let dir = fs::File::open(parent).map_err(|source| StoreError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
        dir.sync_all().map_err(|source| StoreError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    Ok(())
}

fn read_optional(path: &Path) -> Result<Option<String>, StoreError> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(Some(text)),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(StoreError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}
