pub mod add;
pub mod adddir;
pub mod create;
pub mod discard;
pub mod init;
pub mod prepare;

pub use add::Add;
pub use adddir::Adddir;
pub use create::Create;
pub use discard::Discard;
pub use init::Init;
pub use prepare::Prepare;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::op::{Op, OpContext};
    use common::error::{Categorized, ErrorKind};
    use common::media::MediaTier;
    use std::fs::{self, File};
    use std::io::Write;
    use std::path::{Path, PathBuf};

    struct World {
        _dir: tempfile::TempDir,
        ctx: OpContext,
        files: PathBuf,
        archive: PathBuf,
    }

    /// An initialized state directory plus a scratch area for files to stage.
    fn world() -> World {
        let dir = tempfile::tempdir().unwrap();
        let files = dir.path().join("files");
        let archive = dir.path().join("archive");
        fs::create_dir(&files).unwrap();

        let ctx = OpContext::new(Some(dir.path().join("state")));
        Init {
            archive_root: archive.clone(),
        }
        .execute(&ctx)
        .unwrap();

        World {
            ctx,
            files,
            archive,
            _dir: dir,
        }
    }

    fn touch(dir: &Path, name: &str, len: usize) -> PathBuf {
        let path = dir.join(name);
        File::create(&path).unwrap().write_all(&vec![0u8; len]).unwrap();
        path
    }

    #[test]
    fn test_ops_fail_before_init() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = OpContext::new(Some(dir.path().join("state")));
        let err = Prepare {
            tier: MediaTier::Small,
        }
        .execute(&ctx)
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn test_prepare_twice_is_a_state_error() {
        let w = world();
        let prepare = Prepare {
            tier: MediaTier::Small,
        };
        prepare.execute(&w.ctx).unwrap();
        let err = prepare.execute(&w.ctx).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::State);
    }

    #[test]
    fn test_add_without_session_is_a_state_error() {
        let w = world();
        let file = touch(&w.files, "a.txt", 10);
        let err = Add { files: vec![file] }.execute(&w.ctx).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::State);
    }

    #[test]
    fn test_full_lifecycle_prepare_add_create() {
        let w = world();
        let a = touch(&w.files, "a.txt", 1000);
        let b = touch(&w.files, "b.txt", 3000);

        Prepare {
            tier: MediaTier::Small,
        }
        .execute(&w.ctx)
        .unwrap();

        let output = Add {
            files: vec![a.clone(), b.clone()],
        }
        .execute(&w.ctx)
        .unwrap();
        assert!(output.contains("added 2 file(s)"));
        assert!(output.contains("uses 6144 of 700000000 bytes"));

        let output = Create {}.execute(&w.ctx).unwrap();
        assert!(output.contains("archive 1"));

        // Files mirrored under archive directory 1, originals now symlinks.
        let archive_dir = w.archive.join("1");
        for original in [&a, &b] {
            let target = archive_dir.join(original.strip_prefix("/").unwrap());
            assert!(target.is_file());
            assert!(fs::symlink_metadata(original)
                .unwrap()
                .file_type()
                .is_symlink());
        }

        // Back to idle: a new session can be prepared.
        Prepare {
            tier: MediaTier::Medium,
        }
        .execute(&w.ctx)
        .unwrap();
    }

    #[test]
    fn test_add_reports_duplicates() {
        let w = world();
        let a = touch(&w.files, "a.txt", 10);
        Prepare {
            tier: MediaTier::Small,
        }
        .execute(&w.ctx)
        .unwrap();

        Add {
            files: vec![a.clone()],
        }
        .execute(&w.ctx)
        .unwrap();
        let output = Add { files: vec![a] }.execute(&w.ctx).unwrap();
        assert!(output.contains("discarded 1 duplicate"));
    }

    #[test]
    fn test_adddir_stages_files_recursively() {
        let w = world();
        let nested = w.files.join("photos").join("2016");
        fs::create_dir_all(&nested).unwrap();
        touch(&w.files, "top.txt", 10);
        touch(&nested, "deep.txt", 10);

        Prepare {
            tier: MediaTier::Small,
        }
        .execute(&w.ctx)
        .unwrap();
        let output = Adddir {
            directories: vec![w.files.clone()],
        }
        .execute(&w.ctx)
        .unwrap();
        assert!(output.contains("added 2 file(s)"));
    }

    #[test]
    fn test_adddir_rejects_a_file_argument() {
        let w = world();
        let file = touch(&w.files, "a.txt", 10);
        Prepare {
            tier: MediaTier::Small,
        }
        .execute(&w.ctx)
        .unwrap();
        let err = Adddir {
            directories: vec![file],
        }
        .execute(&w.ctx)
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn test_discard_closes_the_session_without_touching_files() {
        let w = world();
        let a = touch(&w.files, "a.txt", 10);
        Prepare {
            tier: MediaTier::Medium,
        }
        .execute(&w.ctx)
        .unwrap();
        Add {
            files: vec![a.clone()],
        }
        .execute(&w.ctx)
        .unwrap();

        Discard {}.execute(&w.ctx).unwrap();
        assert!(a.is_file());
        assert!(fs::read_dir(&w.archive).unwrap().next().is_none());

        // Session is closed now.
        let err = Discard {}.execute(&w.ctx).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::State);
    }
}
