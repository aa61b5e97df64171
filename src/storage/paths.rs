// PathManager maps sessions and stored file names to paths on disk.
//
// The layout consists of two sibling roots, one per side of the pipeline:
//
//	<upload_root>
//	└── <session id>
//	    └── <unique name>.png      raw bytes as uploaded
//	<output_root>
//	└── <session id>
//	    ├── <unique name>.png      processed result, same name as its input
//	    └── .<unique name>.png.partial
//
// Only the output side is ever served. Names beginning with a dot are
// in-flight writes and are renamed into place once complete.

use std::path::{Path, PathBuf};

use crate::domain::SessionId;

#[derive(Clone, Debug)]
pub struct PathManager {
    upload_root: PathBuf,
    output_root: PathBuf,
}

impl PathManager {
    pub fn new(upload_root: impl Into<PathBuf>, output_root: impl Into<PathBuf>) -> Self {
        PathManager {
            upload_root: upload_root.into(),
            output_root: output_root.into(),
        }
    }

    /// Returns the root of all output namespaces, (e.g. `<output_root>`).
    pub fn outputs_path(&self) -> &Path {
        &self.output_root
    }

    /// Returns the upload namespace of a session, (e.g. `<upload_root>/<id>`).
    pub fn upload_session_path(&self, session: &SessionId) -> PathBuf {
        self.upload_root.join(session.as_str())
    }

    /// Returns the output namespace of a session, (e.g. `<output_root>/<id>`).
    pub fn output_session_path(&self, session: &SessionId) -> PathBuf {
        self.output_root.join(session.as_str())
    }

    /// Returns the path of a raw upload, (e.g. `<upload_root>/<id>/<name>`).
    pub fn upload_file_path(&self, session: &SessionId, filename: &str) -> PathBuf {
        self.upload_session_path(session).join(filename)
    }

    /// Returns the path of a processed output, (e.g. `<output_root>/<id>/<name>`).
    pub fn output_file_path(&self, session: &SessionId, filename: &str) -> PathBuf {
        self.output_session_path(session).join(filename)
    }

    /// Returns the in-flight path of an output being written,
    /// (e.g. `<output_root>/<id>/.<name>.partial`).
    pub fn output_partial_path(&self, session: &SessionId, filename: &str) -> PathBuf {
        self.output_session_path(session)
            .join(format!(".{filename}.partial"))
    }
}
