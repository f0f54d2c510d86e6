//! Maven POM output.
//!
//! The POM is a plain `4.0.0` project descriptor: the project identity, `jar`
//! packaging, UTF-8 source encoding and one `<dependency>` per resolved
//! coordinate, in the order the scanner found them.

use handlebars::Handlebars;
use pomscan_schema::{Coordinate, ProjectIdentity};
use serde_json::json;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors rendering or writing the POM.
#[derive(Error, Debug)]
pub enum PomError {
    /// The template could not be rendered.
    #[error("Failed to render POM: {0}")]
    Render(#[from] handlebars::RenderError),

    /// The output file could not be created, written or moved into place.
    #[error("Failed to write {path}: {source}")]
    Io {
        /// Destination path.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

const POM_TEMPLATE: &str = r#"<project xmlns="http://maven.apache.org/POM/4.0.0"
         xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance"
         xsi:schemaLocation="http://maven.apache.org/POM/4.0.0 http://maven.apache.org/xsd/maven-4.0.0.xsd">
  <modelVersion>4.0.0</modelVersion>

  <groupId>{{project.groupId}}</groupId>
  <artifactId>{{project.artifactId}}</artifactId>
  <version>{{project.version}}</version>
  <packaging>jar</packaging>

  <properties>
    <project.build.sourceEncoding>UTF-8</project.build.sourceEncoding>
  </properties>

  <dependencies>
{{#each dependencies}}
    <dependency>
      <groupId>{{groupId}}</groupId>
      <artifactId>{{artifactId}}</artifactId>
      <version>{{version}}</version>
    </dependency>
{{/each}}
  </dependencies>
</project>
"#;

/// Render a POM for `project` depending on `dependencies`.
///
/// Values are escaped by the template engine, so coordinates containing
/// markup characters still produce well-formed XML.
///
/// # Errors
///
/// Returns [`PomError::Render`] if the template fails to render.
pub fn render_pom(
    project: &ProjectIdentity,
    dependencies: &[Coordinate],
) -> Result<String, PomError> {
    let mut handlebars = Handlebars::new();
    handlebars.set_strict_mode(true);

    let data = json!({
        "project": {
            "groupId": project.group_id,
            "artifactId": project.artifact_id,
            "version": project.version,
        },
        "dependencies": dependencies,
    });
    Ok(handlebars.render_template(POM_TEMPLATE, &data)?)
}

/// Write the POM to `path`, unless there is nothing to declare.
///
/// Returns `Ok(false)` without touching the filesystem when `dependencies` is
/// empty, so a run that resolved nothing never leaves a misleading manifest
/// behind. Otherwise writes to a temporary sibling file and renames it into
/// place.
///
/// # Errors
///
/// Returns [`PomError::Io`] if the file cannot be written or renamed.
pub fn write_pom(
    path: &Path,
    project: &ProjectIdentity,
    dependencies: &[Coordinate],
) -> Result<bool, PomError> {
    if dependencies.is_empty() {
        tracing::debug!("No dependencies resolved, not writing {}", path.display());
        return Ok(false);
    }

    let content = render_pom(project, dependencies)?;
    let io_err = |source| PomError::Io {
        path: path.to_path_buf(),
        source,
    };

    // Atomic write: write to temp file, then rename
    let mut temp_name = path.file_name().unwrap_or_default().to_os_string();
    temp_name.push(".tmp");
    let temp_path = path.with_file_name(temp_name);
    std::fs::write(&temp_path, content).map_err(io_err)?;
    if let Err(e) = std::fs::rename(&temp_path, path) {
        std::fs::remove_file(&temp_path).ok();
        return Err(io_err(e));
    }

    Ok(true)
}
