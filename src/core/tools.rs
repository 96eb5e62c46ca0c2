//! JDK tool resolution.
//!
//! The pipeline shells out to `jar`, `jarsigner`, and `keytool`. When a
//! `jdkHome` is configured the tools are taken from its `bin/`
//! directory; otherwise they are discovered on PATH.

use std::path::PathBuf;

use tracing::debug;

use crate::error::CommandError;

pub const JAR: &str = "jar";
pub const JARSIGNER: &str = "jarsigner";
pub const KEYTOOL: &str = "keytool";

/// Resolve an external JDK tool by name.
///
/// # Errors
///
/// [`CommandError::ToolNotFound`] if the tool is neither under
/// `<jdk_home>/bin` nor on PATH.
pub fn find_tool(jdk_home: &str, name: &str) -> Result<PathBuf, CommandError> {
    if !jdk_home.trim().is_empty() {
        let candidate = PathBuf::from(jdk_home).join("bin").join(name);
        if candidate.exists() {
            debug!(tool = name, path = %candidate.display(), "resolved tool from jdkHome");
            return Ok(candidate);
        }
        return Err(CommandError::ToolNotFound(name.to_string()));
    }

    which::which(name)
        .map(|path| {
            debug!(tool = name, path = %path.display(), "resolved tool from PATH");
            path
        })
        .map_err(|_| CommandError::ToolNotFound(name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_tool_missing_from_jdk_home() {
        let err = find_tool("/nonexistent/jdk", JARSIGNER).unwrap_err();
        assert!(matches!(err, CommandError::ToolNotFound(_)));
    }

    #[cfg(unix)]
    #[test]
    fn test_find_tool_from_jdk_home_bin() {
        let tmp = tempfile::TempDir::new().unwrap();
        let bin = tmp.path().join("bin");
        std::fs::create_dir(&bin).unwrap();
        std::fs::write(bin.join("jarsigner"), "#!/bin/sh\n").unwrap();

        let path = find_tool(tmp.path().to_str().unwrap(), JARSIGNER).unwrap();
        assert_eq!(path, bin.join("jarsigner"));
    }

    #[cfg(unix)]
    #[test]
    fn test_find_tool_from_path() {
        // `sh` exists on any unix PATH
        assert!(find_tool("", "sh").is_ok());
        assert!(find_tool("", "definitely-not-a-real-tool-xyz").is_err());
    }
}
