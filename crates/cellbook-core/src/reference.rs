//! Document references
//!
//! A [`DocumentRef`] says where a worksheet (or a directory of worksheets)
//! lives in a repository: an optional branch, whether it is a file or a
//! directory, and a slash-separated path.
//!
//! URL paths follow the repository browser convention
//! `{tree|blob}/{branch}/{path}`. Branch names may contain slashes; such
//! branches are wrapped in colons, which git never allows in a ref name:
//!
//! ```text
//! tree/main/lectures            -> dir  "lectures"         on "main"
//! blob/main/logic/week1.workbook -> file "logic/week1.workbook" on "main"
//! blob/:feature/x:/a.workbook   -> file "a.workbook"       on "feature/x"
//! ```

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// File extension of worksheet documents
pub const WORKSHEET_EXTENSION: &str = "workbook";

/// Whether a reference names a file or a directory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RefKind {
    File,
    Dir,
}

impl RefKind {
    fn url_segment(self) -> &'static str {
        match self {
            RefKind::File => "blob",
            RefKind::Dir => "tree",
        }
    }
}

/// Location of a document inside a repository
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocumentRef {
    /// Branch name (`None` means the repository's default branch)
    pub branch: Option<String>,
    /// File or directory
    pub kind: RefKind,
    /// Slash-separated path, empty for the repository root
    pub path: String,
}

impl DocumentRef {
    /// The root directory of the default branch
    pub fn root() -> Self {
        Self {
            branch: None,
            kind: RefKind::Dir,
            path: String::new(),
        }
    }

    /// A file on the default branch
    pub fn file(path: impl Into<String>) -> Self {
        Self {
            branch: None,
            kind: RefKind::File,
            path: path.into(),
        }
    }

    /// Set the branch
    pub fn on_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = Some(branch.into());
        self
    }

    /// A file inside this directory, on the same branch
    pub fn child(&self, name: &str) -> Self {
        let path = if self.path.is_empty() {
            name.to_string()
        } else {
            format!("{}/{}", self.path, name)
        };
        Self {
            branch: self.branch.clone(),
            kind: RefKind::File,
            path,
        }
    }

    /// Parse the part of a browser URL that follows the repository name
    ///
    /// # Examples
    /// ```
    /// use cellbook_core::{DocumentRef, RefKind};
    ///
    /// let r = DocumentRef::parse_url_path("blob/:feature/x:/a/b.workbook").unwrap();
    /// assert_eq!(r.branch.as_deref(), Some("feature/x"));
    /// assert_eq!(r.kind, RefKind::File);
    /// assert_eq!(r.path, "a/b.workbook");
    /// ```
    pub fn parse_url_path(url_path: &str) -> Result<Self> {
        if url_path.is_empty() {
            return Ok(Self::root());
        }

        let (kind, rest) = if let Some(rest) = url_path.strip_prefix("tree/") {
            (RefKind::Dir, rest)
        } else if let Some(rest) = url_path.strip_prefix("blob/") {
            (RefKind::File, rest)
        } else {
            return Err(Error::InvalidPath(url_path.into()));
        };

        let (branch, path) = if let Some(quoted) = rest.strip_prefix(':') {
            let end = quoted
                .find(':')
                .ok_or_else(|| Error::InvalidPath(url_path.into()))?;
            let branch = &quoted[..end];
            let path = quoted[end + 1..]
                .strip_prefix('/')
                .ok_or_else(|| Error::InvalidPath(url_path.into()))?;
            (branch, path)
        } else {
            rest.split_once('/').unwrap_or((rest, ""))
        };

        if branch.is_empty() {
            return Err(Error::InvalidPath(url_path.into()));
        }

        Ok(Self {
            branch: Some(branch.to_string()),
            kind,
            path: path.to_string(),
        })
    }

    /// Format as a URL path; inverse of [`parse_url_path`](Self::parse_url_path)
    pub fn url_path(&self) -> String {
        if self.branch.is_none() && self.kind == RefKind::Dir && self.path.is_empty() {
            return String::new();
        }
        format!(
            "{}/{}{}",
            self.kind.url_segment(),
            self.branch_segment(),
            self.path
        )
    }

    /// Browser link for this reference inside `repo`
    ///
    /// Worksheets open in the sheet view, everything else in the repository
    /// browser.
    pub fn link(&self, repo: &str) -> String {
        let view = if self.is_worksheet() { "sheet" } else { "repo" };
        format!(
            "/{}/{}/{}/{}{}",
            view,
            repo,
            self.kind.url_segment(),
            self.branch_segment(),
            self.path
        )
    }

    /// Last path segment
    pub fn file_name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or("")
    }

    /// Extension of the last path segment, if it has one
    pub fn extension(&self) -> Option<&str> {
        self.file_name().rsplit_once('.').map(|(_, ext)| ext)
    }

    /// Whether this names a worksheet document
    pub fn is_worksheet(&self) -> bool {
        self.extension() == Some(WORKSHEET_EXTENSION)
    }

    fn branch_segment(&self) -> String {
        match &self.branch {
            Some(b) if b.contains('/') => format!(":{}:/", b),
            Some(b) => format!("{}/", b),
            None => String::new(),
        }
    }
}

impl fmt::Display for DocumentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.branch {
            Some(b) => write!(f, "{}@{}", self.path, b),
            None => f.write_str(&self.path),
        }
    }
}
