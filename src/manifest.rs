//! Defines the [`SiteManifest`] type: the build input declaring the site's
//! metadata and the ordered sections of articles to publish. The manifest is
//! loaded once at startup and immutable afterward; everything downstream
//! (processing order, index layout, feed ordering) follows its declaration
//! order.

use serde::Deserialize;
use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// The site manifest. Deserialized from a JSON file of the shape
///
/// ```json
/// {
///     "title": "my weblog",
///     "author": "somebody",
///     "email": "somebody@example.com",
///     "href": "https://example.com/blog",
///     "description": "articles about something",
///     "sections": [
///         {"section": "essays", "articles": ["foo", "bar"]}
///     ]
/// }
/// ```
///
/// Unknown fields are ignored; missing fields are left at their empty
/// defaults. The only validation beyond JSON well-formedness is the
/// duplicate-article check in [`load`].
#[derive(Clone, Debug, Default, Deserialize)]
pub struct SiteManifest {
    /// The site's title, used for the index page and the feed.
    #[serde(default)]
    pub title: String,

    /// The site author's name, used for the feed's author fields.
    #[serde(default)]
    pub author: String,

    /// The site author's contact email.
    #[serde(default)]
    pub email: String,

    /// The canonical URL of the published site. Feed links are formed by
    /// joining article output paths onto this href.
    #[serde(default)]
    pub href: String,

    /// A one-line description of the site, used as the feed subtitle.
    #[serde(default)]
    pub description: String,

    /// The ordered sections of the site.
    #[serde(default)]
    pub sections: Vec<SectionSpec>,
}

/// One named section of the site: an ordered list of article identifiers.
/// Each identifier `X` names a directory `X` containing a source file
/// `X.md`.
#[derive(Clone, Debug, Deserialize)]
pub struct SectionSpec {
    /// The section's display name.
    #[serde(default, rename = "section")]
    pub name: String,

    /// The ordered article identifiers belonging to the section.
    #[serde(default)]
    pub articles: Vec<String>,
}

/// Reads and deserializes the manifest at `path`. An article identifier
/// appearing twice anywhere in the manifest is rejected: identifiers double
/// as output file names, so a duplicate would silently overwrite another
/// article's page.
pub fn load(path: &Path) -> Result<SiteManifest> {
    let contents = fs::read_to_string(path).map_err(|err| Error::Read {
        path: path.to_owned(),
        err,
    })?;
    let manifest: SiteManifest =
        serde_json::from_str(&contents).map_err(|err| Error::Deserialize {
            path: path.to_owned(),
            err,
        })?;

    let mut seen: HashSet<&str> = HashSet::new();
    for section in &manifest.sections {
        for id in &section.articles {
            if !seen.insert(id.as_str()) {
                return Err(Error::DuplicateArticle(id.clone()));
            }
        }
    }
    Ok(manifest)
}

/// Represents the result of loading a manifest.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error loading the site manifest. Any of these aborts the
/// build: nothing sensible can be produced without a manifest.
#[derive(Debug)]
pub enum Error {
    /// Returned when the manifest file can't be read.
    Read { path: PathBuf, err: std::io::Error },

    /// Returned when the manifest file isn't well-formed JSON.
    Deserialize {
        path: PathBuf,
        err: serde_json::Error,
    },

    /// Returned when an article identifier appears more than once across the
    /// manifest's sections.
    DuplicateArticle(String),
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Read { path, err } => {
                write!(f, "reading manifest `{}`: {}", path.display(), err)
            }
            Error::Deserialize { path, err } => {
                write!(f, "unmarshaling manifest `{}`: {}", path.display(), err)
            }
            Error::DuplicateArticle(id) => {
                write!(f, "article `{}` is declared more than once", id)
            }
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Read { path: _, err } => Some(err),
            Error::Deserialize { path: _, err } => Some(err),
            Error::DuplicateArticle(_) => None,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load() -> Result<()> {
        let manifest = fixture(
            r#"{
                "title": "my weblog",
                "author": "somebody",
                "email": "somebody@example.com",
                "href": "https://example.com/blog",
                "description": "articles about something",
                "sections": [
                    {"section": "essays", "articles": ["foo", "bar"]},
                    {"section": "notes", "articles": []}
                ]
            }"#,
        )?;
        assert_eq!("my weblog", manifest.title);
        assert_eq!("https://example.com/blog", manifest.href);
        assert_eq!(2, manifest.sections.len());
        assert_eq!("essays", manifest.sections[0].name);
        assert_eq!(vec!["foo", "bar"], manifest.sections[0].articles);
        assert!(manifest.sections[1].articles.is_empty());
        Ok(())
    }

    #[test]
    fn test_load_missing_fields_default_empty() -> Result<()> {
        let manifest = fixture(r#"{"title": "bare"}"#)?;
        assert_eq!("bare", manifest.title);
        assert_eq!("", manifest.author);
        assert_eq!("", manifest.href);
        assert!(manifest.sections.is_empty());
        Ok(())
    }

    #[test]
    fn test_load_ignores_unknown_fields() -> Result<()> {
        let manifest =
            fixture(r#"{"title": "x", "theme": "dark", "sections": []}"#)?;
        assert_eq!("x", manifest.title);
        Ok(())
    }

    #[test]
    fn test_load_rejects_duplicate_articles() {
        let result = fixture(
            r#"{"sections": [
                {"section": "a", "articles": ["foo"]},
                {"section": "b", "articles": ["foo"]}
            ]}"#,
        );
        match result {
            Err(Error::DuplicateArticle(id)) => assert_eq!("foo", id),
            other => panic!("wanted DuplicateArticle, got {:?}", other),
        }
    }

    #[test]
    fn test_load_rejects_malformed_json() {
        assert!(matches!(
            fixture("{not json"),
            Err(Error::Deserialize { .. })
        ));
    }

    #[test]
    fn test_load_missing_file() {
        assert!(matches!(
            load(Path::new("/nonexistent/manifest.json")),
            Err(Error::Read { .. })
        ));
    }

    fn fixture(json: &str) -> Result<SiteManifest> {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("manifest.json");
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(json.as_bytes()).unwrap();
        load(&path)
    }
}
