//! Defines the [`Document`] and [`ArticleRecord`] types and the logic for
//! resolving one article identifier into a parsed document and a rendered
//! output page.
//!
//! An article identifier `foo` names a directory `foo` under the source root
//! containing a source file `foo.md`. The source file carries YAML
//! frontmatter between `---` fences followed by a markdown body:
//!
//! ```md
//! ---
//! Title: Hello, world!
//! Date: 2021-04-16
//! ---
//! # Hello
//!
//! World
//! ```
//!
//! The frontmatter may also carry a `Summary` field; when it's absent, the
//! summary is the rendered body up to a `<!-- more -->` marker (or the whole
//! body when there is no marker).
//!
//! The parser takes the article's directory as an explicit argument rather
//! than resolving sources against the process working directory, so nothing
//! here mutates process-wide state.

use crate::manifest::SiteManifest;
use crate::render::{self, TemplateSet};
use chrono::{
    DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeZone,
};
use pulldown_cmark::{html, Parser};
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::Path;

const SOURCE_EXTENSION: &str = ".md";
const FOLD_TAG: &str = "<!-- more -->";

/// The parsed, structured representation of one article's source. Owned by
/// the resolver while the article's page renders; only the derived
/// [`ArticleRecord`] survives the article's processing.
pub struct Document {
    /// The article's title.
    pub title: String,

    /// The article's summary as HTML, shown on the index page and in the
    /// feed.
    pub summary: String,

    /// The article's publish timestamp (midnight UTC of the frontmatter
    /// `Date`).
    pub published: DateTime<FixedOffset>,

    /// The article's body rendered to HTML.
    pub body: String,
}

/// The metadata that outlives one article's processing: everything the index
/// page and the feed need. Records exist only for articles that parsed and
/// rendered successfully.
pub struct ArticleRecord {
    /// The article's output URL relative to the site root, always with
    /// forward slashes: `articles/<id>.html`.
    pub url: String,

    /// The article's title.
    pub title: String,

    /// The article's summary as HTML.
    pub summary: String,

    /// The article's publish timestamp.
    pub published: DateTime<FixedOffset>,
}

#[derive(Deserialize)]
struct Frontmatter {
    /// The title of the article.
    #[serde(rename = "Title")]
    title: String,

    /// The publish date of the article, `%Y-%m-%d`.
    #[serde(rename = "Date")]
    date: String,

    /// An optional explicit summary. Overrides the fold-marker summary.
    #[serde(default, rename = "Summary")]
    summary: Option<String>,
}

/// Parses the article named `id` from the directory `dir` (i.e., from
/// `{dir}/{id}.md`). Errors are annotated with the article identifier so the
/// log alone identifies the failing article.
pub fn parse_article(dir: &Path, id: &str) -> Result<Document> {
    match parse(dir, id) {
        Ok(document) => Ok(document),
        Err(err) => Err(Error::Annotated(
            format!("parsing article `{}`", id),
            Box::new(err),
        )),
    }
}

fn parse(dir: &Path, id: &str) -> Result<Document> {
    fn frontmatter_indices(input: &str) -> Result<(usize, usize, usize)> {
        const FENCE: &str = "---";
        if !input.starts_with(FENCE) {
            return Err(Error::FrontmatterMissingStartFence);
        }
        match input[FENCE.len()..].find("---") {
            None => Err(Error::FrontmatterMissingEndFence),
            Some(offset) => Ok((
                FENCE.len(),                        // yaml_start
                FENCE.len() + offset,               // yaml_stop
                FENCE.len() + offset + FENCE.len(), // body_start
            )),
        }
    }

    let input =
        fs::read_to_string(dir.join(format!("{}{}", id, SOURCE_EXTENSION)))?;
    let (yaml_start, yaml_stop, body_start) = frontmatter_indices(&input)?;
    let frontmatter: Frontmatter =
        serde_yaml::from_str(&input[yaml_start..yaml_stop])?;
    let published = parse_date(&frontmatter.date)?;

    let mut body = String::new();
    html::push_html(&mut body, Parser::new(&input[body_start..]));

    let summary = match frontmatter.summary {
        Some(summary) => summary,
        None => fold_summary(&body).to_owned(),
    };

    Ok(Document {
        title: frontmatter.title,
        summary,
        published,
        body,
    })
}

/// Returns the body up to the fold marker, or the whole body when there is
/// no marker.
fn fold_summary(body: &str) -> &str {
    match body.find(FOLD_TAG) {
        Some(i) => &body[..i],
        None => body,
    }
}

// Frontmatter dates carry no time or zone; the publish timestamp is the
// date's midnight pinned to UTC.
fn parse_date(date: &str) -> Result<DateTime<FixedOffset>> {
    let naive_date = NaiveDate::parse_from_str(date, "%Y-%m-%d")?;
    let naive_date_time =
        NaiveDateTime::new(naive_date, NaiveTime::from_hms(0, 0, 0));
    Ok(FixedOffset::east(0).from_utc_datetime(&naive_date_time))
}

/// Resolves one article end to end: parses `{source_root}/{id}/{id}.md`,
/// renders the article page to `{output_root}/articles/{id}.html`, and
/// returns the derived [`ArticleRecord`]. A failure anywhere is returned to
/// the caller (which logs it and moves on to the next article) and leaves no
/// record.
pub fn resolve(
    source_root: &Path,
    output_root: &Path,
    id: &str,
    templates: &TemplateSet,
    site: &SiteManifest,
) -> Result<ArticleRecord> {
    let document = parse_article(&source_root.join(id), id)?;

    // The relative URL is built as a string rather than a PathBuf: it's a
    // URL, forward slashes regardless of the host's path separator.
    let url = format!("articles/{}.html", id);
    let output_path = output_root
        .join("articles")
        .join(format!("{}.html", id));
    if let Err(err) =
        render::render_document(&output_path, &document, site, templates)
    {
        return Err(Error::Annotated(
            format!("rendering article `{}`", id),
            Box::new(Error::Render(err)),
        ));
    }

    Ok(ArticleRecord {
        url,
        title: document.title,
        summary: document.summary,
        published: document.published,
    })
}

/// Represents the result of an article-processing operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error parsing or rendering an article.
#[derive(Debug)]
pub enum Error {
    /// Returned when an article source file is missing its starting
    /// frontmatter fence (`---`).
    FrontmatterMissingStartFence,

    /// Returned when an article source file is missing its terminal
    /// frontmatter fence (the starting fence was found but the ending one
    /// was missing).
    FrontmatterMissingEndFence,

    /// Returned when there was an error parsing the frontmatter as YAML.
    DeserializeYaml(serde_yaml::Error),

    /// Returned when the frontmatter `Date` isn't a valid `%Y-%m-%d` date.
    DateParse(chrono::ParseError),

    /// Returned when the article's page fails to render.
    Render(render::Error),

    /// Returned for other I/O errors (including a missing source file).
    Io(std::io::Error),

    /// An error with an annotation.
    Annotated(String, Box<Error>),
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::FrontmatterMissingStartFence => {
                write!(f, "article must begin with `---`")
            }
            Error::FrontmatterMissingEndFence => {
                write!(f, "missing closing `---`")
            }
            Error::DeserializeYaml(err) => err.fmt(f),
            Error::DateParse(err) => write!(f, "parsing `Date`: {}", err),
            Error::Render(err) => err.fmt(f),
            Error::Io(err) => err.fmt(f),
            Error::Annotated(annotation, err) => {
                write!(f, "{}: {}", annotation, err)
            }
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::FrontmatterMissingStartFence => None,
            Error::FrontmatterMissingEndFence => None,
            Error::DeserializeYaml(err) => Some(err),
            Error::DateParse(err) => Some(err),
            Error::Render(err) => Some(err),
            Error::Io(err) => Some(err),
            Error::Annotated(_, err) => Some(err),
        }
    }
}

impl From<serde_yaml::Error> for Error {
    /// Converts a [`serde_yaml::Error`] into an [`Error`]. It allows us to
    /// use the `?` operator for frontmatter deserialization.
    fn from(err: serde_yaml::Error) -> Error {
        Error::DeserializeYaml(err)
    }
}

impl From<chrono::ParseError> for Error {
    /// Converts a [`chrono::ParseError`] into an [`Error`]. It allows us to
    /// use the `?` operator for date parsing.
    fn from(err: chrono::ParseError) -> Error {
        Error::DateParse(err)
    }
}

impl From<std::io::Error> for Error {
    /// Converts a [`std::io::Error`] into an [`Error`]. It allows us to use
    /// the `?` operator for fallible I/O operations.
    fn from(err: std::io::Error) -> Error {
        Error::Io(err)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_article() -> Result<()> {
        let dir = tempfile::tempdir().unwrap();
        write_source(
            dir.path(),
            "hello",
            "---\nTitle: Hello, world!\nDate: 2021-04-16\n---\nToday is \
             a *good* day.",
        );

        let document = parse_article(&dir.path().join("hello"), "hello")?;
        assert_eq!("Hello, world!", document.title);
        assert_eq!("2021-04-16", document.published.format("%Y-%m-%d").to_string());
        assert!(document.body.contains("<em>good</em>"));
        // No fold marker: the summary is the whole body.
        assert_eq!(document.body, document.summary);
        Ok(())
    }

    #[test]
    fn test_parse_article_fold_summary() -> Result<()> {
        let dir = tempfile::tempdir().unwrap();
        write_source(
            dir.path(),
            "folded",
            "---\nTitle: Folded\nDate: 2021-04-16\n---\nAbove the fold.\n\n\
             <!-- more -->\n\nBelow the fold.",
        );

        let document = parse_article(&dir.path().join("folded"), "folded")?;
        assert!(document.summary.contains("Above the fold."));
        assert!(!document.summary.contains("Below the fold."));
        assert!(document.body.contains("Below the fold."));
        Ok(())
    }

    #[test]
    fn test_parse_article_explicit_summary() -> Result<()> {
        let dir = tempfile::tempdir().unwrap();
        write_source(
            dir.path(),
            "explicit",
            "---\nTitle: Explicit\nDate: 2021-04-16\nSummary: The short \
             version.\n---\nThe long version.",
        );

        let document =
            parse_article(&dir.path().join("explicit"), "explicit")?;
        assert_eq!("The short version.", document.summary);
        Ok(())
    }

    #[test]
    fn test_parse_article_missing_source() {
        let dir = tempfile::tempdir().unwrap();
        let err = parse_article(&dir.path().join("ghost"), "ghost")
            .err()
            .unwrap();
        // The annotation names the failing article.
        assert!(err.to_string().contains("ghost"));
        assert!(matches!(err, Error::Annotated(_, _)));
    }

    #[test]
    fn test_parse_article_missing_start_fence() {
        let dir = tempfile::tempdir().unwrap();
        write_source(dir.path(), "bad", "Title: no fences\n");
        let err =
            parse_article(&dir.path().join("bad"), "bad").err().unwrap();
        assert!(err.to_string().contains("must begin with `---`"));
    }

    #[test]
    fn test_parse_article_missing_end_fence() {
        let dir = tempfile::tempdir().unwrap();
        write_source(dir.path(), "bad", "---\nTitle: unterminated\n");
        let err =
            parse_article(&dir.path().join("bad"), "bad").err().unwrap();
        assert!(err.to_string().contains("missing closing `---`"));
    }

    #[test]
    fn test_parse_article_bad_date() {
        let dir = tempfile::tempdir().unwrap();
        write_source(
            dir.path(),
            "bad",
            "---\nTitle: Bad date\nDate: April 16th\n---\nbody",
        );
        let err =
            parse_article(&dir.path().join("bad"), "bad").err().unwrap();
        assert!(err.to_string().contains("parsing `Date`"));
    }

    fn write_source(root: &Path, id: &str, contents: &str) {
        let dir = root.join(id);
        fs::create_dir_all(&dir).unwrap();
        let mut file =
            fs::File::create(dir.join(format!("{}.md", id))).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
    }
}
