//! Template loading and page rendering. The template set is parsed once at
//! startup from sources embedded in the binary and reused for every page;
//! a template-parse failure is fatal to the whole run.
//!
//! The embedded set mirrors the five named templates the site is built
//! from: `article.html` and `index.html` are page entry points, while
//! `head.html`, `footer.html`, and `actions.html` are shared `{{define}}`
//! fragments the pages invoke. Fragment and page sources are concatenated
//! and parsed together, so each page template can reach every fragment.

use crate::article::{ArticleRecord, Document};
use crate::manifest::SiteManifest;
use crate::value;
use gtmpl::{Context, Template};
use gtmpl_value::Value;
use std::collections::HashMap;
use std::fmt;
use std::fs::File;
use std::path::{Path, PathBuf};

const ACTIONS: &str = include_str!("../templates/actions.html");
const HEAD: &str = include_str!("../templates/head.html");
const FOOTER: &str = include_str!("../templates/footer.html");
const ARTICLE: &str = include_str!("../templates/article.html");
const INDEX: &str = include_str!("../templates/index.html");

/// One section's worth of aggregated article metadata, in manifest order.
/// Articles that failed to resolve are simply absent; a section whose every
/// article failed (or that declared none) still renders with its heading
/// and an empty list.
pub struct SectionRecord {
    /// The section's display name.
    pub name: String,

    /// The records of the section's successfully built articles.
    pub articles: Vec<ArticleRecord>,
}

/// The parsed templates for the two page kinds, loaded once and shared by
/// every render call.
pub struct TemplateSet {
    article: Template,
    index: Template,
}

impl TemplateSet {
    /// Parses the embedded template sources. Failure here aborts the build:
    /// no page can be produced without the templates.
    pub fn load() -> Result<TemplateSet> {
        Ok(TemplateSet {
            article: parse_template(&[ACTIONS, HEAD, FOOTER, ARTICLE])?,
            index: parse_template(&[ACTIONS, HEAD, FOOTER, INDEX])?,
        })
    }
}

// Concatenates the template sources and parses the result into a template.
fn parse_template(sources: &[&str]) -> Result<Template> {
    let mut contents = String::new();
    for source in sources {
        contents.push_str(source);
        contents.push(' ');
    }

    let mut template = Template::default();
    template.parse(&contents).map_err(Error::ParseTemplate)?;
    Ok(template)
}

/// Renders one article's page to `path`. The template sees the site
/// metadata as `.site` and the document as `.article`.
pub fn render_document(
    path: &Path,
    document: &Document,
    site: &SiteManifest,
    templates: &TemplateSet,
) -> Result<()> {
    let mut root: HashMap<String, Value> = HashMap::new();
    root.insert("site".to_owned(), value::site(site));
    root.insert("article".to_owned(), Value::from(document));
    write_page(path, &templates.article, Value::Object(root))
}

/// Renders the section-organized index page to `path`. The template sees
/// the site metadata as `.site` and the ordered section records as
/// `.sections`.
pub fn render_index(
    path: &Path,
    sections: &[SectionRecord],
    site: &SiteManifest,
    templates: &TemplateSet,
) -> Result<()> {
    let mut root: HashMap<String, Value> = HashMap::new();
    root.insert("site".to_owned(), value::site(site));
    root.insert(
        "sections".to_owned(),
        Value::Array(sections.iter().map(Value::from).collect()),
    );
    write_page(path, &templates.index, Value::Object(root))
}

// Creates the destination file, executes the template into it, and syncs
// the handle. A sync failure after a successful render is still an error;
// a sync failure after a render failure is combined with it rather than
// replacing it.
fn write_page(path: &Path, template: &Template, value: Value) -> Result<()> {
    // Context::from can't actually fail for a value that is already a
    // `Value`.
    let context = Context::from(value).unwrap();
    let mut file = File::create(path).map_err(|err| Error::Create {
        path: path.to_owned(),
        err,
    })?;

    let rendered = template
        .execute(&mut file, &context)
        .map_err(Error::Template);
    let synced = file.sync_all().map_err(|err| Error::Close {
        path: path.to_owned(),
        err,
    });

    match (rendered, synced) {
        (Ok(()), Ok(())) => Ok(()),
        (Err(err), Ok(())) | (Ok(()), Err(err)) => Err(err),
        (Err(render), Err(close)) => {
            Err(Error::RenderAndClose(Box::new(render), Box::new(close)))
        }
    }
}

/// The result of a fallible page-rendering operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error in a template or page-rendering operation.
#[derive(Debug)]
pub enum Error {
    /// An error parsing the embedded template sources.
    ParseTemplate(String),

    /// An error during templating.
    Template(String),

    /// An error creating the destination file.
    Create { path: PathBuf, err: std::io::Error },

    /// An error syncing the destination file after rendering.
    Close { path: PathBuf, err: std::io::Error },

    /// A render error followed by a sync error on the same destination;
    /// neither is dropped.
    RenderAndClose(Box<Error>, Box<Error>),
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as presentable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::ParseTemplate(err) => {
                write!(f, "parsing templates: {}", err)
            }
            Error::Template(err) => err.fmt(f),
            Error::Create { path, err } => {
                write!(f, "creating `{}`: {}", path.display(), err)
            }
            Error::Close { path, err } => {
                write!(f, "closing `{}`: {}", path.display(), err)
            }
            Error::RenderAndClose(render, close) => {
                write!(f, "{}; and {}", render, close)
            }
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::ParseTemplate(_) => None,
            Error::Template(_) => None,
            Error::Create { path: _, err } => Some(err),
            Error::Close { path: _, err } => Some(err),
            Error::RenderAndClose(render, _) => Some(render),
        }
    }
}
