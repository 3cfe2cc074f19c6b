//! Exports the [`build_site`] function which drives the whole pipeline:
//! load the manifest, parse the templates, prepare the output directories,
//! resolve and render each article in manifest order, then render the
//! section-organized index page and write the Atom feed.
//!
//! Failures split into two severities, and the split lives in the types: a
//! [`Error`] is fatal (nothing useful can be built) and is the only thing
//! [`build_site`] returns early for. Everything else — a single article
//! failing to parse or render, a feed link that won't join, the index or
//! the feed failing to write — is logged and skipped, because a failure
//! local to one artifact must never prevent production of the others.

use crate::article;
use crate::feed::{self, FeedItem};
use crate::manifest::{self, SiteManifest};
use crate::render::{self, SectionRecord, TemplateSet};
use crate::url;
use chrono::{FixedOffset, TimeZone, Utc};
use std::fmt;
use std::fs;
use std::path::PathBuf;
use tracing::{info, warn};

/// Bundled configuration for one build run, straight from the command line.
pub struct Config {
    /// The directory the site is written into.
    pub output_directory: PathBuf,

    /// The path of the site manifest JSON file.
    pub manifest_path: PathBuf,

    /// The directory containing the per-article source directories.
    pub source_directory: PathBuf,
}

/// Builds the site from a [`Config`]. Returns `Err` only for fatal
/// failures: an unloadable manifest, an unparsable template set, or an
/// uncreatable output directory. Per-article and per-artifact failures are
/// logged and skipped.
pub fn build_site(config: &Config) -> Result<()> {
    // The feed's `updated` stamp is the build's start time; capture it
    // before any article work happens.
    let started = FixedOffset::east(0).from_utc_datetime(&Utc::now().naive_utc());

    let site = manifest::load(&config.manifest_path)?;
    let templates = TemplateSet::load()?;

    let articles_directory = config.output_directory.join("articles");
    fs::create_dir_all(&articles_directory).map_err(|err| Error::OutputDir {
        path: articles_directory.clone(),
        err,
    })?;

    let (sections, items) = process_articles(config, &site, &templates);

    info!("rendering index");
    if let Err(err) = render::render_index(
        &config.output_directory.join("index.html"),
        &sections,
        &site,
        &templates,
    ) {
        warn!("rendering index: {} (continuing)", err);
    }

    info!("writing feed");
    let feed_document = feed::feed(&site, &items, started);
    if let Err(err) = feed::write_feed(
        &feed_document,
        &config.output_directory.join("weblog.atom"),
    ) {
        warn!("writing atom feed: {} (continuing)", err);
    }

    info!("done");
    Ok(())
}

// The per-article loop plus the metadata aggregation. Sections and articles
// are visited in manifest order; that order is what the index and the feed
// show. A failed article leaves no record and no feed item; a section whose
// every article failed still gets an (empty) record.
fn process_articles(
    config: &Config,
    site: &SiteManifest,
    templates: &TemplateSet,
) -> (Vec<SectionRecord>, Vec<FeedItem>) {
    let mut sections: Vec<SectionRecord> =
        Vec::with_capacity(site.sections.len());
    let mut items: Vec<FeedItem> = Vec::new();

    for spec in &site.sections {
        let mut record = SectionRecord {
            name: spec.name.clone(),
            articles: Vec::new(),
        };
        for id in &spec.articles {
            info!(section = %spec.name, article = %id, "building article");
            let article = match article::resolve(
                &config.source_directory,
                &config.output_directory,
                id,
                templates,
                site,
            ) {
                Ok(article) => article,
                Err(err) => {
                    warn!("{}", err);
                    continue;
                }
            };

            // A link that won't join drops only the feed item; the article
            // stays in its section record.
            match url::join_path(&site.href, &article.url) {
                Ok(link) => items.push(FeedItem {
                    title: article.title.clone(),
                    link,
                    summary: article.summary.clone(),
                    published: article.published,
                }),
                Err(err) => {
                    warn!("joining feed link for `{}`: {}", id, err)
                }
            }
            record.articles.push(article);
        }
        sections.push(record);
    }

    (sections, items)
}

/// The result of a site build.
pub type Result<T> = std::result::Result<T, Error>;

/// The fatal error type for building a site. Anything recoverable never
/// becomes an [`Error`]; it is logged inside [`build_site`] instead.
#[derive(Debug)]
pub enum Error {
    /// Returned when the manifest can't be loaded.
    Manifest(manifest::Error),

    /// Returned when the embedded template set fails to parse.
    Template(render::Error),

    /// Returned when the articles output directory can't be created.
    OutputDir { path: PathBuf, err: std::io::Error },
}

impl fmt::Display for Error {
    /// Implements [`fmt::Display`] for [`Error`].
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Manifest(err) => err.fmt(f),
            Error::Template(err) => err.fmt(f),
            Error::OutputDir { path, err } => write!(
                f,
                "creating articles output dir `{}`: {}",
                path.display(),
                err
            ),
        }
    }
}

impl std::error::Error for Error {
    /// Implements [`std::error::Error`] for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Manifest(err) => Some(err),
            Error::Template(err) => Some(err),
            Error::OutputDir { path: _, err } => Some(err),
        }
    }
}

impl From<manifest::Error> for Error {
    /// Converts [`manifest::Error`]s into [`Error`]. This allows us to use
    /// the `?` operator when loading the manifest.
    fn from(err: manifest::Error) -> Error {
        Error::Manifest(err)
    }
}

impl From<render::Error> for Error {
    /// Converts [`render::Error`]s into [`Error`]. This allows us to use
    /// the `?` operator when loading the template set.
    fn from(err: render::Error) -> Error {
        Error::Template(err)
    }
}
