//! Support for creating the site's Atom feed from the aggregated article
//! metadata.

use crate::manifest::SiteManifest;
use atom_syndication::{Entry, Error as AtomError, Feed, Link, Person};
use chrono::{DateTime, FixedOffset};
use std::collections::HashMap;
use std::fmt;
use std::fs::File;
use std::path::Path;

/// One article's representation in the feed. Items are collected across all
/// sections in processing order, which is manifest order.
pub struct FeedItem {
    /// The article's title.
    pub title: String,

    /// The article's absolute URL (canonical href joined with the relative
    /// output URL). Doubles as the entry's `id`.
    pub link: String,

    /// The article's summary as HTML.
    pub summary: String,

    /// The article's publish timestamp.
    pub published: DateTime<FixedOffset>,
}

/// Creates a feed from the site metadata and an ordered list of
/// [`FeedItem`]s. `updated` is the build's start time, not any per-article
/// timestamp.
pub fn feed(
    site: &SiteManifest,
    items: &[FeedItem],
    updated: DateTime<FixedOffset>,
) -> Feed {
    Feed {
        entries: entries(site, items),
        title: site.title.clone(),
        id: site.href.clone(),
        updated,
        authors: site_authors(site),
        categories: Vec::new(),
        contributors: Vec::new(),
        generator: None,
        icon: None,
        logo: None,
        rights: None,
        subtitle: match site.description.is_empty() {
            true => None,
            false => Some(site.description.clone()),
        },
        extensions: HashMap::new(),
        namespaces: HashMap::new(),
        links: vec![alternate(site.href.clone())],
    }
}

fn entries(site: &SiteManifest, items: &[FeedItem]) -> Vec<Entry> {
    let mut entries: Vec<Entry> = Vec::with_capacity(items.len());
    for item in items {
        entries.push(Entry {
            id: item.link.clone(),
            title: item.title.clone(),
            updated: item.published,
            authors: site_authors(site),
            links: vec![alternate(item.link.clone())],
            rights: None,
            summary: Some(item.summary.clone()),
            categories: Vec::new(),
            contributors: Vec::new(),
            published: Some(item.published),
            source: None,
            content: None,
            extensions: HashMap::new(),
        })
    }
    entries
}

fn alternate(href: String) -> Link {
    Link {
        href,
        rel: "alternate".to_owned(),
        title: None,
        hreflang: None,
        mime_type: None,
        length: None,
    }
}

fn site_authors(site: &SiteManifest) -> Vec<Person> {
    match site.author.is_empty() {
        true => Vec::new(),
        false => vec![Person {
            name: site.author.clone(),
            email: match site.email.is_empty() {
                true => None,
                false => Some(site.email.clone()),
            },
            uri: None,
        }],
    }
}

/// Serializes `feed` to the file at `path`. A failure here is reported to
/// the caller, which treats it as non-fatal: the article pages and the
/// index are independently valuable outputs.
pub fn write_feed(feed: &Feed, path: &Path) -> Result<()> {
    let file = File::create(path)?;
    feed.write_to(file)?;
    Ok(())
}

/// Represents the result of a feed operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents a problem creating or writing the feed.
#[derive(Debug)]
pub enum Error {
    /// Returned when there is a generic I/O error.
    Io(std::io::Error),

    /// Returned when there is an Atom-related error.
    Atom(AtomError),
}

impl fmt::Display for Error {
    /// Implements [`fmt::Display`] for [`Error`].
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Io(err) => err.fmt(f),
            Error::Atom(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements [`std::error::Error`] for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            Error::Atom(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for Error {
    /// Converts [`std::io::Error`]s into [`Error`]. This allows us to use
    /// the `?` operator in fallible feed operations.
    fn from(err: std::io::Error) -> Error {
        Error::Io(err)
    }
}

impl From<AtomError> for Error {
    /// Converts [`AtomError`]s into [`Error`]. This allows us to use the
    /// `?` operator in fallible feed operations.
    fn from(err: AtomError) -> Error {
        Error::Atom(err)
    }
}
