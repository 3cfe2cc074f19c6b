//! Conversions from the crate's data types into [`gtmpl_value::Value`]s so
//! they can be rendered in templates. Timestamps are formatted here; the
//! templates only ever see strings.

use crate::article::{ArticleRecord, Document};
use crate::manifest::SiteManifest;
use crate::render::SectionRecord;
use gtmpl_value::Value;
use std::collections::HashMap;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Converts the site metadata into a [`Value`] with fields `title`,
/// `author`, `description`, and `href`.
pub fn site(site: &SiteManifest) -> Value {
    let mut m: HashMap<String, Value> = HashMap::new();
    m.insert("title".to_owned(), (&site.title).into());
    m.insert("author".to_owned(), (&site.author).into());
    m.insert("description".to_owned(), (&site.description).into());
    m.insert("href".to_owned(), (&site.href).into());
    Value::Object(m)
}

impl From<&Document> for Value {
    /// Converts [`Document`]s into [`Value`]s for the article template.
    fn from(document: &Document) -> Value {
        let mut m: HashMap<String, Value> = HashMap::new();
        m.insert("title".to_owned(), (&document.title).into());
        m.insert("summary".to_owned(), (&document.summary).into());
        m.insert(
            "date".to_owned(),
            Value::String(
                document.published.format(DATE_FORMAT).to_string(),
            ),
        );
        m.insert("body".to_owned(), (&document.body).into());
        Value::Object(m)
    }
}

impl From<&ArticleRecord> for Value {
    /// Converts [`ArticleRecord`]s into [`Value`]s for the index template.
    fn from(record: &ArticleRecord) -> Value {
        let mut m: HashMap<String, Value> = HashMap::new();
        m.insert("url".to_owned(), (&record.url).into());
        m.insert("title".to_owned(), (&record.title).into());
        m.insert("summary".to_owned(), (&record.summary).into());
        m.insert(
            "date".to_owned(),
            Value::String(record.published.format(DATE_FORMAT).to_string()),
        );
        Value::Object(m)
    }
}

impl From<&SectionRecord> for Value {
    /// Converts [`SectionRecord`]s into [`Value`]s for the index template.
    fn from(section: &SectionRecord) -> Value {
        let mut m: HashMap<String, Value> = HashMap::new();
        m.insert("name".to_owned(), (&section.name).into());
        m.insert(
            "articles".to_owned(),
            Value::Array(section.articles.iter().map(Value::from).collect()),
        );
        Value::Object(m)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono::{FixedOffset, TimeZone};

    #[test]
    fn test_section_record_to_value() {
        let section = SectionRecord {
            name: "essays".to_owned(),
            articles: vec![ArticleRecord {
                url: "articles/foo.html".to_owned(),
                title: "Foo".to_owned(),
                summary: "<p>about foo</p>".to_owned(),
                published: FixedOffset::east(0)
                    .ymd(2021, 4, 16)
                    .and_hms(0, 0, 0),
            }],
        };

        match Value::from(&section) {
            Value::Object(m) => {
                assert_eq!(m["name"], Value::from("essays"));
                match &m["articles"] {
                    Value::Array(articles) => {
                        assert_eq!(1, articles.len());
                        match &articles[0] {
                            Value::Object(article) => {
                                assert_eq!(
                                    article["date"],
                                    Value::from("2021-04-16")
                                );
                                assert_eq!(
                                    article["url"],
                                    Value::from("articles/foo.html")
                                );
                            }
                            other => panic!("wanted object, got {:?}", other),
                        }
                    }
                    other => panic!("wanted array, got {:?}", other),
                }
            }
            other => panic!("wanted object, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_section_to_value() {
        let section = SectionRecord {
            name: "notes".to_owned(),
            articles: Vec::new(),
        };
        match Value::from(&section) {
            Value::Object(m) => {
                assert_eq!(m["articles"], Value::Array(Vec::new()))
            }
            other => panic!("wanted object, got {:?}", other),
        }
    }
}
