//! Joins the site's canonical href with relative output paths to form the
//! absolute links that appear in the Atom feed.

use url::{ParseError, Url};

/// Joins `relative` onto `base`, keeping every path segment of `base`. Plain
/// [`Url::join`] treats a base without a trailing slash as ending in a file
/// name and drops it (e.g. `https://example.com/blog` + `articles/foo.html`
/// would yield `https://example.com/articles/foo.html`), so the base path is
/// normalized to end in a slash before joining.
pub fn join_path(base: &str, relative: &str) -> Result<String, ParseError> {
    let mut base = Url::parse(base)?;
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    Ok(base.join(relative)?.to_string())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_join_path_bare_host() -> Result<(), ParseError> {
        fixture(
            "https://example.com/articles/foo.html",
            "https://example.com",
            "articles/foo.html",
        )
    }

    #[test]
    fn test_join_path_keeps_base_segments() -> Result<(), ParseError> {
        fixture(
            "https://example.com/blog/articles/foo.html",
            "https://example.com/blog",
            "articles/foo.html",
        )
    }

    #[test]
    fn test_join_path_trailing_slash() -> Result<(), ParseError> {
        fixture(
            "https://example.com/blog/articles/foo.html",
            "https://example.com/blog/",
            "articles/foo.html",
        )
    }

    #[test]
    fn test_join_path_no_double_slash() -> Result<(), ParseError> {
        assert!(!join_path("https://example.com/blog/", "articles/foo.html")?
            .contains("blog//"));
        Ok(())
    }

    #[test]
    fn test_join_path_invalid_base() {
        assert!(join_path("not a url", "articles/foo.html").is_err());
    }

    fn fixture(wanted: &str, base: &str, relative: &str) -> Result<(), ParseError> {
        assert_eq!(wanted, join_path(base, relative)?);
        Ok(())
    }
}
