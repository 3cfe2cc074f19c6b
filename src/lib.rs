//! The library code for the `stela` static site generator. The build is a
//! one-shot, strictly sequential pipeline:
//!
//! 1. Loading the site manifest ([`crate::manifest`])
//! 2. Resolving each declared article into a parsed document and a rendered
//!    page ([`crate::article`], [`crate::render`])
//! 3. Aggregating the per-article metadata into the section-organized index
//!    page and the Atom feed ([`crate::build`], [`crate::feed`])
//!
//! Of the three, the second step is where partial failure lives: one
//! article failing to parse or render is logged and skipped, and every
//! other article, the index, and the feed are still produced. Only the
//! manifest, the template set, and the output directory are load-bearing
//! enough that their failures abort the run ([`crate::build::Error`]).

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]

pub mod article;
pub mod build;
pub mod feed;
pub mod manifest;
pub mod render;
pub mod url;
pub mod value;
