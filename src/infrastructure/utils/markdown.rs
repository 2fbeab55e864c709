use std::path::Path;

use ammonia::{Builder, UrlRelative};
use derive_more::Display;
use pulldown_cmark::{html, Options, Parser};
use serde::de::DeserializeOwned;
use tokio::fs;

const FRONT_MATTER_FENCE: &str = "---";

/// Converts Markdown content to sanitized HTML to prevent XSS attacks.
pub fn safe_markdown_to_html(markdown: &str) -> String {
    let options = Options::all();
    let parser = Parser::new_ext(markdown, options);

    let mut raw_html = String::with_capacity(markdown.len() * 2);
    html::push_html(&mut raw_html, parser);

    sanitize_markdown_content(&raw_html)
}

/// Sanitizes rendered HTML, removing anything unsafe.
pub fn sanitize_markdown_content(content: &str) -> String {
    Builder::default()
        .link_rel(Some("nofollow noopener noreferrer"))
        .url_relative(UrlRelative::PassThrough)
        .clean(content)
        .to_string()
}

/// Escapes user-supplied text for inclusion in an HTML document.
pub fn escape_html(text: &str) -> String {
    ammonia::clean_text(text)
}

/// A content file split into its metadata header and body.
#[derive(Debug, PartialEq)]
pub struct FrontMatterDocument<M> {
    pub metadata: M,
    pub body: String,
}

/// Splits a `---`-fenced YAML header from the body.
///
/// A document without a header yields `None` and the untouched body.
pub fn split_front_matter(source: &str) -> Result<(Option<&str>, &str), MarkdownError> {
    let source = source.strip_prefix('\u{feff}').unwrap_or(source);

    let mut lines = source.split_inclusive('\n');
    match lines.next() {
        Some(first) if first.trim_end() == FRONT_MATTER_FENCE => {}
        _ => return Ok((None, source)),
    }

    let header_start = source.find('\n').map_or(source.len(), |i| i + 1);
    let mut offset = header_start;

    for line in lines {
        if line.trim_end() == FRONT_MATTER_FENCE {
            let header = &source[header_start..offset];
            let body = &source[offset + line.len()..];
            return Ok((Some(header), body));
        }
        offset += line.len();
    }

    Err(MarkdownError::UnterminatedFrontMatter)
}

/// Parses the YAML header into `M`; a missing header deserializes from an empty mapping.
pub fn parse_front_matter<M>(source: &str) -> Result<FrontMatterDocument<M>, MarkdownError>
where
    M: DeserializeOwned + Default,
{
    let (header, body) = split_front_matter(source)?;

    let metadata = match header.map(str::trim) {
        Some(yaml) if !yaml.is_empty() => serde_yaml::from_str(yaml)
            .map_err(|e| MarkdownError::InvalidFrontMatter(e.to_string()))?,
        _ => M::default(),
    };

    Ok(FrontMatterDocument {
        metadata,
        body: body.to_string(),
    })
}

/// Reads a content file and parses its front matter.
pub async fn read_front_matter_file<M>(path: &Path) -> Result<FrontMatterDocument<M>, MarkdownError>
where
    M: DeserializeOwned + Default,
{
    let content = fs::read_to_string(path)
        .await
        .map_err(|e| MarkdownError::IoError(e.to_string()))?;

    if content.trim().is_empty() {
        return Err(MarkdownError::EmptyFile);
    }

    parse_front_matter(&content)
}

/// All errors related to content file handling.
#[derive(Debug, Display, PartialEq)]
pub enum MarkdownError {
    #[display("File is empty.")]
    EmptyFile,

    #[display("Failed to read file: {_0}")]
    IoError(String),

    #[display("Front matter is not closed with '---'.")]
    UnterminatedFrontMatter,

    #[display("Invalid front matter: {_0}")]
    InvalidFrontMatter(String),
}

impl std::error::Error for MarkdownError {}
