//! Descriptor-list parsing.
//!
//! A descriptor list is a comma-separated string attached to each swap target,
//! in the same spirit as an HTML `srcset`:
//!
//! ```text
//! cat_320.jpg 320w, cat_320_2x.jpg 320w 2x, cat_768.jpg 768w 1x
//! ```
//!
//! Each fragment is a URL followed by zero or more whitespace-separated size
//! tokens:
//!
//! | Token | Meaning | Default when absent |
//! |---|---|---|
//! | `<integer>w` | breakpoint width in px | unbounded |
//! | `<integer>h` | height in px | unbounded |
//! | `<float>x` | pixel ratio | `1.0` |
//!
//! ## Error Accumulation
//!
//! A malformed size token does not abort the fragment. Every bad token is
//! collected into a [`ParseError`] and parsing carries on with the rest, so the
//! caller sees all problems in one pass. The partially parsed descriptor is
//! kept alongside the errors in [`FragmentError`], and [`partition`] still
//! offers it as a candidate: `"bad.jpg 480w 30q"` serves breakpoint 480.
//!
//! All functions here are pure; the grammar lives in [`is_url_char`] and the
//! token suffix constants.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

const WIDTH_SUFFIX: char = 'w';
const HEIGHT_SUFFIX: char = 'h';
const RATIO_SUFFIX: char = 'x';

/// One parsed entry of a descriptor list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Descriptor {
    pub url: String,
    /// Breakpoint width in px. `None` means unbounded.
    pub width: Option<u32>,
    /// Height in px. `None` means unbounded.
    pub height: Option<u32>,
    /// Always finite and positive.
    pub pixel_ratio: f64,
}

impl Descriptor {
    /// A descriptor with only a URL: unbounded width/height, ratio `1.0`.
    pub fn bare(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            width: None,
            height: None,
            pixel_ratio: 1.0,
        }
    }
}

impl fmt::Display for Descriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.url)?;
        if let Some(w) = self.width {
            write!(f, " {w}w")?;
        }
        if let Some(h) = self.height {
            write!(f, " {h}h")?;
        }
        write!(f, " {}x", self.pixel_ratio)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ParseErrorKind {
    InvalidDescriptorToken,
}

/// A single size token that matched none of the `w`/`h`/`x` forms.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[error("invalid descriptor token \"{raw_token}\"")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub raw_token: String,
}

impl ParseError {
    fn invalid(token: &str) -> Self {
        Self {
            kind: ParseErrorKind::InvalidDescriptorToken,
            raw_token: token.to_string(),
        }
    }
}

/// A fragment that contained at least one invalid token.
///
/// `partial` holds whatever the valid tokens contributed.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("fragment \"{}\" has {} invalid token(s)", partial.url, errors.len())]
pub struct FragmentError {
    pub partial: Descriptor,
    pub errors: Vec<ParseError>,
}

/// Characters allowed in the URL token: `[-a-zA-Z0-9@:%_+.~#?&/=]`.
pub fn is_url_char(c: char) -> bool {
    c.is_ascii_alphanumeric()
        || matches!(
            c,
            '-' | '@' | ':' | '%' | '_' | '+' | '.' | '~' | '#' | '?' | '&' | '/' | '='
        )
}

/// Parse one descriptor fragment such as `"img.jpg 320w 2x"`.
///
/// - `"img.jpg 320w 2x"` → url=`img.jpg`, width=320, height=∞, ratio=2
/// - `"img.jpg"` → url=`img.jpg`, width=∞, height=∞, ratio=1
/// - `"img.jpg 30q"` → error with raw token `30q`
///
/// Repeated token kinds overwrite earlier ones.
pub fn parse_fragment(text: &str) -> Result<Descriptor, FragmentError> {
    let trimmed = text.trim();
    let url_end = trimmed
        .char_indices()
        .find(|&(_, c)| !is_url_char(c))
        .map(|(i, _)| i)
        .unwrap_or(trimmed.len());
    let (url, rest) = trimmed.split_at(url_end);

    let mut descriptor = Descriptor::bare(url);
    let mut errors = Vec::new();

    for token in rest.split_whitespace() {
        match parse_size_token(token) {
            Some(SizeToken::Width(w)) => descriptor.width = Some(w),
            Some(SizeToken::Height(h)) => descriptor.height = Some(h),
            Some(SizeToken::Ratio(x)) => descriptor.pixel_ratio = x,
            None => errors.push(ParseError::invalid(token)),
        }
    }

    if errors.is_empty() {
        Ok(descriptor)
    } else {
        Err(FragmentError {
            partial: descriptor,
            errors,
        })
    }
}

/// Parse a full descriptor list, one result per non-empty fragment, in order.
pub fn parse_list(text: &str) -> Vec<Result<Descriptor, FragmentError>> {
    text.split(',')
        .filter(|fragment| !fragment.trim().is_empty())
        .map(parse_fragment)
        .collect()
}

/// Split parse results into usable descriptors and every accumulated error.
///
/// A fragment with invalid tokens contributes its partial descriptor, built
/// from the tokens that did parse.
pub fn partition(
    results: Vec<Result<Descriptor, FragmentError>>,
) -> (Vec<Descriptor>, Vec<ParseError>) {
    let mut descriptors = Vec::new();
    let mut errors = Vec::new();
    for result in results {
        match result {
            Ok(d) => descriptors.push(d),
            Err(e) => {
                descriptors.push(e.partial);
                errors.extend(e.errors);
            }
        }
    }
    (descriptors, errors)
}

enum SizeToken {
    Width(u32),
    Height(u32),
    Ratio(f64),
}

fn parse_size_token(token: &str) -> Option<SizeToken> {
    let suffix = token.chars().next_back()?;
    let value = &token[..token.len() - suffix.len_utf8()];
    match suffix {
        WIDTH_SUFFIX => parse_integer(value).map(SizeToken::Width),
        HEIGHT_SUFFIX => parse_integer(value).map(SizeToken::Height),
        RATIO_SUFFIX => parse_ratio(value).map(SizeToken::Ratio),
        _ => None,
    }
}

fn parse_integer(value: &str) -> Option<u32> {
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    value.parse().ok()
}

fn parse_ratio(value: &str) -> Option<f64> {
    let digits = value.bytes().filter(u8::is_ascii_digit).count();
    let dots = value.bytes().filter(|&b| b == b'.').count();
    if digits == 0 || dots > 1 || digits + dots != value.len() {
        return None;
    }
    let ratio: f64 = value.parse().ok()?;
    (ratio.is_finite() && ratio > 0.0).then_some(ratio)
}
