//! Route pattern compilation.
//!
//! A pattern is a slash-delimited string such as `/items/<id>/edit`. Segments
//! wrapped in angle brackets bind a named parameter, every other segment must
//! match literally. `/` on its own is the root pattern and has no segments.

use {
    crate::{Error, Result},
    regex::Regex,
    std::{fmt, str::FromStr, sync::LazyLock},
};

/// Parameter names double as regex capture group names.
static PARAM_NAME_REGEXP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap());

/// One component of a [`RoutePattern`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    /// Matches exactly this text.
    Literal(String),
    /// Matches any single non-empty segment and binds it under this name.
    Param(String),
}

/// A compiled route pattern.
///
/// Patterns are immutable once compiled. The source pattern string is kept
/// because the route table is keyed by it.
///
/// ```rust
/// use route_conf::{RoutePattern, Segment};
///
/// let pattern: RoutePattern = "/items/<id>".parse().unwrap();
/// assert_eq!(
///     pattern.segments(),
///     &[Segment::Literal("items".into()), Segment::Param("id".into())]
/// );
/// assert_eq!(pattern.to_regex(), "^/items/(?P<id>[^/]+)$");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RoutePattern {
    source: String,
    segments: Vec<Segment>,
}

impl RoutePattern {
    /// The pattern string this was compiled from.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Names of the parameters, in the order they appear.
    pub fn param_names(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Param(name) => Some(name.as_str()),
            Segment::Literal(_) => None,
        })
    }

    /// True when the pattern has no parameters and can only match itself.
    pub fn is_static(&self) -> bool {
        self.param_names().next().is_none()
    }

    /// Anchored regular expression equivalent of this pattern.
    ///
    /// Literal segments are escaped; each parameter becomes a named group
    /// matching one non-empty segment.
    pub fn to_regex(&self) -> String {
        if self.segments.is_empty() {
            return "^/$".to_string();
        }

        let mut regex = String::from("^");
        for segment in &self.segments {
            regex.push('/');
            match segment {
                Segment::Literal(text) => regex.push_str(&regex::escape(text)),
                Segment::Param(name) => {
                    regex.push_str("(?P<");
                    regex.push_str(name);
                    regex.push_str(">[^/]+)");
                }
            }
        }
        regex.push('$');
        regex
    }
}

impl fmt::Display for RoutePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl FromStr for RoutePattern {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self> {
        compile(s)
    }
}

/// Compiles a pattern string into a [`RoutePattern`].
///
/// # Errors
///
/// Returns an [`ErrorKind::MalformedPattern`](crate::ErrorKind::MalformedPattern)
/// error when:
/// - the pattern does not start with `/`
/// - a segment is empty (`//`, or a trailing `/` on anything but the root)
/// - a parameter name is empty, not a valid identifier, or repeated
/// - a literal segment contains `<` or `>`
pub fn compile(pattern: &str) -> Result<RoutePattern> {
    let Some(rest) = pattern.strip_prefix('/') else {
        return Err(Error::malformed_pattern(format!(
            "Route pattern `{pattern}` must start with `/`"
        )));
    };

    let mut segments = Vec::new();
    if !rest.is_empty() {
        for raw in rest.split('/') {
            let segment = parse_segment(pattern, raw, &segments)?;
            segments.push(segment);
        }
    }

    Ok(RoutePattern {
        source: pattern.to_string(),
        segments,
    })
}

/// Compiles `pattern` and returns its anchored regular expression.
pub fn to_regex(pattern: &str) -> Result<String> {
    Ok(compile(pattern)?.to_regex())
}

fn parse_segment(pattern: &str, raw: &str, seen: &[Segment]) -> Result<Segment> {
    if raw.is_empty() {
        return Err(Error::malformed_pattern(format!(
            "Route pattern `{pattern}` contains an empty segment"
        )));
    }

    if let Some(name) = raw.strip_prefix('<').and_then(|s| s.strip_suffix('>')) {
        if name.is_empty() {
            return Err(Error::malformed_pattern(format!(
                "Route pattern `{pattern}` has a parameter with an empty name"
            )));
        }
        if !PARAM_NAME_REGEXP.is_match(name) {
            return Err(Error::malformed_pattern(format!(
                "Route pattern `{pattern}` has an invalid parameter name `{name}`. \
                 Use letters, digits and underscores, not starting with a digit."
            )));
        }
        let duplicate = seen
            .iter()
            .any(|segment| matches!(segment, Segment::Param(existing) if existing == name));
        if duplicate {
            return Err(Error::malformed_pattern(format!(
                "Route pattern `{pattern}` binds parameter `{name}` more than once"
            )));
        }
        return Ok(Segment::Param(name.to_string()));
    }

    if raw.contains(['<', '>']) {
        return Err(Error::malformed_pattern(format!(
            "Route pattern `{pattern}` has a stray angle bracket in segment `{raw}`"
        )));
    }

    Ok(Segment::Literal(raw.to_string()))
}
