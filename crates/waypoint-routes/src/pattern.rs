//! Route path patterns

use crate::error::RouteError;
use crate::matched::Params;
use crate::Result;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Matches one segment literally (ASCII case-insensitive)
    Static(String),
    /// `:name` captures one segment
    Param(String),
    /// `*name` captures every remaining segment, possibly none
    CatchAll(String),
}

impl Segment {
    fn score(&self) -> u8 {
        match self {
            Segment::Static(_) => 4,
            Segment::Param(_) => 3,
            Segment::CatchAll(_) => 1,
        }
    }
}

// Sits between a parameter and a catch-all, so `/service` beats `/service/*rest`
const END_SCORE: u8 = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    raw: String,
    segments: Vec<Segment>,
}

impl PathPattern {
    pub fn parse(pattern: &str) -> Result<Self> {
        let invalid = |reason: &str| RouteError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: reason.to_string(),
        };

        let parts: Vec<&str> = pattern.split('/').filter(|s| !s.is_empty()).collect();
        let mut segments = Vec::with_capacity(parts.len());

        for (index, part) in parts.iter().enumerate() {
            let segment = if let Some(name) = part.strip_prefix(':') {
                Segment::Param(param_name(name).ok_or_else(|| invalid("bad parameter name"))?)
            } else if let Some(name) = part.strip_prefix('*') {
                if index + 1 != parts.len() {
                    return Err(invalid("catch-all must be the last segment"));
                }
                Segment::CatchAll(param_name(name).ok_or_else(|| invalid("bad catch-all name"))?)
            } else {
                Segment::Static(part.to_string())
            };
            segments.push(segment);
        }

        let mut names: Vec<&str> = segments
            .iter()
            .filter_map(|s| match s {
                Segment::Param(name) | Segment::CatchAll(name) => Some(name.as_str()),
                Segment::Static(_) => None,
            })
            .collect();
        let total = names.len();
        names.sort_unstable();
        names.dedup();
        if names.len() != total {
            return Err(invalid("duplicate parameter name"));
        }

        Ok(Self {
            raw: format!("/{}", parts.join("/")),
            segments,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Matches every path: a lone catch-all segment.
    pub fn is_total(&self) -> bool {
        matches!(self.segments.as_slice(), [Segment::CatchAll(_)])
    }

    /// Identity used to detect colliding entries; parameter names don't count.
    pub fn shape(&self) -> String {
        let parts: Vec<String> = self
            .segments
            .iter()
            .map(|s| match s {
                Segment::Static(text) => text.to_ascii_lowercase(),
                Segment::Param(_) => ":".to_string(),
                Segment::CatchAll(_) => "*".to_string(),
            })
            .collect();
        format!("/{}", parts.join("/"))
    }

    /// Larger keys are tried first.
    pub fn rank_key(&self) -> Vec<u8> {
        let mut key: Vec<u8> = self.segments.iter().map(Segment::score).collect();
        if !matches!(self.segments.last(), Some(Segment::CatchAll(_))) {
            key.push(END_SCORE);
        }
        key
    }

    pub fn matches(&self, path: &[String]) -> Option<Params> {
        let mut params = Params::new();

        for (index, segment) in self.segments.iter().enumerate() {
            match segment {
                Segment::Static(text) => {
                    if !path.get(index)?.eq_ignore_ascii_case(text) {
                        return None;
                    }
                }
                Segment::Param(name) => {
                    params.insert(name.clone(), path.get(index)?.clone());
                }
                Segment::CatchAll(name) => {
                    params.insert(name.clone(), path.get(index..)?.join("/"));
                    return Some(params);
                }
            }
        }

        (path.len() == self.segments.len()).then_some(params)
    }
}

fn param_name(name: &str) -> Option<String> {
    let valid = !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    valid.then(|| name.to_string())
}
