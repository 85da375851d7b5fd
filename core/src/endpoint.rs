//! Declarative operation descriptors used by the facades.

use std::fmt::{self, Display};

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};

use crate::error::ApiError;
use crate::http::HttpMethod;

/// Bytes escaped inside a single path segment: the WHATWG path set plus `/`
/// and `%`, so a parameter can never add, remove or alter segments.
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}')
    .add(b'/')
    .add(b'%')
    .add(b'\\');

/// A fixed method plus a path template relative to the base URL.
///
/// Each `{}` in `template` is a positional placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoint {
    pub method: HttpMethod,
    pub template: &'static str,
}

impl Endpoint {
    pub const fn new(method: HttpMethod, template: &'static str) -> Self {
        Self { method, template }
    }

    /// Substitute `params` into the template's placeholders, in order, each
    /// percent-encoded as one path segment.
    ///
    /// A missing param, or one that is empty, `.` or `..`, is an error since
    /// it would address a different resource. Surplus params are ignored.
    pub fn path(&self, params: &[&(dyn Display + Sync)]) -> Result<String, ApiError> {
        let mut out = String::with_capacity(self.template.len() + 8);
        let mut params = params.iter();
        let mut pieces = self.template.split("{}").peekable();
        while let Some(piece) = pieces.next() {
            out.push_str(piece);
            if pieces.peek().is_none() {
                break;
            }
            let param = params
                .next()
                .ok_or_else(|| ApiError::transport(format!("missing path parameter for {self}")))?
                .to_string();
            if matches!(param.as_str(), "" | "." | "..") {
                return Err(ApiError::transport(format!(
                    "invalid path parameter {param:?} for {self}"
                )));
            }
            out.extend(utf8_percent_encode(&param, SEGMENT));
        }
        Ok(out)
    }
}

impl Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.template)
    }
}
