use std::fmt;

use regex::Regex;

use super::error::RegistrationError;

/// A glob over routing identifiers.
///
/// `*` matches any run of characters except `.`, so one star spans a single
/// dot-separated segment. Every other character is literal and the whole
/// identifier has to match.
///
/// ```
/// use switchyard::RoutePattern;
///
/// let pattern = RoutePattern::compile("test.*.event").unwrap();
/// assert!(pattern.matches("test.foo.event"));
/// assert!(!pattern.matches("test.foo.bar.event"));
/// ```
#[derive(Clone)]
pub struct RoutePattern {
    glob: String,
    regex: Regex,
}

impl RoutePattern {
    pub fn compile(glob: &str) -> Result<Self, RegistrationError> {
        if glob.is_empty() {
            return Err(RegistrationError::EmptyRoute);
        }
        let regex =
            Regex::new(&glob_to_regex(glob)).map_err(|source| RegistrationError::InvalidPattern {
                pattern: glob.to_string(),
                source,
            })?;
        Ok(Self {
            glob: glob.to_string(),
            regex,
        })
    }

    pub fn matches(&self, id: &str) -> bool {
        self.regex.is_match(id)
    }

    pub fn as_str(&self) -> &str {
        &self.glob
    }
}

impl fmt::Debug for RoutePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RoutePattern").field(&self.glob).finish()
    }
}

fn glob_to_regex(glob: &str) -> String {
    let body = glob
        .split('*')
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join("[^.]*");
    format!("^{}$", body)
}
