//! Splitting Hermes frame names into function and file parts.
//!
//! Hermes names JS frames `function(file:line:column)`; native and synthetic
//! frames carry a bare name. Parsing is total: every input yields a
//! [`FrameName`], never an error.

use super::schema::FunctionName;
use crate::utils::config::HERMES_ROOT_FRAME_NAME;

/// Function and file components of a frame name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameName {
    pub function: FunctionName,
    pub file: Option<String>,
}

impl FrameName {
    fn anonymous() -> Self {
        Self {
            function: FunctionName::Anonymous,
            file: None,
        }
    }
}

/// Parse a Hermes frame name
///
/// **Public** - used by the frame table builder
///
/// # Rules
/// * `""`, whitespace or `[root]` → anonymous, no file
/// * `render(app.js:10:4)` → `render` in `app.js`
/// * `(app.js:10:4)` → anonymous in `app.js`
/// * `(garbage collector)` → `(garbage collector)`, no file
/// * `[Native] fetch` → `[Native] fetch`, no file
/// * `render(C:\x (x86)\app.js:1:2)` → `render` in `C:\x (x86)\app.js`
/// * `render(app.js` (no closing parenthesis) → `render` in `app.js`
/// * `()` → anonymous, no file
pub fn parse_frame_name(name: &str) -> FrameName {
    let trimmed = name.trim();
    if trimmed.is_empty() || trimmed == HERMES_ROOT_FRAME_NAME {
        return FrameName::anonymous();
    }

    let Some((function, rest)) = trimmed.split_once('(') else {
        return FrameName {
            function: FunctionName::new(trimmed),
            file: None,
        };
    };

    // Inner parentheses belong to the location, which runs to the last `)`
    let location = rest.rfind(')').map_or(rest, |end| &rest[..end]);

    let (file, has_position) = strip_position(location);
    if function.trim().is_empty() && !has_position && file.is_some() {
        // Synthetic frames such as `(garbage collector)` or `(program)`
        return FrameName {
            function: FunctionName::new(trimmed),
            file: None,
        };
    }

    FrameName {
        function: FunctionName::new(function),
        file,
    }
}

/// Drop a trailing `:line` or `:line:column` from a location
///
/// Returns the remaining file, if any, and whether a position was removed.
fn strip_position(location: &str) -> (Option<String>, bool) {
    let mut file = location.trim();
    let mut has_position = false;
    for _ in 0..2 {
        match file.rsplit_once(':') {
            Some((rest, digits)) if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) => {
                file = rest;
                has_position = true;
            }
            _ => break,
        }
    }

    let file = file.trim();
    ((!file.is_empty()).then(|| file.to_string()), has_position)
}
