//! Rendering-agnostic view trees

use std::fmt;

/// What an instance displays
///
/// Views are plain data; a front end decides how to draw them. The
/// [`Display`](fmt::Display) impl gives a plain-text rendering.
#[derive(Debug, Clone, PartialEq)]
pub enum View {
    /// A block of text
    Text(String),
    /// A verification status line
    Status {
        /// `None` until a verdict has been submitted
        verdict: Option<bool>,
        label: String,
    },
    /// Indicator for a cell whose app type is not available
    Unsupported { type_name: String },
    /// Data-integrity warning shown above the app's own view
    Warning { message: String, body: Box<View> },
    /// Views stacked vertically
    Column(Vec<View>),
}

impl View {
    /// Wrap a view with a warning banner
    pub fn with_warning(self, message: impl Into<String>) -> Self {
        View::Warning {
            message: message.into(),
            body: Box::new(self),
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            View::Text(text) => f.write_str(text),
            View::Status { verdict, label } => {
                let mark = match verdict {
                    Some(true) => "[proved]",
                    Some(false) => "[refuted]",
                    None => "[unchecked]",
                };
                write!(f, "{} {}", mark, label)
            }
            View::Unsupported { type_name } => write!(f, "(!) Unsupported app type: {}", type_name),
            View::Warning { message, body } => write!(f, "(!) {}\n{}", message, body),
            View::Column(views) => {
                for (i, view) in views.iter().enumerate() {
                    if i > 0 {
                        writeln!(f)?;
                    }
                    write!(f, "{}", view)?;
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_rendering() {
        let view = View::Column(vec![
            View::Text("p -> q".into()),
            View::Status {
                verdict: Some(true),
                label: "checked".into(),
            },
        ])
        .with_warning("payload was reset");

        assert_eq!(
            view.to_string(),
            "(!) payload was reset\np -> q\n[proved] checked"
        );
    }

    #[test]
    fn test_unsupported_rendering() {
        let view = View::Unsupported {
            type_name: "quiz".into(),
        };
        assert_eq!(view.to_string(), "(!) Unsupported app type: quiz");
    }
}
