// Path expression templates with {{name}} placeholder substitution

use std::collections::HashMap;

/// A parsed path expression: literal runs interleaved with named placeholders.
#[derive(Debug, Clone, PartialEq)]
pub struct PathTemplate {
    parts: Vec<PathPart>,
}

#[derive(Debug, Clone, PartialEq)]
enum PathPart {
    Literal(String),
    Placeholder(String),
}

impl PathTemplate {
    /// Parse a template string. Parsing never fails: a `{{` without a
    /// matching `}}` is kept as literal text, and single braces pass
    /// through untouched.
    pub fn parse(template: &str) -> Self {
        let mut parts = Vec::new();
        let mut rest = template;

        loop {
            match rest.find("{{") {
                Some(open) => {
                    let after_open = &rest[open + 2..];
                    match after_open.find("}}") {
                        Some(close) => {
                            if open > 0 {
                                parts.push(PathPart::Literal(rest[..open].to_string()));
                            }
                            // Whitespace inside the braces is not significant
                            let name = after_open[..close].trim().to_string();
                            parts.push(PathPart::Placeholder(name));
                            rest = &after_open[close + 2..];
                        }
                        None => {
                            // Unterminated placeholder - treat the rest as literal
                            parts.push(PathPart::Literal(rest.to_string()));
                            break;
                        }
                    }
                }
                None => {
                    if !rest.is_empty() {
                        parts.push(PathPart::Literal(rest.to_string()));
                    }
                    break;
                }
            }
        }

        Self { parts }
    }

    /// Substitute parameters into the template.
    ///
    /// Placeholders with no matching parameter render as the empty string;
    /// parameters with no matching placeholder are ignored. Substitution is
    /// literal, with no quoting or escaping of values.
    pub fn render(&self, parameters: &HashMap<String, String>) -> String {
        let mut rendered = String::new();

        for part in &self.parts {
            match part {
                PathPart::Literal(text) => rendered.push_str(text),
                PathPart::Placeholder(name) => {
                    if let Some(value) = parameters.get(name) {
                        rendered.push_str(value);
                    }
                }
            }
        }

        rendered
    }

    /// Names of all placeholders, in order of appearance.
    pub fn placeholder_names(&self) -> Vec<&str> {
        self.parts
            .iter()
            .filter_map(|part| match part {
                PathPart::Placeholder(name) => Some(name.as_str()),
                PathPart::Literal(_) => None,
            })
            .collect()
    }
}

/// Parse and render in one step.
pub fn render_path(template: &str, parameters: &HashMap<String, String>) -> String {
    PathTemplate::parse(template).render(parameters)
}
