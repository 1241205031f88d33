//! Placeholder templates for playlist and post text
//!
//! Templates use `{name}` placeholders. `{{` and `}}` produce literal braces.
//! Placeholder names are checked when configuration is loaded, so rendering
//! a validated template cannot fail on an unknown name.

use crate::{Error, Result};

/// Placeholders accepted by playlist title and description templates
pub const PLAYLIST_PLACEHOLDERS: &[&str] = &["month", "day", "date"];

/// Placeholders accepted by post title and body templates
pub const POST_PLACEHOLDERS: &[&str] = &["month", "day", "date", "video_list", "playlist_url"];

#[derive(Debug, PartialEq, Eq)]
enum Segment<'a> {
    Literal(&'a str),
    Placeholder(&'a str),
}

fn segments(template: &str) -> Result<Vec<Segment<'_>>> {
    let mut out = Vec::new();
    let mut literal_start = 0;
    let mut chars = template.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        match c {
            '{' | '}' if chars.peek().map(|&(_, next)| next) == Some(c) => {
                // Escaped brace: keep one of the pair
                out.push(Segment::Literal(&template[literal_start..i]));
                out.push(Segment::Literal(&template[i..i + 1]));
                chars.next();
                literal_start = i + 2;
            }
            '{' => {
                let rest = &template[i + 1..];
                let end = rest.find('}').ok_or_else(|| {
                    Error::Config(format!("Unclosed placeholder in template {:?}", template))
                })?;
                let name = &rest[..end];
                if name.is_empty() || name.contains('{') {
                    return Err(Error::Config(format!(
                        "Malformed placeholder in template {:?}",
                        template
                    )));
                }

                out.push(Segment::Literal(&template[literal_start..i]));
                out.push(Segment::Placeholder(name));

                let close = i + 1 + end;
                while chars.peek().is_some_and(|&(j, _)| j <= close) {
                    chars.next();
                }
                literal_start = close + 1;
            }
            '}' => {
                return Err(Error::Config(format!(
                    "Unmatched '}}' in template {:?}",
                    template
                )));
            }
            _ => {}
        }
    }

    out.push(Segment::Literal(&template[literal_start..]));
    Ok(out)
}

/// Check that a template is well formed and only uses `allowed` placeholders
pub fn validate(template: &str, allowed: &[&str]) -> Result<()> {
    for segment in segments(template)? {
        if let Segment::Placeholder(name) = segment {
            if !allowed.contains(&name) {
                return Err(Error::Config(format!(
                    "Unknown placeholder {{{}}} in template {:?} (allowed: {})",
                    name,
                    template,
                    allowed.join(", ")
                )));
            }
        }
    }
    Ok(())
}

/// Substitute placeholder values into a template
pub fn render(template: &str, values: &[(&str, &str)]) -> Result<String> {
    let mut rendered = String::with_capacity(template.len());

    for segment in segments(template)? {
        match segment {
            Segment::Literal(text) => rendered.push_str(text),
            Segment::Placeholder(name) => {
                let value = values
                    .iter()
                    .find(|(key, _)| *key == name)
                    .map(|(_, value)| *value)
                    .ok_or_else(|| {
                        Error::InvalidInput(format!("No value for placeholder {{{}}}", name))
                    })?;
                rendered.push_str(value);
            }
        }
    }

    Ok(rendered)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_substitutes_placeholders() {
        let out = render(
            "On This Day: {month} {day}",
            &[("month", "March"), ("day", "05")],
        )
        .unwrap();
        assert_eq!(out, "On This Day: March 05");
    }

    #[test]
    fn test_render_repeated_placeholder() {
        let out = render("{date} / {date}", &[("date", "March 05")]).unwrap();
        assert_eq!(out, "March 05 / March 05");
    }

    #[test]
    fn test_render_escaped_braces() {
        let out = render("{{literal}} {day}", &[("day", "01")]).unwrap();
        assert_eq!(out, "{literal} 01");
    }

    #[test]
    fn test_render_multibyte_text() {
        let out = render("Día — {month}", &[("month", "Mayo")]).unwrap();
        assert_eq!(out, "Día — Mayo");
    }

    #[test]
    fn test_render_missing_value_is_error() {
        assert!(render("{video_list}", &[("day", "01")]).is_err());
    }

    #[test]
    fn test_validate_accepts_known_placeholders() {
        assert!(validate("{month} {day} {date}", PLAYLIST_PLACEHOLDERS).is_ok());
        assert!(validate("{video_list}\n{playlist_url}", POST_PLACEHOLDERS).is_ok());
        assert!(validate("no placeholders at all", PLAYLIST_PLACEHOLDERS).is_ok());
    }

    #[test]
    fn test_validate_rejects_unknown_placeholder() {
        let err = validate("{video_list}", PLAYLIST_PLACEHOLDERS).unwrap_err();
        assert!(err.to_string().contains("video_list"));
    }

    #[test]
    fn test_validate_rejects_malformed_templates() {
        assert!(validate("{month", PLAYLIST_PLACEHOLDERS).is_err());
        assert!(validate("month}", PLAYLIST_PLACEHOLDERS).is_err());
        assert!(validate("{}", PLAYLIST_PLACEHOLDERS).is_err());
    }
}
