//! Line-based template parser.
//!
//! Parsing happens in two passes over the template's lines:
//!
//! 1. Tag matching: standalone `<name>` / `</name>` lines are paired with a
//!    stack. Only innermost pairs become declaration blocks; any pair that
//!    encloses a declaration, and any tag left unpaired, stays literal text.
//! 2. Segmenting: the lines are cut into literal text and block segments, and
//!    block bodies have their `{% deprecated=... %}` markers extracted.

use crate::error::TemplateError;

/// A parsed piece of a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Segment {
    Text(String),
    Block(Block),
}

/// A declaration block: a body repeated once per bound item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Block {
    pub name: String,
    pub compact: bool,
    pub lines: Vec<BodyLine>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct BodyLine {
    pub text: String,
    pub visibility: Visibility,
}

/// Which items a body line is rendered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Visibility {
    Always,
    DeprecatedOnly,
    ActiveOnly,
}

impl Visibility {
    pub fn shows(self, deprecated: bool) -> bool {
        match self {
            Visibility::Always => true,
            Visibility::DeprecatedOnly => deprecated,
            Visibility::ActiveOnly => !deprecated,
        }
    }
}

enum LineKind<'a> {
    Open { name: &'a str, compact: bool },
    Close { name: &'a str },
    Other,
}

struct Frame<'a> {
    name: &'a str,
    compact: bool,
    line: usize,
    encloses_declaration: bool,
}

struct Declaration {
    name: String,
    compact: bool,
    open_line: usize,
    close_line: usize,
}

pub(crate) fn parse_segments(source: &str, origin: &str) -> Result<Vec<Segment>, TemplateError> {
    let lines: Vec<&str> = source.split_inclusive('\n').collect();
    let mut declarations = match_declarations(&lines);

    if declarations.is_empty() {
        return Err(TemplateError::NoDeclarations {
            origin: origin.to_string(),
        });
    }
    declarations.sort_by_key(|d| d.open_line);

    let mut segments = Vec::new();
    let mut text = String::new();
    let mut next = declarations.iter().peekable();
    let mut index = 0;

    while index < lines.len() {
        match next.peek() {
            Some(decl) if decl.open_line == index => {
                if !text.is_empty() {
                    segments.push(Segment::Text(std::mem::take(&mut text)));
                }
                let body = lines[decl.open_line + 1..decl.close_line]
                    .iter()
                    .map(|line| parse_body_line(line))
                    .collect();
                segments.push(Segment::Block(Block {
                    name: decl.name.clone(),
                    compact: decl.compact,
                    lines: body,
                }));
                index = decl.close_line + 1;
                next.next();
            }
            _ => {
                text.push_str(lines[index]);
                index += 1;
            }
        }
    }

    if !text.is_empty() {
        segments.push(Segment::Text(text));
    }

    Ok(segments)
}

fn match_declarations(lines: &[&str]) -> Vec<Declaration> {
    let mut stack: Vec<Frame<'_>> = Vec::new();
    let mut declarations = Vec::new();

    for (index, line) in lines.iter().enumerate() {
        match classify(line) {
            LineKind::Open { name, compact } => stack.push(Frame {
                name,
                compact,
                line: index,
                encloses_declaration: false,
            }),
            LineKind::Close { name } => {
                let Some(position) = stack.iter().rposition(|frame| frame.name == name) else {
                    continue;
                };
                // Frames opened after the match were never closed: literal text
                stack.truncate(position + 1);
                let Some(frame) = stack.pop() else {
                    continue;
                };
                if !frame.encloses_declaration {
                    declarations.push(Declaration {
                        name: frame.name.to_string(),
                        compact: frame.compact,
                        open_line: frame.line,
                        close_line: index,
                    });
                    for outer in stack.iter_mut() {
                        outer.encloses_declaration = true;
                    }
                }
            }
            LineKind::Other => {}
        }
    }

    declarations
}

fn classify(line: &str) -> LineKind<'_> {
    let trimmed = line.trim();
    let Some(inner) = trimmed
        .strip_prefix('<')
        .and_then(|rest| rest.strip_suffix('>'))
    else {
        return LineKind::Other;
    };

    if let Some(name) = inner.strip_prefix('/') {
        return if is_tag_name(name) {
            LineKind::Close { name }
        } else {
            LineKind::Other
        };
    }

    let mut words = inner.split_whitespace();
    let Some(name) = words.next() else {
        return LineKind::Other;
    };
    if !is_tag_name(name) || !inner.starts_with(name) {
        return LineKind::Other;
    }
    match (words.next(), words.next()) {
        (None, _) => LineKind::Open {
            name,
            compact: false,
        },
        (Some("compact"), None) => LineKind::Open {
            name,
            compact: true,
        },
        _ => LineKind::Other,
    }
}

fn is_tag_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        }
        _ => false,
    }
}

fn parse_body_line(line: &str) -> BodyLine {
    let content = line.trim_end_matches(['\n', '\r']);
    let ending = &line[content.len()..];

    let Some((before, visibility, after)) = find_marker(content) else {
        return BodyLine {
            text: line.to_string(),
            visibility: Visibility::Always,
        };
    };

    let content = if after.trim().is_empty() {
        before.trim_end().to_string()
    } else {
        format!("{}{}", before, after)
    };

    BodyLine {
        text: format!("{}{}", content, ending),
        visibility,
    }
}

/// Locates the first `{% deprecated=... %}` marker in a line.
fn find_marker(content: &str) -> Option<(&str, Visibility, &str)> {
    let mut offset = 0;
    while let Some(start) = content[offset..].find("{%") {
        let start = offset + start;
        let end = start + 2 + content[start + 2..].find("%}")?;
        let condition: String = content[start + 2..end]
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();
        let visibility = match condition.as_str() {
            "deprecated=true" => Some(Visibility::DeprecatedOnly),
            "deprecated=false" => Some(Visibility::ActiveOnly),
            _ => None,
        };
        if let Some(visibility) = visibility {
            return Some((&content[..start], visibility, &content[end + 2..]));
        }
        offset = end + 2;
    }
    None
}
