//! Keep-a-changelog style editing of the "Unreleased" section.

use upkeep_api::Dependency;

/// Heading that opens the section collecting unreleased changes.
pub const UNRELEASED_HEADING: &str = "## [Unreleased]";
/// Subsection heading entries are appended under.
pub const CHANGED_HEADING: &str = "### Changed";

/// Append `entries` to the "Changed" subsection of the Unreleased section.
///
/// Returns `content` unchanged when `entries` is empty or the document has no
/// Unreleased section. When the section has no "Changed" subsection, one is
/// inserted ahead of any other subsection. Text outside the Unreleased section
/// is copied through untouched. Entries are not deduplicated: inserting the
/// same list twice yields two copies.
///
/// Headings must match exactly. Documents using CRLF line endings are written
/// back with CRLF throughout.
#[must_use]
pub fn insert_changelog_entry<S: AsRef<str>>(content: &str, entries: &[S]) -> String {
    if entries.is_empty() {
        return content.to_owned();
    }

    let newline = if content.contains("\r\n") { "\r\n" } else { "\n" };
    let (body, trailing_newline) = match content.strip_suffix('\n') {
        Some(body) => (body.strip_suffix('\r').unwrap_or(body), true),
        None => (content, false),
    };
    let lines: Vec<&str> = body
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .collect();

    let Some(start) = lines.iter().position(|line| *line == UNRELEASED_HEADING) else {
        return content.to_owned();
    };
    let end = lines[start + 1..]
        .iter()
        .position(|line| is_release_heading(line))
        .map_or(lines.len(), |offset| start + 1 + offset);

    let entries: Vec<&str> = entries.iter().map(AsRef::as_ref).collect();
    let changed = lines[start + 1..end]
        .iter()
        .position(|line| *line == CHANGED_HEADING)
        .map(|offset| start + 1 + offset);

    let (at, block) = match changed {
        Some(heading) => extend_changed(&lines, heading, end, &entries),
        None => new_changed(&lines, start, &entries),
    };

    let mut output: Vec<&str> = Vec::with_capacity(lines.len() + block.len());
    output.extend_from_slice(&lines[..at]);
    output.extend(block);
    output.extend_from_slice(&lines[at..]);

    let mut rendered = output.join(newline);
    if trailing_newline {
        rendered.push_str(newline);
    }
    rendered
}

/// Render the conventional entry for a dependency bump.
#[must_use]
pub fn entry_for(dependency: &Dependency) -> String {
    format!(
        "- Bump `{}` from {} to {}",
        dependency.name, dependency.current_version, dependency.latest_version
    )
}

fn is_release_heading(line: &str) -> bool {
    line.starts_with("## ")
}

fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

// Insertion point and lines for appending to an existing "Changed" subsection.
fn extend_changed<'a>(
    lines: &[&str],
    heading: usize,
    end: usize,
    entries: &[&'a str],
) -> (usize, Vec<&'a str>) {
    let section_end = lines[heading + 1..end]
        .iter()
        .position(|line| line.trim_start().starts_with('#'))
        .map_or(end, |offset| heading + 1 + offset);
    // Loose lists separate bullets with blank lines; append after the last one.
    let last_line = lines[heading + 1..section_end]
        .iter()
        .rposition(|line| !is_blank(line));
    if let Some(offset) = last_line {
        return (heading + 2 + offset, entries.to_vec());
    }

    // Empty subsection: entries go after the heading and its blank line.
    let mut block = Vec::with_capacity(entries.len() + 2);
    let mut at = heading + 1;
    if at < lines.len() && is_blank(lines[at]) {
        at += 1;
    } else {
        block.push("");
    }
    block.extend_from_slice(entries);
    if at < lines.len() && !is_blank(lines[at]) {
        block.push("");
    }
    (at, block)
}

// Insertion point and lines for a new "Changed" subsection under the Unreleased heading.
fn new_changed<'a>(lines: &[&str], start: usize, entries: &[&'a str]) -> (usize, Vec<&'a str>) {
    let mut block = Vec::with_capacity(entries.len() + 4);
    let mut at = start + 1;
    if at < lines.len() && is_blank(lines[at]) {
        at += 1;
    } else {
        block.push("");
    }
    block.push(CHANGED_HEADING);
    block.push("");
    block.extend_from_slice(entries);
    if at < lines.len() {
        block.push("");
    }
    (at, block)
}
