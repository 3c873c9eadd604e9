use crate::schema::{accessor_ident, ForeignKey, Name, ReferDirection, Relationship};
use crate::{Diagnostic, Diagnostics, Error, Result};

const SHAPE: &str = "expected `FK <table>.<column> [as <alias>] -> <table>.<column> [as <alias>] \
                     [kind] [direction]`";

/// Parses one `FK` line. `line_no` is only used for error reporting.
pub(crate) fn parse(
    line_no: usize,
    line: &str,
    diagnostics: &mut Diagnostics,
) -> Result<ForeignKey> {
    let line = line.trim();
    let malformed = |message: &str| Error::structural(line_no, line, message);

    // `A.b->C.d` is accepted as well as `A.b -> C.d`
    let spaced = line.replace("->", " -> ");
    let (head, tags) = match spaced.find('[') {
        Some(pos) => spaced.split_at(pos),
        None => (spaced.as_str(), ""),
    };

    let mut tokens = head.split_whitespace().peekable();

    if tokens.next() != Some("FK") {
        return Err(malformed(SHAPE));
    }

    let (source_table, source_column) = endpoint(tokens.next()).ok_or_else(|| malformed(SHAPE))?;
    let left_alias = alias(&mut tokens).map_err(|_| malformed(SHAPE))?;

    if tokens.next() != Some("->") {
        return Err(malformed(SHAPE));
    }

    let (target_table, target_column) = endpoint(tokens.next()).ok_or_else(|| malformed(SHAPE))?;
    let right_alias = alias(&mut tokens).map_err(|_| malformed(SHAPE))?;

    if tokens.next().is_some() {
        return Err(malformed(SHAPE));
    }

    let mut fk = ForeignKey {
        left_alias: left_alias.unwrap_or_else(|| accessor_ident(&singular(target_table))),
        right_alias: right_alias.unwrap_or_else(|| accessor_ident(&plural(source_table))),
        source_table: source_table.to_string(),
        source_column: source_column.to_string(),
        target_table: target_table.to_string(),
        target_column: target_column.to_string(),
        relationship: Relationship::default(),
        refer: ReferDirection::default(),
    };

    let tags = split_tags(tags)
        .ok_or_else(|| malformed("unbalanced or stray text around `[...]` tags"))?;

    if tags.len() > 2 {
        return Err(malformed("a foreign key takes at most two tags"));
    }

    let mut seen_relationship = false;
    let mut seen_refer = false;

    for tag in tags {
        if let Ok(relationship) = tag.parse::<Relationship>() {
            if seen_relationship {
                return Err(malformed("relationship kind given twice"));
            }
            fk.relationship = relationship;
            seen_relationship = true;
        } else if let Ok(refer) = tag.parse::<ReferDirection>() {
            if seen_refer {
                return Err(malformed("referer direction given twice"));
            }
            fk.refer = refer;
            seen_refer = true;
        } else {
            diagnostics.push(Diagnostic::defaulted(
                fk.source_path(),
                format!("unknown foreign key tag `[{tag}]` on line {line_no}, keeping defaults"),
            ));
        }
    }

    Ok(fk)
}

/// `<table>.<column>`
fn endpoint(token: Option<&str>) -> Option<(&str, &str)> {
    let (table, column) = token?.split_once('.')?;

    if is_ident(table) && is_ident(column) {
        Some((table, column))
    } else {
        None
    }
}

/// Consumes an optional `as <alias>`.
fn alias<'a>(
    tokens: &mut std::iter::Peekable<impl Iterator<Item = &'a str>>,
) -> Result<Option<String>> {
    if tokens.peek() != Some(&"as") {
        return Ok(None);
    }

    tokens.next();

    match tokens.next() {
        Some(alias) if is_ident(alias) => Ok(Some(alias.to_string())),
        _ => Err(err!("missing alias after `as`")),
    }
}

/// Splits `[a] [b]` into `["a", "b"]`. Returns `None` if anything but
/// whitespace sits outside the brackets.
fn split_tags(src: &str) -> Option<Vec<String>> {
    let mut tags = vec![];
    let mut rest = src.trim();

    while !rest.is_empty() {
        let inner = rest.strip_prefix('[')?;
        let (tag, after) = inner.split_once(']')?;

        if tag.contains('[') {
            return None;
        }

        tags.push(tag.trim().to_string());
        rest = after.trim_start();
    }

    Some(tags)
}

fn is_ident(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_alphanumeric() || c == '_')
}

/// Inflection runs on the snake case form; mixed case input would come back
/// lowercased.
fn singular(table: &str) -> String {
    pluralizer::pluralize(&Name::new(table).snake_case(), 1, false)
}

fn plural(table: &str) -> String {
    pluralizer::pluralize(&Name::new(table).snake_case(), 2, false)
}
