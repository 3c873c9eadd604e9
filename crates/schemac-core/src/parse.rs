pub(crate) mod fk;

use crate::schema::{
    Builder, Column, CompositeModel, Enum, EnumValue, ModelField, Modifier, Protocol,
    ProtocolMethod, Schema, Table, Type,
};
use crate::{Diagnostics, Error, Result};

/// Single pass, line oriented schema parser.
///
/// At most one block is open at a time. A header line opens a block (closing
/// any block left open), a lone `}` closes it, and every other line is read
/// by the grammar of the open block. `FK` lines are accepted anywhere.
struct Parser<'a> {
    builder: Builder,
    block: Option<Block>,
    diagnostics: &'a mut Diagnostics,
}

#[derive(Debug, Clone)]
enum Block {
    Table(String),
    Enum(String),
    Model(String),
    Protocol(String),
}

#[derive(Debug, Clone, Copy)]
enum Keyword {
    Table,
    Enum,
    Model,
    Protocol,
}

/// One line of schema text
#[derive(Clone, Copy)]
struct Line<'a> {
    no: usize,
    text: &'a str,
}

pub(crate) fn parse(src: &str, diagnostics: &mut Diagnostics) -> Result<Schema> {
    let mut parser = Parser {
        builder: Builder::new(),
        block: None,
        diagnostics,
    };

    for (index, text) in src.lines().enumerate() {
        parser.line(Line {
            no: index + 1,
            text: text.trim(),
        })?;
    }

    tracing::debug!(lines = src.lines().count(), "parsed schema text");

    parser.builder.build(parser.diagnostics)
}

impl Parser<'_> {
    fn line(&mut self, line: Line<'_>) -> Result<()> {
        let text = line.text;

        if text.is_empty() || text.starts_with("//") || text.starts_with('#') {
            return Ok(());
        }

        let first = text.split_whitespace().next().unwrap_or_default();

        if first == "FK" {
            let fk = fk::parse(line.no, text, self.diagnostics)?;
            self.builder.foreign_key(fk);
            return Ok(());
        }

        if let Some(rest) = text.strip_prefix('}') {
            if !rest.trim().is_empty() {
                return Err(line.error("unexpected text after `}`"));
            }
            self.block = None;
            return Ok(());
        }

        if text.starts_with('{') {
            return Err(line.error("`{` must be on the same line as the block header"));
        }

        if let Some(keyword) = Keyword::from_token(first.trim_end_matches('{')) {
            return self.header(line, keyword);
        }

        self.entry(line, text)
    }

    fn header(&mut self, line: Line<'_>, keyword: Keyword) -> Result<()> {
        let rest = line.text[keyword.as_str().len()..].trim();

        let (decl, body) = match rest.split_once('{') {
            Some((decl, body)) => (decl.trim(), Some(body)),
            None => (rest, None),
        };

        let mut words = decl.split_whitespace();

        let name = match words.next() {
            Some(name) if is_ident(name) => name.to_string(),
            Some(_) => return Err(line.error(format!("invalid {} name", keyword.as_str()))),
            None => return Err(line.error(format!("{} header without a name", keyword.as_str()))),
        };

        let parents = if matches!(keyword, Keyword::Model) {
            parents(words).map_err(|message| line.error(message))?
        } else if words.next().is_some() {
            return Err(line.error(format!("unexpected text after {} name", keyword.as_str())));
        } else {
            vec![]
        };

        let declared = match keyword {
            Keyword::Table => self.builder.table(Table::new(&name)),
            Keyword::Enum => self.builder.enumeration(Enum::new(&name)),
            Keyword::Model => self.builder.model(CompositeModel::new(&name, parents)),
            Keyword::Protocol => self.builder.protocol(Protocol::new(&name)),
        };

        declared.map_err(|err| line.error(err.to_string()))?;

        self.block = Some(keyword.block(name));

        let Some(body) = body else {
            return Ok(());
        };

        // Inline body: `Table Groups { id UUID [primary key]; name TEXT }`
        let (body, closed) = match body.split_once('}') {
            Some((body, after)) if after.trim().is_empty() => (body, true),
            Some(_) => return Err(line.error("unexpected text after `}`")),
            None => (body, false),
        };

        if matches!(keyword, Keyword::Model) {
            let entry = body.trim();
            if !entry.is_empty() {
                self.entry(line, entry)?;
            }
        } else {
            for entry in body.split(';').map(str::trim).filter(|entry| !entry.is_empty()) {
                self.entry(line, entry)?;
            }
        }

        if closed {
            self.block = None;
        }

        Ok(())
    }

    /// Reads one entry of the open block. `entry` is usually the whole line,
    /// or one `;`-separated piece of an inline body.
    fn entry(&mut self, line: Line<'_>, entry: &str) -> Result<()> {
        let Some(block) = self.block.clone() else {
            return Err(line.error("line is outside of any block"));
        };

        match block {
            Block::Table(name) => self.column(line, &name, entry),
            Block::Enum(name) => self.enum_value(line, &name, entry),
            Block::Model(name) => self.model_field(line, &name, entry),
            Block::Protocol(name) => self.protocol_method(line, &name, entry),
        }
    }

    fn column(&mut self, line: Line<'_>, table: &str, entry: &str) -> Result<()> {
        let (name, rest) = split_word(entry);
        let (ty, rest) = split_word(rest);

        if name.is_empty() || ty.is_empty() {
            return Err(line.error("expected `<column> <type> [modifiers]`"));
        }

        let modifiers = split_modifiers(rest)
            .ok_or_else(|| line.error("unbalanced `[...]` in column modifiers"))?
            .iter()
            .map(|raw| Modifier::parse(raw))
            .collect::<Vec<_>>();

        let column = Column {
            name: name.to_string(),
            ty: Type::from_token(ty),
            modifiers,
        };

        let Some(table) = self.builder.table_mut(table) else {
            return Err(line.error("table block is not open"));
        };

        if table.column(&column.name).is_some() {
            return Err(line.error(format!("column `{}` is declared more than once", column.name)));
        }

        if column.is_primary_key() {
            if let Some(existing) = table.primary_key() {
                return Err(line.error(format!(
                    "second primary key column; `{}` is already the primary key",
                    existing.name
                )));
            }
        }

        table.columns.push(column);
        Ok(())
    }

    fn enum_value(&mut self, line: Line<'_>, enumeration: &str, entry: &str) -> Result<()> {
        let mut words = entry.split_whitespace();

        let value = match (words.next(), words.next(), words.next()) {
            (Some(value), alias, None) => EnumValue {
                value: value.to_string(),
                alias: alias.map(str::to_string),
            },
            _ => return Err(line.error("expected `<value> [alias]`")),
        };

        let Some(enumeration) = self.builder.enum_mut(enumeration) else {
            return Err(line.error("enum block is not open"));
        };

        if enumeration.values.iter().any(|existing| existing.value == value.value) {
            return Err(line.error(format!(
                "enum value `{}` is declared more than once",
                value.value
            )));
        }

        enumeration.values.push(value);
        Ok(())
    }

    fn model_field(&mut self, line: Line<'_>, model: &str, entry: &str) -> Result<()> {
        let parts: Vec<_> = entry.split(';').map(str::trim).collect();

        let [property, ty, label] = parts[..] else {
            return Err(line.error("expected `<property>;<type>;<label|NOFORM>`"));
        };

        if property.is_empty() || ty.is_empty() {
            return Err(line.error("model field needs a property and a type"));
        }

        let field = ModelField {
            property: property.to_string(),
            ty: ty.to_string(),
            label: if label == "NOFORM" {
                String::new()
            } else {
                label.to_string()
            },
        };

        self.builder
            .model_mut(model)
            .ok_or_else(|| line.error("model block is not open"))?
            .fields
            .push(field);

        Ok(())
    }

    fn protocol_method(&mut self, line: Line<'_>, protocol: &str, entry: &str) -> Result<()> {
        let words: Vec<_> = entry.split_whitespace().collect();

        let [name, return_type] = words[..] else {
            return Err(line.error("expected `<method> <return-type>`"));
        };

        self.builder
            .protocol_mut(protocol)
            .ok_or_else(|| line.error("protocol block is not open"))?
            .methods
            .push(ProtocolMethod {
                name: name.to_string(),
                return_type: return_type.to_string(),
            });

        Ok(())
    }
}

impl Line<'_> {
    fn error(&self, message: impl Into<String>) -> Error {
        Error::structural(self.no, self.text, message)
    }
}

impl Keyword {
    fn from_token(token: &str) -> Option<Keyword> {
        Some(match token {
            "Table" => Keyword::Table,
            "Enum" => Keyword::Enum,
            "Model" => Keyword::Model,
            "Protocol" => Keyword::Protocol,
            _ => return None,
        })
    }

    fn as_str(self) -> &'static str {
        match self {
            Keyword::Table => "Table",
            Keyword::Enum => "Enum",
            Keyword::Model => "Model",
            Keyword::Protocol => "Protocol",
        }
    }

    fn block(self, name: String) -> Block {
        match self {
            Keyword::Table => Block::Table(name),
            Keyword::Enum => Block::Enum(name),
            Keyword::Model => Block::Model(name),
            Keyword::Protocol => Block::Protocol(name),
        }
    }
}

/// `extends A, B` after a model name
fn parents<'a>(
    mut words: impl Iterator<Item = &'a str>,
) -> std::result::Result<Vec<String>, String> {
    match words.next() {
        None => return Ok(vec![]),
        Some("extends") => {}
        Some(other) => return Err(format!("expected `extends`, found `{other}`")),
    }

    let parents: Vec<String> = words
        .flat_map(|word| word.split(','))
        .map(str::trim)
        .filter(|parent| !parent.is_empty())
        .map(String::from)
        .collect();

    if parents.is_empty() {
        return Err("expected a protocol name after `extends`".to_string());
    }

    if let Some(invalid) = parents.iter().find(|parent| !is_ident(parent)) {
        return Err(format!("invalid protocol name `{invalid}`"));
    }

    Ok(parents)
}

fn split_word(src: &str) -> (&str, &str) {
    let src = src.trim_start();
    match src.find(char::is_whitespace) {
        Some(pos) => (&src[..pos], src[pos..].trim_start()),
        None => (src, ""),
    }
}

/// Splits the modifier text of a column line. A bracketed group holds one
/// modifier or a comma separated list; bare words are one modifier each,
/// except that a bare `primary key` stays together. Returns `None` on
/// unbalanced brackets.
fn split_modifiers(src: &str) -> Option<Vec<String>> {
    let mut modifiers = vec![];
    let mut rest = src.trim();

    while !rest.is_empty() {
        if let Some(inner) = rest.strip_prefix('[') {
            let (group, after) = inner.split_once(']')?;
            if group.contains('[') {
                return None;
            }
            modifiers.extend(
                group
                    .split(',')
                    .map(str::trim)
                    .filter(|modifier| !modifier.is_empty())
                    .map(str::to_string),
            );
            rest = after.trim_start();
            continue;
        }

        let end = rest.find(|c: char| c.is_whitespace() || c == '[').unwrap_or(rest.len());
        let (word, after) = rest.split_at(end);

        if word.contains(']') {
            return None;
        }

        let after = after.trim_start();

        if word.eq_ignore_ascii_case("primary") {
            let (next, tail) = split_word(after);
            if next.eq_ignore_ascii_case("key") {
                modifiers.push("primary key".to_string());
                rest = tail;
                continue;
            }
        }

        modifiers.push(word.to_string());
        rest = after;
    }

    Some(modifiers)
}

fn is_ident(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn modifier_groups() {
        assert_eq!(
            split_modifiers("[primary key] [NOT_NULL]").unwrap(),
            vec!["primary key", "NOT_NULL"]
        );
        assert_eq!(
            split_modifiers("primary key unique").unwrap(),
            vec!["primary key", "unique"]
        );
        assert_eq!(
            split_modifiers("hidden[unique]").unwrap(),
            vec!["hidden", "unique"]
        );
        assert_eq!(
            split_modifiers("[pk, hidden]").unwrap(),
            vec!["pk", "hidden"]
        );
        assert_eq!(split_modifiers("").unwrap(), Vec::<String>::new());
        assert!(split_modifiers("[primary key").is_none());
        assert!(split_modifiers("hidden]").is_none());
    }

    #[test]
    fn model_parents() {
        for src in ["extends A, B", "extends A,B"] {
            assert_eq!(parents(src.split_whitespace()).unwrap(), vec!["A", "B"]);
        }
        assert!(parents("extends".split_whitespace()).is_err());
        assert!(parents("implements A".split_whitespace()).is_err());
    }

    #[test]
    fn words() {
        assert_eq!(split_word("  id   UUID [pk]"), ("id", "UUID [pk]"));
        assert_eq!(split_word("id"), ("id", ""));
    }
}
