use heck::{ToLowerCamelCase, ToSnakeCase, ToUpperCamelCase};

/// An entity name split into words on the schema's `_` separator.
///
/// Every emitter derives identifiers through this type, which keeps names
/// generated for the server layers and the client layers in agreement
/// without either side reading the other's output.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct Name {
    pub parts: Vec<String>,
}

impl Name {
    pub fn new(src: &str) -> Self {
        let parts = src
            .split('_')
            .filter(|part| !part.is_empty())
            .map(String::from)
            .collect();
        Self { parts }
    }

    /// `group_id` → `groupId`. Used for generated properties and methods.
    pub fn camel_case(&self) -> String {
        let mut parts = self.parts.iter();
        let Some(first) = parts.next() else {
            return String::new();
        };

        let mut out = first.to_lower_camel_case();
        for part in parts {
            out.push_str(&part.to_upper_camel_case());
        }
        out
    }

    /// `tag_links` → `TagLinks`. Used for every generated type name.
    pub fn upper_camel_case(&self) -> String {
        self.parts
            .iter()
            .map(|part| part.to_upper_camel_case())
            .collect()
    }

    pub fn snake_case(&self) -> String {
        self.parts
            .iter()
            .map(|part| part.to_snake_case())
            .collect::<Vec<_>>()
            .join("_")
    }
}

/// Type identifier for an entity name.
pub fn type_ident(name: &str) -> String {
    Name::new(name).upper_camel_case()
}

/// Accessor identifier for an entity name.
pub fn accessor_ident(name: &str) -> String {
    Name::new(name).camel_case()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_identifiers() {
        assert_eq!(type_ident("tag_links"), "TagLinks");
        assert_eq!(type_ident("Users"), "Users");
        assert_eq!(type_ident("users"), "Users");
        assert_eq!(type_ident("_id"), "Id");
        assert_eq!(type_ident("group__id"), "GroupId");
    }

    #[test]
    fn accessor_identifiers() {
        assert_eq!(accessor_ident("group_id"), "groupId");
        assert_eq!(accessor_ident("Users"), "users");
        assert_eq!(accessor_ident("_id"), "id");
        assert_eq!(accessor_ident("created_at_utc"), "createdAtUtc");
    }

    #[test]
    fn total_on_degenerate_input() {
        assert_eq!(type_ident(""), "");
        assert_eq!(accessor_ident("___"), "");
        assert_eq!(Name::new("__").snake_case(), "");
    }

    #[test]
    fn snake_case() {
        assert_eq!(Name::new("TagLinks").snake_case(), "tag_links");
        assert_eq!(Name::new("tag_links").snake_case(), "tag_links");
    }
}
